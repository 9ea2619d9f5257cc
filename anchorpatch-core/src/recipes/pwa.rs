//! Wires install prompt, service worker and notifications into a React `App.js`.

use super::Recipe;
use crate::operation::PatchOperation;

pub const NAME: &str = "pwa";
pub const DEFAULT_TARGET: &str = "src/App.js";

pub(crate) const CLERK_IMPORT: &str = "import { SignedIn, SignedOut, SignIn, SignUp, UserButton, useUser } from '@clerk/clerk-react';";

pub(crate) const APP_STATE: &str = concat!(
    "const App = () => {\n",
    "  const [currentScreen, setCurrentScreen] = useState('role-selection');  \n",
    "  const [currentRole, setCurrentRole] = useState('');\n",
    "  const [screenData, setScreenData] = useState(null);",
);

pub(crate) const RENDER_TAIL: &str = concat!(
    "      {currentScreen === 'my-events' && (\n",
    "        <PlayerEvents onLogout={handleLogout} />\n",
    "      )}\n",
    "    </>\n",
    "  );\n",
    "};",
);

pub(crate) const CREATE_EVENT: &str = concat!(
    "    if (eventId) {\n",
    "      updateEvent(eventId, eventData);\n",
    "      addNotification('Evento aggiornato con successo', 'success');\n",
    "    } else {\n",
    "      addEvent(eventData);\n",
    "      addNotification('Evento creato con successo', 'success');\n",
    "    }",
);

const PWA_IMPORTS: &str = r#"
// ===== PWA IMPORTS =====
import InstallPrompt from './InstallPrompt';
import { 
  register as registerServiceWorker,
  requestNotificationPermission,
  sendLocalNotification,
  scheduleEventNotification 
} from './serviceWorkerRegistration';
"#;

const PWA_STATE_AND_EFFECT: &str = r#"

  // ===== PWA STATES =====
  const [pwaInstalled, setPwaInstalled] = useState(false);
  const [notificationsEnabled, setNotificationsEnabled] = useState(false);
  const [serviceWorkerReady, setServiceWorkerReady] = useState(false);

  // ===== PWA SERVICE WORKER REGISTRATION =====
  useEffect(() => {
    // Controlla se già installato come app standalone
    const isStandalone = window.matchMedia('(display-mode: standalone)').matches ||
                        window.navigator.standalone === true;
    setPwaInstalled(isStandalone);

    // Registra Service Worker
    registerServiceWorker({
      onSuccess: (registration) => {
        console.log('✅ Service Worker registrato con successo!');
        setServiceWorkerReady(true);
      },
      onUpdate: (registration) => {
        console.log('🔄 Nuova versione disponibile! Ricarica per aggiornare.');
      },
      onRegistered: (registration) => {
        console.log('📝 Service Worker in attivazione...');
      }
    });

    // Richiedi permessi notifiche dopo 3 secondi
    const notificationTimer = setTimeout(() => {
      requestNotificationPermission()
        .then(permission => {
          setNotificationsEnabled(permission === 'granted');
          if (permission === 'granted') {
            sendLocalNotification(
              '🎉 Notifiche Attivate!',
              {
                body: 'Riceverai aggiornamenti su eventi e convocazioni',
                icon: '/icons/icon-192x192.png',
                badge: '/icons/icon-64x64.png'
              }
            );
          }
        })
        .catch(err => console.log('Permesso notifiche rifiutato'));
    }, 3000);

    // Listener per quando l'app viene installata
    const handleAppInstalled = () => {
      setPwaInstalled(true);
      console.log('✅ PWA installata!');
    };

    window.addEventListener('appinstalled', handleAppInstalled);

    return () => {
      clearTimeout(notificationTimer);
      window.removeEventListener('appinstalled', handleAppInstalled);
    };
  }, []);"#;

const RENDER_WITH_INSTALL_PROMPT: &str = r#"      {currentScreen === 'my-events' && (
        <PlayerEvents onLogout={handleLogout} />
      )}
      
      {/* PWA INSTALL PROMPT */}
      {!pwaInstalled && <InstallPrompt />}
    </>
  );
};"#;

const CREATE_EVENT_WITH_NOTIFICATION: &str = r#"    if (eventId) {
      updateEvent(eventId, eventData);
      addNotification('Evento aggiornato con successo', 'success');
    } else {
      addEvent(eventData);
      addNotification('Evento creato con successo', 'success');
      
      // 🔔 NOTIFICA PWA: Schedula notifiche automatiche
      if (eventData.date && eventData.time) {
        scheduleEventNotification(eventData);
      }
    }"#;

pub fn recipe() -> Recipe {
    Recipe {
        name: NAME.to_string(),
        target: DEFAULT_TARGET.into(),
        operations: vec![
            PatchOperation::insert_after("PWA imports", CLERK_IMPORT, PWA_IMPORTS),
            PatchOperation::insert_after(
                "PWA state and service worker registration",
                APP_STATE,
                PWA_STATE_AND_EFFECT,
            ),
            PatchOperation::substitute(
                "Install prompt in render",
                RENDER_TAIL,
                RENDER_WITH_INSTALL_PROMPT,
            ),
            PatchOperation::substitute(
                "Create-event notification",
                CREATE_EVENT,
                CREATE_EVENT_WITH_NOTIFICATION,
            ),
        ],
    }
}
