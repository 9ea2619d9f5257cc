use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const APP_JS: &str = concat!(
    "import React, { useState, useEffect } from 'react';\n",
    "import { SignedIn, SignedOut, SignIn, SignUp, UserButton, useUser } from '@clerk/clerk-react';\n",
    "\n",
    "const App = () => {\n",
    "  const [currentScreen, setCurrentScreen] = useState('role-selection');  \n",
    "  const [currentRole, setCurrentRole] = useState('');\n",
    "  const [screenData, setScreenData] = useState(null);\n",
    "\n",
    "  const handleSave = (eventId, eventData) => {\n",
    "    if (eventId) {\n",
    "      updateEvent(eventId, eventData);\n",
    "      addNotification('Evento aggiornato con successo', 'success');\n",
    "    } else {\n",
    "      addEvent(eventData);\n",
    "      addNotification('Evento creato con successo', 'success');\n",
    "    }\n",
    "  };\n",
    "\n",
    "  return (\n",
    "    <>\n",
    "      {currentScreen === 'my-events' && (\n",
    "        <PlayerEvents onLogout={handleLogout} />\n",
    "      )}\n",
    "    </>\n",
    "  );\n",
    "};\n",
    "\n",
    "export default App;\n",
);

fn workspace_with_app(contents: &str) -> TempDir {
    let workspace = TempDir::new().unwrap();
    fs::create_dir(workspace.path().join("src")).unwrap();
    fs::write(workspace.path().join("src/App.js"), contents).unwrap();
    workspace
}

fn anchorpatch(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("anchorpatch").unwrap();
    cmd.current_dir(workspace)
        .env_remove("ANCHORPATCH_TARGET")
        .env_remove("ANCHORPATCH_BACKUP_SUFFIX")
        .env_remove("ANCHORPATCH_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn zero_arguments_patch_app_js() {
    let workspace = workspace_with_app(APP_JS);

    anchorpatch(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/4] Applied: PWA imports"))
        .stdout(predicate::str::contains("[4/4] Applied: Create-event notification"))
        .stdout(predicate::str::contains("4 applied, 0 skipped, 4 total"));

    let patched = fs::read_to_string(workspace.path().join("src/App.js")).unwrap();
    assert!(patched.contains("import InstallPrompt from './InstallPrompt';"));
    assert!(patched.contains("{!pwaInstalled && <InstallPrompt />}"));
    assert!(patched.contains("import { \n  register as registerServiceWorker,"));
    assert!(patched.contains("console.log('\u{2705} Service Worker registrato con successo!');"));
    assert!(patched.contains("      \n      // \u{1F514} NOTIFICA PWA: Schedula notifiche automatiche\n"));
    let backup = fs::read_to_string(workspace.path().join("src/App.js.backup")).unwrap();
    assert_eq!(backup, APP_JS);
}

#[test]
fn missing_target_exits_one_without_writing() {
    let workspace = TempDir::new().unwrap();

    anchorpatch(workspace.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("target file not found"))
        .stderr(predicate::str::contains("App.js"));

    assert_eq!(fs::read_dir(workspace.path()).unwrap().count(), 0);
}

#[test]
fn all_anchors_missing_still_exits_zero() {
    let original = "console.log('nothing to see');\n";
    let workspace = workspace_with_app(original);

    anchorpatch(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 applied, 4 skipped, 4 total"))
        .stdout(predicate::str::contains("anchor not found"));

    assert_eq!(
        fs::read_to_string(workspace.path().join("src/App.js")).unwrap(),
        original
    );
    assert_eq!(
        fs::read_to_string(workspace.path().join("src/App.js.backup")).unwrap(),
        original
    );
}

#[test]
fn fail_on_skip_exits_two() {
    let workspace = workspace_with_app("no anchors here\n");

    anchorpatch(workspace.path())
        .arg("--fail-on-skip")
        .assert()
        .code(2);
}

#[test]
fn fail_on_skip_accepts_an_already_patched_file() {
    let workspace = workspace_with_app(APP_JS);

    anchorpatch(workspace.path()).assert().success();
    anchorpatch(workspace.path())
        .arg("--fail-on-skip")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("0 applied, 4 skipped"));
}

#[test]
fn second_run_is_a_no_op_by_default() {
    let workspace = workspace_with_app(APP_JS);

    anchorpatch(workspace.path()).assert().success();
    let first = fs::read_to_string(workspace.path().join("src/App.js")).unwrap();

    anchorpatch(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("replacement already present"));
    let second = fs::read_to_string(workspace.path().join("src/App.js")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn unguarded_second_run_duplicates_imports() {
    let workspace = workspace_with_app(APP_JS);

    anchorpatch(workspace.path()).arg("--unguarded").assert().success();
    anchorpatch(workspace.path())
        .arg("--unguarded")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 applied, 2 skipped"));

    let patched = fs::read_to_string(workspace.path().join("src/App.js")).unwrap();
    assert_eq!(patched.matches("// ===== PWA IMPORTS =====").count(), 2);
}

#[test]
fn dry_run_prints_diff_and_writes_nothing() {
    let workspace = workspace_with_app(APP_JS);

    anchorpatch(workspace.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("+import InstallPrompt from './InstallPrompt';"));

    assert_eq!(
        fs::read_to_string(workspace.path().join("src/App.js")).unwrap(),
        APP_JS
    );
    assert!(!workspace.path().join("src/App.js.backup").exists());
}

#[test]
fn json_report_is_machine_readable() {
    let workspace = workspace_with_app("nothing\n");

    anchorpatch(workspace.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"skipped\""))
        .stdout(predicate::str::contains("\"reason\": \"anchor_not_found\""))
        .stdout(predicate::str::contains("\"applied\": 0"))
        .stdout(predicate::str::contains("\"skipped\": 4"));
}

#[test]
fn config_file_supplies_inline_operations() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("main.js"), "A = () => { X; Y; Z; }").unwrap();
    fs::write(
        workspace.path().join("anchorpatch.toml"),
        concat!(
            "target = \"main.js\"\n",
            "backup_suffix = \".orig\"\n",
            "\n",
            "[[operations]]\n",
            "label = \"append W\"\n",
            "anchor = \"X; Y; Z;\"\n",
            "insert_after = \" W;\"\n",
        ),
    )
    .unwrap();

    anchorpatch(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("recipe 'inline'"))
        .stdout(predicate::str::contains("[1/1] Applied: append W"));

    assert_eq!(
        fs::read_to_string(workspace.path().join("main.js")).unwrap(),
        "A = () => { X; Y; Z; W; }"
    );
    assert!(workspace.path().join("main.js.orig").exists());
}

#[test]
fn unknown_recipe_is_fatal() {
    let workspace = workspace_with_app(APP_JS);

    anchorpatch(workspace.path())
        .args(["--recipe", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown recipe 'nope'"));

    assert!(!workspace.path().join("src/App.js.backup").exists());
}
