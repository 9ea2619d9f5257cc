pub mod defaults;
pub mod loader;
pub mod logging;

pub use defaults::{DEFAULT_CONFIG_FILE_NAME, DEFAULT_RECIPE};
pub use loader::{ConfigManager, OperationConfig, PatcherConfig};
pub use logging::resolve_log_filter;
