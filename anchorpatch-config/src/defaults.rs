use anchorpatch_core::DEFAULT_BACKUP_SUFFIX;
use anchorpatch_core::recipes::pwa;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "anchorpatch.toml";
pub const DEFAULT_ENV_FILE_NAME: &str = ".env";
pub const DEFAULT_RECIPE: &str = pwa::NAME;

pub const ENV_TARGET: &str = "ANCHORPATCH_TARGET";
pub const ENV_BACKUP_SUFFIX: &str = "ANCHORPATCH_BACKUP_SUFFIX";
pub const ENV_LOG: &str = "ANCHORPATCH_LOG";

pub fn default_backup_suffix() -> String {
    DEFAULT_BACKUP_SUFFIX.to_string()
}

pub fn default_recipe() -> String {
    DEFAULT_RECIPE.to_string()
}
