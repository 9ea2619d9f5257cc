use std::path::PathBuf;

use anchorpatch_config::PatcherConfig;
use anchorpatch_core::RerunPolicy;
use clap::Parser;

/// Inject code fragments into a source file at exact anchor strings.
///
/// With no arguments the built-in `pwa` recipe patches `src/App.js` in the
/// current directory and leaves a copy of the original in
/// `src/App.js.backup`.
#[derive(Debug, Parser)]
#[command(name = "anchorpatch", version, about, long_about = None)]
pub struct Cli {
    /// File to patch; relative paths resolve against --workspace
    #[arg(long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Read settings and operations from this TOML file instead of
    /// `<workspace>/anchorpatch.toml`
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Built-in recipe to apply
    #[arg(long, value_name = "NAME")]
    pub recipe: Option<String>,

    /// Directory the target and config are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workspace: PathBuf,

    /// Re-apply additive operations even when their text is already present
    #[arg(long)]
    pub unguarded: bool,

    /// Show what would change without writing the backup or the target
    #[arg(long)]
    pub dry_run: bool,

    /// Print a unified diff of the changes
    #[arg(long)]
    pub diff: bool,

    /// Exit with status 2 when any operation is skipped
    #[arg(long)]
    pub fail_on_skip: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags take precedence over file and environment settings.
    pub fn apply_overrides(&self, config: &mut PatcherConfig) {
        if let Some(target) = &self.target {
            config.target = Some(target.clone());
        }
        if let Some(recipe) = &self.recipe {
            config.recipe = recipe.clone();
            config.operations.clear();
        }
        if self.unguarded {
            config.rerun = RerunPolicy::Unguarded;
        }
        if self.fail_on_skip {
            config.fail_on_skip = true;
        }
    }
}
