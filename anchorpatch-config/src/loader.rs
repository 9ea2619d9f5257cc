use std::fs;
use std::path::{Path, PathBuf};

use anchorpatch_core::recipes::{self, Recipe};
use anchorpatch_core::{EngineOptions, PatchOperation, RerunPolicy};
use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults::{
    DEFAULT_CONFIG_FILE_NAME, DEFAULT_ENV_FILE_NAME, ENV_BACKUP_SUFFIX, ENV_TARGET,
    default_backup_suffix, default_recipe,
};

const INLINE_RECIPE_NAME: &str = "inline";

/// Settings read from `anchorpatch.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatcherConfig {
    /// Overrides the recipe's default target.
    #[serde(default)]
    pub target: Option<PathBuf>,

    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,

    #[serde(default)]
    pub rerun: RerunPolicy,

    /// Exit non-zero when any operation is skipped.
    #[serde(default)]
    pub fail_on_skip: bool,

    /// Built-in recipe used when no inline operations are given.
    #[serde(default = "default_recipe")]
    pub recipe: String,

    #[serde(default)]
    pub operations: Vec<OperationConfig>,
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            target: None,
            backup_suffix: default_backup_suffix(),
            rerun: RerunPolicy::default(),
            fail_on_skip: false,
            recipe: default_recipe(),
            operations: Vec::new(),
        }
    }
}

/// One `[[operations]]` table. Exactly one of `insert_after` or
/// `replacement` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OperationConfig {
    pub label: String,
    pub anchor: String,
    #[serde(default)]
    pub insert_after: Option<String>,
    #[serde(default)]
    pub replacement: Option<String>,
}

impl OperationConfig {
    pub fn to_operation(&self) -> Result<PatchOperation> {
        match (&self.insert_after, &self.replacement) {
            (Some(text), None) => Ok(PatchOperation::insert_after(
                &self.label,
                &self.anchor,
                text,
            )),
            (None, Some(replacement)) => Ok(PatchOperation::substitute(
                &self.label,
                &self.anchor,
                replacement,
            )),
            (Some(_), Some(_)) => bail!(
                "operation '{}' sets both insert_after and replacement",
                self.label
            ),
            (None, None) => bail!(
                "operation '{}' needs either insert_after or replacement",
                self.label
            ),
        }
    }
}

impl PatcherConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: PatcherConfig = toml::from_str(raw).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backup_suffix.is_empty() {
            bail!("backup_suffix must not be empty");
        }
        for operation in &self.operations {
            if operation.anchor.is_empty() {
                bail!("operation '{}' has an empty anchor", operation.label);
            }
            operation.to_operation()?;
        }
        Ok(())
    }

    /// Inline operations win over the named built-in recipe.
    pub fn resolve_recipe(&self) -> Result<Recipe> {
        if self.operations.is_empty() {
            return recipes::builtin(&self.recipe).ok_or_else(|| {
                anyhow!(
                    "unknown recipe '{}' (available: {})",
                    self.recipe,
                    recipes::builtin_names().join(", ")
                )
            });
        }

        let target = self
            .target
            .clone()
            .context("inline operations require a target")?;
        let operations = self
            .operations
            .iter()
            .map(OperationConfig::to_operation)
            .collect::<Result<Vec<_>>>()?;
        Ok(Recipe {
            name: INLINE_RECIPE_NAME.to_string(),
            target,
            operations,
        })
    }

    pub fn engine_options(&self, dry_run: bool) -> EngineOptions {
        EngineOptions {
            backup_suffix: self.backup_suffix.clone(),
            rerun: self.rerun,
            dry_run,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(target) = non_empty_env(ENV_TARGET) {
            self.target = Some(PathBuf::from(target));
        }
        if let Some(suffix) = non_empty_env(ENV_BACKUP_SUFFIX) {
            self.backup_suffix = suffix;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Loads configuration relative to a workspace directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PatcherConfig,
    config_path: Option<PathBuf>,
    workspace: PathBuf,
}

impl ConfigManager {
    /// Reads `anchorpatch.toml` from `workspace` when present, otherwise
    /// starts from defaults.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();
        let candidate = workspace.join(DEFAULT_CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::load_from_file(workspace, &candidate);
        }

        load_env_file(workspace)?;
        let mut config = PatcherConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self {
            config,
            config_path: None,
            workspace: workspace.to_path_buf(),
        })
    }

    /// Reads an explicit config file; a missing file is an error.
    pub fn load_from_file(workspace: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            workspace.join(path)
        };

        load_env_file(workspace)?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = PatcherConfig::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.apply_env_overrides();
        config.validate()?;
        debug!(path = %path.display(), "loaded config");

        Ok(Self {
            config,
            config_path: Some(path),
            workspace: workspace.to_path_buf(),
        })
    }

    pub fn config(&self) -> &PatcherConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PatcherConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Configured target, else the recipe's, resolved against the workspace.
    pub fn target_path(&self, recipe: &Recipe) -> PathBuf {
        let target = self.config.target.as_ref().unwrap_or(&recipe.target);
        if target.is_absolute() {
            target.clone()
        } else {
            self.workspace.join(target)
        }
    }

    pub fn into_config(self) -> PatcherConfig {
        self.config
    }
}

fn load_env_file(workspace: &Path) -> Result<()> {
    let env_path = workspace.join(DEFAULT_ENV_FILE_NAME);
    if env_path.is_file() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("Failed to load {}", env_path.display()))?;
        debug!(path = %env_path.display(), "loaded environment file");
    }
    Ok(())
}
