use std::process::ExitCode;

use anchorpatch_config::ConfigManager;
use anchorpatch_core::{DiffOptions, PatchEngine, SkipReason, compute_diff};
use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Cli;
use crate::render::ReportRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every operation ran, whether applied or skipped.
    Completed,
    /// An anchor was missing and the run was asked to fail on skips.
    Incomplete,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::Incomplete => ExitCode::from(2),
        }
    }
}

pub async fn execute(cli: &Cli) -> Result<RunStatus> {
    let mut manager = match &cli.config {
        Some(path) => ConfigManager::load_from_file(&cli.workspace, path)?,
        None => ConfigManager::load_from_workspace(&cli.workspace)?,
    };
    cli.apply_overrides(manager.config_mut());

    let config = manager.config();
    config.validate()?;
    let recipe = config.resolve_recipe()?;
    let target = manager.target_path(&recipe);
    debug!(
        recipe = %recipe.name,
        file = %target.display(),
        operations = recipe.operations.len(),
        "resolved run"
    );

    let engine = PatchEngine::new(config.engine_options(cli.dry_run));
    let report = engine
        .run(&target, &recipe.operations)
        .await
        .with_context(|| format!("Failed to patch {}", target.display()))?;

    if cli.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        let renderer = ReportRenderer::for_stdout();
        print!("{}", renderer.report(&recipe, &report));

        if cli.diff || cli.dry_run {
            let old_label = report
                .backup
                .as_ref()
                .map(|backup| backup.display().to_string())
                .unwrap_or_else(|| format!("{} (original)", target.display()));
            let new_label = target.display().to_string();
            let bundle = compute_diff(
                &report.original,
                &report.patched,
                DiffOptions {
                    old_label: Some(old_label.as_str()),
                    new_label: Some(new_label.as_str()),
                    ..Default::default()
                },
            );
            println!();
            print!("{}", renderer.diff(&bundle));
        }
    }

    // Sites that are already patched do not count as failures.
    if config.fail_on_skip && report.skipped_with(SkipReason::AnchorNotFound) > 0 {
        Ok(RunStatus::Incomplete)
    } else {
        Ok(RunStatus::Completed)
    }
}
