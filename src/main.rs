use std::process::ExitCode;

use anchorpatch_config::resolve_log_filter;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;
mod run;

use cli::Cli;
use render::ReportRenderer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run::execute(&cli).await {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("{}", ReportRenderer::for_stderr().fatal(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_new(resolve_log_filter(verbose))
        .unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
