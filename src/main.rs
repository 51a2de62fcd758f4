mod cli;
mod engine;
mod logging;
mod repl;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use engine::env::Environment;
use engine::program;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_filter.as_deref());
    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Repl(args) => repl::start_repl(Environment::new_with_prelude(), !args.no_history),
    }
}

#[tracing::instrument(skip_all)]
fn run(args: RunArgs) -> Result<()> {
    let last = match (args.expr, args.file) {
        (Some(source), _) => {
            info!(expression = %source, "Evaluating expression string");
            program::evaluate_source(&source, Environment::new_with_prelude())
                .context("Failed to evaluate expression")?
        }
        (None, Some(path)) => {
            info!(path = %path.display(), "Running file");
            program::run_file(&path)
                .with_context(|| format!("Failed to run '{}'", path.display()))?
        }
        (None, None) => bail!("Either --expr or a file path is required"),
    };

    if let Some(value) = last.filter(|value| !value.is_empty_list()) {
        println!("{}", value);
    }
    Ok(())
}
