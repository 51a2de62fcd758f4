use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// An evaluator for flisp, a small Lisp with modules.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "flisp", bin_name = "flisp")]
#[clap(subcommand_required = true, arg_required_else_help = true)] // Ensures a subcommand is given, or help is printed.
pub struct Cli {
    /// Tracing filter directives (e.g. "flisp=debug"). Overrides RUST_LOG.
    #[clap(long, global = true, env = "FLISP_LOG", value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates a flisp expression from a string or runs a flisp file.
    Run(RunArgs),
    /// Starts an interactive session.
    Repl(ReplArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source text to evaluate.
    #[clap(short, long, value_name = "LISP_CODE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a flisp file to execute.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr", required_unless_present = "expr")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Do not load or save line history.
    #[clap(long)]
    pub no_history: bool,
}
