mod history;

use crate::engine::env::Environment;
use crate::engine::program;
use owo_colors::OwoColorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Runs an interactive session against `env`. Each line is parsed and evaluated as a sequence
/// of top-level forms; a failing form is reported and the session continues.
#[tracing::instrument(skip(env))]
pub fn start_repl(env: Rc<RefCell<Environment>>, use_history: bool) -> anyhow::Result<()> {
    info!("Starting REPL session with rustyline");
    let mut rl = Editor::<(), DefaultHistory>::new()?;
    let mut line_number = 1;

    let history = history::HistoryFile::locate(use_history);
    match &history {
        Some(history) => match history.load(&mut rl) {
            Ok(true) => info!(path = %history.path().display(), "Loaded line history"),
            Ok(false) => debug!(path = %history.path().display(), "No line history yet"),
            Err(e) => warn!("{:#}", e),
        },
        None if use_history => warn!("No data directory found; line history will not be kept"),
        None => {}
    }

    loop {
        let prompt = format!("flisp ({})> ", line_number);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed_input = line.trim();
                line_number += 1;
                if trimmed_input.is_empty() {
                    continue;
                }
                if let Err(err) = rl.add_history_entry(line.as_str()) {
                    warn!("Failed to add line to history: {}", err);
                }

                if trimmed_input == ".exit" {
                    info!("Exiting REPL session via user command.");
                    println!("Exiting.");
                    break;
                }

                match program::evaluate_source(trimmed_input, Rc::clone(&env)) {
                    Ok(Some(result)) if !result.is_empty_list() => println!("{}", result),
                    Ok(_) => {}
                    // `{:#}` flattens nested import failures onto one line.
                    Err(e) => eprintln!("{}: {:#}", "Error".red().bold(), anyhow::Error::new(e)),
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type .exit or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                println!("Exiting.");
                break;
            }
            Err(err) => {
                eprintln!("{}: {:?}", "Readline error".red().bold(), err);
                break;
            }
        }
    }

    if let Some(history) = &history {
        if let Err(e) = history.save(&mut rl) {
            warn!("{:#}", e);
        }
    }
    Ok(())
}
