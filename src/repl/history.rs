use anyhow::{Context, Result};
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const HISTORY_FILE_NAME: &str = "history.txt";

/// The file a REPL session reads its line history from and writes it back to.
#[derive(Debug)]
pub(crate) struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// `<data dir>/flisp/history.txt`, falling back to the config dir. `None` when history
    /// is switched off or the platform has neither directory.
    pub(crate) fn locate(enabled: bool) -> Option<Self> {
        if !enabled {
            debug!("Line history disabled");
            return None;
        }
        let base = dirs::data_dir().or_else(dirs::config_dir)?;
        Some(Self::at(
            base.join(env!("CARGO_PKG_NAME")).join(HISTORY_FILE_NAME),
        ))
    }

    pub(crate) fn at(path: PathBuf) -> Self {
        HistoryFile { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Loads earlier sessions into `rl`. Returns `false` if there is nothing to load yet.
    pub(crate) fn load(&self, rl: &mut Editor<(), DefaultHistory>) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        rl.load_history(&self.path)
            .with_context(|| format!("Reading history from {}", self.path.display()))?;
        Ok(true)
    }

    /// Writes the session's lines, creating the containing directory on first use.
    pub(crate) fn save(&self, rl: &mut Editor<(), DefaultHistory>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Creating history directory {}", dir.display()))?;
        }
        rl.save_history(&self.path)
            .with_context(|| format!("Writing history to {}", self.path.display()))
    }
}
