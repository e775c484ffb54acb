//! Data-directory layout.
//!
//! All runtime state lives under one directory, `~/.tuberag` by default
//! (overridable with `--data-dir`): three JSON documents, one transcript
//! artifact per ingested video, and the log files.
//!
//! ```text
//! ~/.tuberag/
//!   costs.json          cost ledger
//!   history.json        chat history
//!   store_config.json   vector store ids + uploaded-document cache
//!   transcripts/        one .txt per video
//!   logs/               daily-rolling JSON logs
//! ```

use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Resolved data directory with accessors for every document TUBERAG owns.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the data directory: the override if given, else `~/.tuberag`.
    ///
    /// Creates the directory (and the transcripts subdirectory) if missing.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        let root = match override_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or(CoreError::NoHomeDirectory)?
                .join(".tuberag"),
        };

        let dir = Self { root };
        dir.ensure_layout()?;
        Ok(dir)
    }

    /// Use an existing directory without touching the default location (for tests).
    pub fn at(root: impl Into<PathBuf>) -> Result<Self> {
        let dir = Self { root: root.into() };
        dir.ensure_layout()?;
        Ok(dir)
    }

    fn ensure_layout(&self) -> Result<()> {
        for dir in [self.root.clone(), self.transcripts_dir(), self.logs_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| CoreError::DirectoryCreation {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Root of the data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cost ledger document.
    pub fn costs_file(&self) -> PathBuf {
        self.root.join("costs.json")
    }

    /// Chat history document.
    pub fn history_file(&self) -> PathBuf {
        self.root.join("history.json")
    }

    /// Vector-store config + uploaded-document cache document.
    pub fn store_config_file(&self) -> PathBuf {
        self.root.join("store_config.json")
    }

    /// Directory holding one transcript artifact per ingested video.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.root.join("transcripts")
    }

    /// Log directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
