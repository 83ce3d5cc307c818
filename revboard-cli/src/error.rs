use std::io;
use std::path::PathBuf;

use revboard_table::TableError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("could not read settings from {path}: {source}")]
    SettingsFile { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("{0}")]
    Command(String),
}

impl CliError {
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }
}
