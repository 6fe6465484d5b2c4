use crate::stations::error::RosterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StemmnetError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Path '{0}' exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to open failure log '{0}'")]
    FailureLogOpen(PathBuf, #[source] std::io::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
