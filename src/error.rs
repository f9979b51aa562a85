// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Root error type for the crate.
///
/// Only unexpected I/O failures surface here. Expected absences (missing
/// version file, unset manifest, no reachable tag) are handled locally by
/// the operations themselves and never become an `Err`.
#[derive(Debug, Error)]
pub enum AppSupportError {
    #[error("failed to read version file '{}': {source}", path.display())]
    VersionRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write version file '{}': {source}", path.display())]
    VersionWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read manifest '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write manifest '{}': {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AppSupportError>;
