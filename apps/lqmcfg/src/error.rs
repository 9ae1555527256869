//! Error type for the lqmcfg binary.

use lqm_core::LqmError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Request validation or name resolution failed.
    #[error(transparent)]
    Lqm(#[from] LqmError),

    /// A controller call failed where no recovery is possible.
    #[error(transparent)]
    Client(#[from] lqm_client::Error),

    #[error("File {} does not exist. Please enter the accurate file", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read CSV file {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid settings file {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("AUTH_TOKEN login failure, please check token. ({0})")]
    TokenRejected(#[source] lqm_client::Error),

    #[error("Login aborted: no credentials entered")]
    LoginAborted,

    #[error("Failed to read credentials: {0}")]
    Prompt(#[source] io::Error),
}
