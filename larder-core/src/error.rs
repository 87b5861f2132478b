use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No Recipe found in JSON-LD or microdata")]
    NoRecipe,

    #[error("Invalid JSON-LD: {0}")]
    InvalidJson(String),
}

/// Why a single recipe field could not be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("{0} is not present")]
    Missing(&'static str),

    #[error("{field} has an unexpected shape: {found}")]
    WrongShape { field: &'static str, found: String },

    #[error("{field} could not be parsed from {value:?}")]
    Unparseable { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the fetch-and-save entry points.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
