// Error type shared by every stage of the upload pipeline. Nothing in the
// library exits the process; the binary decides what an error means.

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ValidationError;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Error opening local file {}: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error creating POST request: {0}")]
    Request(String),

    #[error("POST response error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any response other than 201 Created.
    #[error("{status}: {message}")]
    Api {
        status: u16,
        message: String,
        request_id: Option<String>,
        documentation_url: Option<String>,
        errors: Vec<ValidationError>,
    },
}

pub type Result<T> = std::result::Result<T, UploadError>;
