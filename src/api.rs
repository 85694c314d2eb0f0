// Upload client: one blocking POST against the release-assets endpoint and
// decoding of whatever JSON comes back. Kept synchronous because a single
// request is all this tool ever makes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Body, Client, Request};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::time::Duration;
use tracing::{debug, warn};

use crate::args::UploadConfig;
use crate::error::{Result, UploadError};

/// Media type the upload endpoint requires while it is in preview.
pub const MANIFOLD_PREVIEW: &str = "application/vnd.github.manifold-preview";

/// Body of a 201 Created response.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Asset {
    #[serde(default)]
    pub url: String,
}

/// GitHub-style error body returned with any other status.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ValidationError {
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadResult {
    Success { asset_url: String },
    Failure { status: u16, error: ApiError },
}

impl UploadResult {
    /// Turn a non-201 outcome into an error; yields the asset URL otherwise.
    pub fn into_result(self) -> Result<String> {
        match self {
            UploadResult::Success { asset_url } => Ok(asset_url),
            UploadResult::Failure { status, error } => Err(UploadError::Api {
                status,
                message: error.message,
                request_id: error.request_id,
                documentation_url: error.documentation_url,
                errors: error.errors,
            }),
        }
    }
}

/// Decode a response body. Only 201 counts as success; a body that does
/// not decode leaves every field at its default.
pub fn interpret(status: u16, body: &[u8]) -> UploadResult {
    if status == 201 {
        let asset: Asset = serde_json::from_slice(body).unwrap_or_else(|e| {
            debug!("undecodable asset body: {}", e);
            Asset::default()
        });
        UploadResult::Success {
            asset_url: asset.url,
        }
    } else {
        let error: ApiError = serde_json::from_slice(body).unwrap_or_else(|e| {
            debug!("undecodable error body: {}", e);
            ApiError::default()
        });
        UploadResult::Failure { status, error }
    }
}

/// `basic <base64(token)>`. The token alone is the credential blob; there
/// is no `user:password` pair.
pub fn basic_token(token: &str) -> String {
    format!("basic {}", STANDARD.encode(token.as_bytes()))
}

/// Thin wrapper over a blocking reqwest client.
pub struct Uploader {
    client: Client,
}

impl Uploader {
    /// Build the HTTP client. No request timeout is applied; the call waits
    /// for as long as the transport does.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Option::<Duration>::None)
            .build()
            .map_err(|e| UploadError::Request(format!("failed to build HTTP client: {}", e)))?;
        Ok(Uploader { client })
    }

    /// Assemble the POST for `config` around an already prepared body.
    pub fn build_request(&self, config: &UploadConfig, body: Body) -> Result<Request> {
        let url = config.target.to_url()?;

        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, basic_token(&config.token))
            .header(ACCEPT, MANIFOLD_PREVIEW)
            .header(CONTENT_TYPE, config.content_type.as_str())
            .header(CONTENT_LENGTH, config.file.size)
            .body(body)
            .build()
            .map_err(|e| UploadError::Request(e.to_string()))?;

        debug!(
            url = %request.url(),
            content_type = %config.content_type,
            content_length = config.file.size,
            "built upload request"
        );
        Ok(request)
    }

    /// Stream the local file to the target and interpret the response.
    /// Exactly one request is sent; nothing is retried.
    pub fn upload(&self, config: &UploadConfig) -> Result<UploadResult> {
        let file = File::open(&config.file.path).map_err(|source| UploadError::LocalFile {
            path: config.file.path.clone(),
            source,
        })?;

        let request = self.build_request(config, Body::sized(file, config.file.size))?;
        let res = self.client.execute(request)?;

        let status = res.status().as_u16();
        debug!(status, "upload response received");

        let body = res.bytes().unwrap_or_else(|e| {
            warn!("failed to read response body: {}", e);
            Default::default()
        });
        Ok(interpret(status, &body))
    }
}
