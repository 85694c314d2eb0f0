// Command-line arguments and their resolution into one `UploadConfig`.
// The config is built once here and handed to the uploader by reference.

use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, UploadError};
use crate::target::UploadTarget;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Parser, Debug)]
#[command(name = "gh-asset-upload", version)]
#[command(about = "Upload a local file as a release asset", long_about = None)]
pub struct Cli {
    /// Asset upload URL; a bare path such as repos/OWNER/REPO/releases/ID/assets
    /// is resolved against uploads.github.com
    #[arg(value_name = "ASSET_URL")]
    pub asset_url: String,

    /// Local file to upload
    #[arg(value_name = "LOCAL_FILE")]
    pub local_file: PathBuf,

    /// Your access token
    #[arg(long)]
    pub token: Option<String>,

    /// A custom file name for the asset. Defaults to the local file's base name
    #[arg(long)]
    pub name: Option<String>,

    /// The local file's content type
    #[arg(long = "content_type", value_name = "CONTENT_TYPE")]
    pub content_type: Option<String>,
}

/// Stat'd file on disk. Only metadata is captured here; the file is opened
/// when the upload starts.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub size: u64,
    pub base_name: String,
}

impl LocalFile {
    pub fn stat(path: &Path) -> Result<Self> {
        let local_file_error = |source| UploadError::LocalFile {
            path: path.to_path_buf(),
            source,
        };

        let meta = fs::metadata(path).map_err(local_file_error)?;
        if meta.is_dir() {
            return Err(local_file_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "is a directory",
            )));
        }

        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(LocalFile {
            path: path.to_path_buf(),
            size: meta.len(),
            base_name,
        })
    }
}

/// Everything one upload needs, resolved once from the command line.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Normalized target with the `name` query parameter already set.
    pub target: UploadTarget,
    pub file: LocalFile,
    pub token: String,
    pub name: String,
    pub content_type: String,
}

impl Cli {
    /// Resolve defaults and check the inputs. Empty flag values count as
    /// unset.
    pub fn into_config(self) -> Result<UploadConfig> {
        let mut target = UploadTarget::parse(&self.asset_url)?;
        debug!(?target, "parsed asset url");
        target.normalize();

        let file = LocalFile::stat(&self.local_file)?;

        let name = non_empty(self.name).unwrap_or_else(|| file.base_name.clone());
        target.set_query("name", &name);
        debug!(%target, "resolved upload target");

        let content_type =
            non_empty(self.content_type).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(UploadConfig {
            target,
            file,
            token: self.token.unwrap_or_default(),
            name,
            content_type,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
