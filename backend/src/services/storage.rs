//! Blob storage for chat attachments

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
/// Query flag that makes the file route answer with an attachment disposition
pub const DOWNLOAD_QUERY: &str = "download=1";
const SUFFIX_LEN: usize = 12;

/// Metadata returned for a stored blob
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    pub url: String,
    pub download_url: String,
    pub pathname: String,
    pub content_type: String,
    pub content_disposition: String,
    pub size: usize,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a name derived from `file_name`
    async fn put(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> AppResult<StoredBlob>;
}

/// Blob store writing to a local directory served under a public URL
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_root(&config.upload_dir, &config.public_base_url)
    }

    pub fn with_root(root: impl AsRef<Path>, public_base_url: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> AppResult<StoredBlob> {
        let pathname = suffixed_pathname(file_name, &random_suffix());

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(self.root.join(&pathname), data)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to write {}: {}", pathname, e)))?;

        tracing::info!(pathname = %pathname, size = data.len(), "Stored upload");

        let url = format!("{}/{}", self.public_base_url, pathname);
        Ok(StoredBlob {
            download_url: format!("{}?{}", url, DOWNLOAD_QUERY),
            url,
            content_disposition: attachment_disposition(&pathname),
            pathname,
            content_type: content_type.unwrap_or(DEFAULT_CONTENT_TYPE).to_string(),
            size: data.len(),
        })
    }
}

/// `Content-Disposition` value for downloading `pathname`
pub fn attachment_disposition(pathname: &str) -> String {
    format!("attachment; filename=\"{}\"", pathname)
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_string()
}

/// `photo.png` + `abc` → `photo-abc.png`.
///
/// Directory components are dropped and unsafe characters replaced so the
/// result is a single file name.
pub fn suffixed_pathname(file_name: &str, suffix: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");
    let clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let clean = clean.trim_matches('.');

    match clean.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{}-{}.{}", stem, suffix, ext)
        }
        _ if clean.is_empty() => format!("file-{}", suffix),
        _ => format!("{}-{}", clean, suffix),
    }
}
