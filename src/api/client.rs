//! HTTP implementation of [`DriveApi`].

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::DriveApi;
use crate::config::ClientConfig;
use crate::error::{DriveError, Result};
use crate::fs::{FolderEntry, FolderRef, ItemKind, Listing, UploadFile};
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct BreadcrumbsResponse {
    breadcrumbs: Vec<FolderRef>,
}

#[derive(Debug, Serialize)]
struct RenameRequest<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: ItemKind,
    name: &'a str,
}

/// Drive API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Create a client configured from `DRIVE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Create a client for `base_url` with default settings.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(&ClientConfig::new(base_url))
    }

    fn list_url(&self, parent_id: Option<&str>) -> Result<reqwest::Url> {
        let mut url = self.http.endpoint(&["drive", "list"])?;
        if let Some(parent) = parent_id {
            url.query_pairs_mut().append_pair("parent_id", parent);
        }
        Ok(url)
    }

    fn item_url(&self, id: &str, kind: ItemKind) -> Result<reqwest::Url> {
        let mut url = self.http.endpoint(&["drive", "item", id])?;
        url.query_pairs_mut().append_pair("type", kind.as_str());
        Ok(url)
    }

    /// Stream a file's bytes to `path`, returning the number of bytes written.
    ///
    /// A partially written file is removed when the transfer fails.
    pub async fn download_to_file<P: AsRef<Path>>(&self, file_id: &str, path: P) -> Result<u64> {
        let url = self.http.endpoint(&["drive", "download", file_id])?;
        let response = self.http.get_stream(url).await?;

        let path = path.as_ref();
        let mut out = tokio::fs::File::create(path).await?;
        match write_stream(response, &mut out).await {
            Ok(written) => {
                debug!(file_id, bytes = written, "download complete");
                Ok(written)
            }
            Err(e) => {
                drop(out);
                if let Err(rm) = tokio::fs::remove_file(path).await {
                    warn!(path = %path.display(), error = %rm, "failed to remove partial download");
                }
                Err(e)
            }
        }
    }
}

async fn write_stream(response: reqwest::Response, out: &mut tokio::fs::File) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}

#[async_trait]
impl DriveApi for ApiClient {
    async fn list(&self, parent_id: Option<&str>) -> Result<Listing> {
        let body = self.http.get(self.list_url(parent_id)?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn breadcrumbs(&self, folder_id: &str) -> Result<Vec<FolderRef>> {
        let url = self.http.endpoint(&["drive", "breadcrumbs", folder_id])?;
        let body = self.http.get(url).await?;
        let response: BreadcrumbsResponse = serde_json::from_str(&body)?;
        Ok(response.breadcrumbs)
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<FolderEntry> {
        let url = self.http.endpoint(&["drive", "folder"])?;
        let body = self
            .http
            .post_json(url, &json!({ "name": name, "parent_id": parent_id }))
            .await?;
        let folder: FolderEntry = serde_json::from_str(&body)?;
        info!(id = %folder.id, name = %folder.name, "folder created");
        Ok(folder)
    }

    async fn upload(&self, file: UploadFile, parent_id: Option<&str>) -> Result<()> {
        let url = self.http.endpoint(&["drive", "upload"])?;
        let mime = file.mime_type();
        let UploadFile { name, data } = file;
        let size = data.len();

        let part = Part::bytes(data)
            .file_name(name.clone())
            .mime_str(&mime)
            .map_err(|e| DriveError::InvalidResponse(format!("bad mime type {mime}: {e}")))?;
        let mut form = Form::new().part("file", part);
        if let Some(parent) = parent_id {
            form = form.text("parent_id", parent.to_string());
        }

        self.http.post_multipart(url, form).await?;
        info!(name = %name, size, "file uploaded");
        Ok(())
    }

    async fn rename(&self, id: &str, kind: ItemKind, new_name: &str) -> Result<()> {
        let url = self.http.endpoint(&["drive", "rename"])?;
        let request = RenameRequest {
            id,
            kind,
            name: new_name,
        };
        self.http.patch_json(url, &request).await?;
        info!(id, %kind, "item renamed");
        Ok(())
    }

    async fn delete(&self, id: &str, kind: ItemKind) -> Result<()> {
        self.http.delete(self.item_url(id, kind)?).await?;
        info!(id, %kind, "item deleted");
        Ok(())
    }

    fn download_url(&self, file_id: &str) -> Result<String> {
        Ok(self
            .http
            .endpoint(&["drive", "download", file_id])?
            .to_string())
    }
}
