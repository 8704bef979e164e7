//! HTTP client wrapper for Drive API requests.

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{DriveError, Result};

/// Maximum number of body characters kept in a server error message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    /// Create a new HTTP client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| DriveError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(DriveError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| DriveError::InvalidUrl(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| DriveError::Custom(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, base })
    }

    /// Base URL all endpoints are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL by appending path segments to the base.
    ///
    /// Segments are percent-encoded, so opaque ids are safe to pass as-is.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| DriveError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// GET `url` and return the body.
    pub async fn get(&self, url: Url) -> Result<String> {
        debug!(method = "GET", %url, "drive request");
        self.send(self.client.get(url)).await
    }

    /// POST a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<String> {
        debug!(method = "POST", %url, "drive request");
        self.send(self.client.post(url).json(body)).await
    }

    /// PATCH a JSON body.
    pub async fn patch_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<String> {
        debug!(method = "PATCH", %url, "drive request");
        self.send(self.client.patch(url).json(body)).await
    }

    /// POST a multipart form.
    pub async fn post_multipart(&self, url: Url, form: Form) -> Result<String> {
        debug!(method = "POST", %url, "drive multipart request");
        self.send(self.client.post(url).multipart(form)).await
    }

    pub async fn delete(&self, url: Url) -> Result<String> {
        debug!(method = "DELETE", %url, "drive request");
        self.send(self.client.delete(url)).await
    }

    /// GET `url` and hand back the raw response for streaming.
    pub async fn get_stream(&self, url: Url) -> Result<Response> {
        debug!(method = "GET", %url, "drive stream request");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(server_error(status, &body));
        }
        Ok(response)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(server_error(status.as_u16(), &body));
        }

        Ok(response.text().await?)
    }
}

/// Map a failure status and body to [`DriveError::Server`].
///
/// The message comes from an `error` or `detail` field of a JSON body when present,
/// otherwise from the body text itself.
pub(crate) fn server_error(status: u16, body: &str) -> DriveError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
        });

    let message = match from_json {
        Some(msg) => msg,
        None => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY).collect()
            }
        }
    };

    DriveError::Server { status, message }
}
