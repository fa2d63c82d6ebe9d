use crate::domain::{RemoteStore, VersionedBlob};
use crate::error::{GalleryError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ContentFile {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: ContentStamp,
}

#[derive(Debug, Deserialize)]
struct ContentStamp {
    sha: String,
}

/// Adapter for a contents-style HTTP API: documents are base64 files, every
/// read carries a content hash, and every write must present the hash it is
/// replacing. Writes against a stale hash come back as a conflict status.
pub struct ContentApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ContentApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            token,
        }
    }

    fn document_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// The API wraps file content in newline-padded base64.
fn decode_content(raw: &str) -> Result<Vec<u8>> {
    let compact: String = raw.split_whitespace().collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GalleryError::Decode(format!("invalid base64 content: {e}")))
}

#[async_trait]
impl RemoteStore for ContentApiClient {
    async fn fetch(&self, path: &str) -> Result<Option<VersionedBlob>> {
        let url = self.document_url(path);
        let response = self.authorize(self.client.get(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Document {} does not exist yet", path);
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GalleryError::Store(format!(
                "fetch of {} returned status {}",
                path,
                response.status()
            )));
        }

        let file: ContentFile = response.json().await?;
        let content = decode_content(&file.content)?;
        Ok(Some(VersionedBlob {
            content,
            version: file.sha,
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected_version: Option<&str>,
        message: &str,
    ) -> Result<String> {
        let url = self.document_url(path);
        let body = PutRequest {
            message,
            content: STANDARD.encode(content),
            sha: expected_version,
        };
        let response = self
            .authorize(self.client.put(&url))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                warn!("Write to {} rejected: version token is stale", path);
                Err(GalleryError::Conflict(format!(
                    "stale version token for {}",
                    path
                )))
            }
            status if !status.is_success() => Err(GalleryError::Store(format!(
                "write to {} returned status {}",
                path, status
            ))),
            _ => {
                let stamped: PutResponse = response.json().await?;
                Ok(stamped.content.sha)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_newline_wrapped_base64() {
        // 60-column wrapping as contents APIs emit it
        let wrapped = "eyJnYW1l\ncyI6W119\n";
        assert_eq!(decode_content(wrapped).unwrap(), br#"{"games":[]}"#);
    }

    #[test]
    fn garbled_content_is_a_decode_error() {
        let err = decode_content("not base64 at all!").unwrap_err();
        assert!(matches!(err, GalleryError::Decode(_)));
    }

    #[test]
    fn document_urls_join_without_duplicate_slashes() {
        let client = ContentApiClient::new(Client::new(), "https://api.example.com/store/", None);
        assert_eq!(
            client.document_url("/lists/games.json"),
            "https://api.example.com/store/lists/games.json"
        );
    }
}
