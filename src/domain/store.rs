use crate::error::Result;
use async_trait::async_trait;

/// A single revision of the remote document: raw content plus the opaque
/// version token the store handed out with it. The token carries no meaning
/// beyond equality comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBlob {
    pub content: Vec<u8>,
    pub version: String,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the document at `path`. `Ok(None)` means the document was never
    /// created, which is a legitimate steady state and not an error.
    async fn fetch(&self, path: &str) -> Result<Option<VersionedBlob>>;

    /// Compare-and-swap write. The write only succeeds while
    /// `expected_version` matches the token the store currently holds
    /// (`None` requests create semantics). Returns the new token.
    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected_version: Option<&str>,
        message: &str,
    ) -> Result<String>;
}
