use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Minimal catalog search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogApp {
    pub app_id: u64,
    pub name: String,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Free-text search against the storefront, capped at `limit` hits.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<CatalogApp>>;

    /// Number of players currently in-game for `app_id`.
    async fn current_players(&self, app_id: u64) -> Result<u64>;
}
