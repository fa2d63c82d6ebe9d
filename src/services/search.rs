use crate::domain::{Catalog, CatalogApp};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

struct CacheEntry {
    results: Vec<CatalogApp>,
    fetched_at: Instant,
}

/// Search hit shaped the way the collection UI consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct GameSearchResult {
    pub id: u64,
    pub name: String,
    #[serde(rename = "steamUrl")]
    pub steam_url: String,
    #[serde(rename = "coverImage")]
    pub cover_image: String,
    #[serde(rename = "currentPlayers", skip_serializing_if = "Option::is_none")]
    pub current_players: Option<u64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub cached_searches: usize,
    pub cache_ttl: String,
}

/// Memoizes catalog searches for a bounded time so repeated queries stay off
/// the upstream API. Entries past the TTL are never served; the sweeper only
/// bounds memory.
pub struct SearchService {
    catalog: Arc<dyn Catalog>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    sweep_interval: Duration,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn Catalog + 'static>, config: SearchConfig) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
            ttl: config.ttl,
            sweep_interval: config.sweep_interval,
        }
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogApp>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // A smaller limit must not reuse a larger cached result, so the
        // limit is part of the key.
        let key = format!("{}:{}", query, limit);

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    debug!("Cache hit for query '{}'", query);
                    return Ok(entry.results.clone());
                }
            }
        }

        // Miss or expired. The upstream call happens outside the lock so a
        // slow response cannot stall unrelated reads; two simultaneous
        // misses may both reach upstream, last write wins.
        debug!("Cache miss for query '{}', fetching from catalog", query);
        let results = self.catalog.search(query, limit).await?;

        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CacheEntry {
                results: results.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(results)
    }

    /// Search plus the result shaping the tracker UI expects. Player counts
    /// are fetched concurrently when requested; a failed lookup leaves that
    /// field empty instead of failing the whole search.
    pub async fn search_shaped(
        &self,
        query: &str,
        limit: usize,
        include_players: bool,
    ) -> Result<Vec<GameSearchResult>> {
        let apps = self.search(query, limit).await?;

        let mut player_counts: HashMap<u64, u64> = HashMap::new();
        if include_players && !apps.is_empty() {
            let mut lookups = JoinSet::new();
            for app in &apps {
                let catalog = Arc::clone(&self.catalog);
                let app_id = app.app_id;
                lookups.spawn(async move { (app_id, catalog.current_players(app_id).await) });
            }
            while let Some(joined) = lookups.join_next().await {
                match joined {
                    Ok((app_id, Ok(count))) => {
                        player_counts.insert(app_id, count);
                    }
                    Ok((app_id, Err(err))) => {
                        warn!("Player count lookup for {} failed: {}", app_id, err)
                    }
                    Err(err) => warn!("Player count task failed: {}", err),
                }
            }
        }

        Ok(apps
            .into_iter()
            .map(|app| GameSearchResult {
                id: app.app_id,
                steam_url: format!("https://store.steampowered.com/app/{}", app.app_id),
                cover_image: format!(
                    "https://cdn.cloudflare.steamstatic.com/steam/apps/{}/capsule_sm_120.jpg",
                    app.app_id
                ),
                current_players: player_counts.get(&app.app_id).copied(),
                tags: Vec::new(),
                name: app.name,
            })
            .collect())
    }

    /// One sweep cycle: drop every entry past the TTL under the write lock.
    /// Returns the number of evicted entries.
    pub async fn sweep_expired(&self) -> usize {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        let evicted = before - cache.len();
        if evicted > 0 {
            info!("Swept {} expired search cache entries", evicted);
        }
        evicted
    }

    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        CacheStats {
            cached_searches: cache.len(),
            cache_ttl: format!("{:?}", self.ttl),
        }
    }
}

/// Periodic eviction so the cache stays bounded between reads. The read
/// path enforces the TTL on its own; losing this task costs memory, not
/// correctness.
pub fn spawn_sweeper(service: Arc<SearchService>) -> SweeperHandle {
    let interval = service.sweep_interval;
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            service.sweep_expired().await;
        }
    });
    SweeperHandle { handle }
}

pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
