use crate::domain::{Game, RemoteStore};
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Client for the shared game-list document. The remote store's
/// compare-and-swap write is the only serialization point; the component
/// keeps no state between calls, so any number of callers (across threads
/// and processes) can use it concurrently.
pub struct CollectionStore {
    remote: Arc<dyn RemoteStore>,
    path: String,
}

impl CollectionStore {
    pub fn new(remote: Arc<dyn RemoteStore + 'static>, path: impl Into<String>) -> Self {
        Self {
            remote,
            path: path.into(),
        }
    }

    /// Current list plus the version token it was read at. A document that
    /// was never created reads as an empty list with no token; transport or
    /// decode problems are errors, never an empty list.
    pub async fn fetch(&self) -> Result<(Vec<Game>, Option<String>)> {
        match self.remote.fetch(&self.path).await? {
            Some(blob) => {
                let games: Vec<Game> = serde_json::from_slice(&blob.content)?;
                Ok((games, Some(blob.version)))
            }
            None => Ok((Vec::new(), None)),
        }
    }

    /// Apply `transform` to the freshest remote state and write the result
    /// back with exactly one compare-and-swap attempt.
    ///
    /// A concurrent writer committing between the fetch and the write
    /// surfaces as a conflict error; there is no automatic retry. A caller
    /// that wants retry-with-fresh-precondition calls `update` again, which
    /// re-runs the transform against the newer list.
    pub async fn update<F>(&self, description: &str, transform: F) -> Result<Vec<Game>>
    where
        F: FnOnce(Vec<Game>) -> Vec<Game>,
    {
        let (games, version) = self.fetch().await?;
        let updated = transform(games);
        let content = serde_json::to_vec_pretty(&updated)?;

        match self
            .remote
            .put(&self.path, &content, version.as_deref(), description)
            .await
        {
            Ok(_) => {
                info!(
                    "Wrote {} games to {} ({})",
                    updated.len(),
                    self.path,
                    description
                );
                Ok(updated)
            }
            Err(err) => {
                if err.is_conflict() {
                    warn!("Concurrent write to {} detected, not retrying", self.path);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{contains_game, VersionedBlob};
    use crate::error::GalleryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory stand-in for the remote content API with genuine
    /// compare-and-swap semantics. `fail_fetch` simulates a network fault;
    /// `competing_write` commits another writer's content right after the
    /// next fetch, so the token that fetch returned is already stale.
    #[derive(Default)]
    struct MemoryRemote {
        state: Mutex<MemoryState>,
        fail_fetch: AtomicBool,
        competing_write: Mutex<Option<Vec<u8>>>,
    }

    #[derive(Default)]
    struct MemoryState {
        document: Option<(Vec<u8>, u64)>,
        revision: u64,
    }

    impl MemoryRemote {
        fn seed(&self, content: &[u8]) {
            let mut state = self.state.lock().unwrap();
            state.revision += 1;
            let revision = state.revision;
            state.document = Some((content.to_vec(), revision));
        }

        fn document(&self) -> Option<Vec<u8>> {
            let state = self.state.lock().unwrap();
            state.document.as_ref().map(|(content, _)| content.clone())
        }
    }

    #[async_trait]
    impl RemoteStore for MemoryRemote {
        async fn fetch(&self, _path: &str) -> Result<Option<VersionedBlob>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(GalleryError::Store("simulated outage".to_string()));
            }
            let blob = {
                let state = self.state.lock().unwrap();
                state
                    .document
                    .as_ref()
                    .map(|(content, revision)| VersionedBlob {
                        content: content.clone(),
                        version: revision.to_string(),
                    })
            };
            if let Some(content) = self.competing_write.lock().unwrap().take() {
                self.seed(&content);
            }
            Ok(blob)
        }

        async fn put(
            &self,
            _path: &str,
            content: &[u8],
            expected_version: Option<&str>,
            _message: &str,
        ) -> Result<String> {
            tokio::task::yield_now().await;
            let mut state = self.state.lock().unwrap();
            let current = state
                .document
                .as_ref()
                .map(|(_, revision)| revision.to_string());
            if expected_version != current.as_deref() {
                return Err(GalleryError::Conflict("stale version token".to_string()));
            }
            state.revision += 1;
            let revision = state.revision;
            state.document = Some((content.to_vec(), revision));
            Ok(revision.to_string())
        }
    }

    fn store(remote: &Arc<MemoryRemote>) -> CollectionStore {
        CollectionStore::new(remote.clone(), "games.json")
    }

    fn encoded(games: &[Game]) -> Vec<u8> {
        serde_json::to_vec_pretty(games).unwrap()
    }

    #[tokio::test]
    async fn missing_document_reads_as_empty_list() {
        let remote = Arc::new(MemoryRemote::default());
        let (games, version) = store(&remote).fetch().await.unwrap();
        assert!(games.is_empty());
        assert!(version.is_none());
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error_not_an_empty_list() {
        let remote = Arc::new(MemoryRemote::default());
        remote.fail_fetch.store(true, Ordering::SeqCst);
        assert!(store(&remote).fetch().await.is_err());
    }

    #[tokio::test]
    async fn refetch_returns_the_same_version_token() {
        let remote = Arc::new(MemoryRemote::default());
        remote.seed(&encoded(&[Game::new(620, "Portal 2")]));
        let store = store(&remote);
        let (_, first) = store.fetch().await.unwrap();
        let (_, second) = store.fetch().await.unwrap();
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[tokio::test]
    async fn update_creates_the_document() {
        let remote = Arc::new(MemoryRemote::default());
        let store = store(&remote);

        let games = store
            .update("Add Portal 2", |mut games| {
                games.push(Game::new(620, "Portal 2"));
                games
            })
            .await
            .unwrap();

        assert_eq!(games.len(), 1);
        let (fetched, version) = store.fetch().await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert!(version.is_some());
    }

    #[tokio::test]
    async fn stale_token_write_surfaces_a_conflict() {
        let remote = Arc::new(MemoryRemote::default());
        remote.seed(&encoded(&[Game::new(620, "Portal 2")]));
        let competing = encoded(&[Game::new(620, "Portal 2"), Game::new(570, "Dota 2")]);
        *remote.competing_write.lock().unwrap() = Some(competing.clone());

        let err = store(&remote)
            .update("Add Celeste", |mut games| {
                games.push(Game::new(504230, "Celeste"));
                games
            })
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        // the loser's write left no trace
        assert_eq!(remote.document().unwrap(), competing);
    }

    #[tokio::test]
    async fn retry_after_conflict_sees_the_fresh_list() {
        let remote = Arc::new(MemoryRemote::default());
        remote.seed(&encoded(&[Game::new(620, "Portal 2")]));
        *remote.competing_write.lock().unwrap() =
            Some(encoded(&[Game::new(620, "Portal 2"), Game::new(570, "Dota 2")]));
        let store = store(&remote);

        let add_celeste = |mut games: Vec<Game>| {
            if !contains_game(&games, 504230) {
                games.push(Game::new(504230, "Celeste"));
            }
            games
        };

        assert!(store.update("Add Celeste", add_celeste).await.unwrap_err().is_conflict());

        let games = store.update("Add Celeste", add_celeste).await.unwrap();
        assert_eq!(games.len(), 3);
        assert!(contains_game(&games, 570));
        assert!(contains_game(&games, 504230));
    }

    #[tokio::test]
    async fn concurrent_updates_never_lose_a_write_silently() {
        let remote = Arc::new(MemoryRemote::default());
        remote.seed(&encoded(&[Game::new(1, "A")]));
        let store_b = store(&remote);
        let store_c = store(&remote);

        let append_b = store_b.update("Add B", |mut games| {
            games.push(Game::new(2, "B"));
            games
        });
        let append_c = store_c.update("Add C", |mut games| {
            games.push(Game::new(3, "C"));
            games
        });
        let (result_b, result_c) = tokio::join!(append_b, append_c);

        let final_games: Vec<Game> =
            serde_json::from_slice(&remote.document().unwrap()).unwrap();
        match (&result_b, &result_c) {
            (Ok(_), Ok(_)) => {
                assert!(contains_game(&final_games, 2));
                assert!(contains_game(&final_games, 3));
            }
            (Ok(_), Err(err)) => {
                assert!(err.is_conflict());
                assert!(contains_game(&final_games, 2));
            }
            (Err(err), Ok(_)) => {
                assert!(err.is_conflict());
                assert!(contains_game(&final_games, 3));
            }
            (Err(_), Err(_)) => panic!("at most one of two racing writes may fail"),
        }
    }

    #[tokio::test]
    async fn undecodable_document_changes_nothing() {
        let remote = Arc::new(MemoryRemote::default());
        remote.seed(b"not json");

        let result = store(&remote)
            .update("Add Portal 2", |mut games| {
                games.push(Game::new(620, "Portal 2"));
                games
            })
            .await;

        assert!(matches!(result, Err(GalleryError::Serialization(_))));
        assert_eq!(remote.document().unwrap(), b"not json");
    }
}
