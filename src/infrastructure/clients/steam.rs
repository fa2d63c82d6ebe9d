use crate::domain::{Catalog, CatalogApp};
use crate::error::{GalleryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const STEAM_SEARCH_URL: &str = "https://store.steampowered.com/api/storesearch/";
pub const STEAM_PLAYERS_URL: &str =
    "https://api.steampowered.com/ISteamUserStats/GetNumberOfCurrentPlayers/v1/";

#[derive(Debug, Deserialize)]
struct StoreSearchResponse {
    #[serde(default)]
    items: Vec<StoreSearchItem>,
}

#[derive(Debug, Deserialize)]
struct StoreSearchItem {
    id: u64,
    #[serde(rename = "type")]
    kind: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CurrentPlayersResponse {
    response: CurrentPlayers,
}

#[derive(Debug, Deserialize)]
struct CurrentPlayers {
    #[serde(default)]
    player_count: u64,
    result: u64,
}

pub struct SteamSearchClient {
    client: Client,
    search_url: String,
    players_url: String,
    language: String,
    country: String,
}

impl SteamSearchClient {
    pub fn new(client: Client, language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            client,
            search_url: STEAM_SEARCH_URL.to_string(),
            players_url: STEAM_PLAYERS_URL.to_string(),
            language: language.into(),
            country: country.into(),
        }
    }

    pub fn with_endpoints(
        mut self,
        search_url: impl Into<String>,
        players_url: impl Into<String>,
    ) -> Self {
        self.search_url = search_url.into();
        self.players_url = players_url.into();
        self
    }
}

#[async_trait]
impl Catalog for SteamSearchClient {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<CatalogApp>> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("term", term),
                ("l", self.language.as_str()),
                ("cc", self.country.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GalleryError::Upstream(format!(
                "store search for '{}' returned status {}",
                term,
                response.status()
            )));
        }

        let data: StoreSearchResponse = response.json().await?;

        // Games only; the storefront mixes in DLC, soundtracks and tools.
        let apps = data
            .items
            .into_iter()
            .filter(|item| item.kind == "app")
            .take(limit)
            .map(|item| CatalogApp {
                app_id: item.id,
                name: item.name,
            })
            .collect::<Vec<_>>();

        debug!("Store search for '{}' matched {} apps", term, apps.len());
        Ok(apps)
    }

    async fn current_players(&self, app_id: u64) -> Result<u64> {
        let response = self
            .client
            .get(&self.players_url)
            .query(&[("appid", app_id.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GalleryError::Upstream(format!(
                "player count for {} returned status {}",
                app_id,
                response.status()
            )));
        }

        let data: CurrentPlayersResponse = response.json().await?;
        if data.response.result != 1 {
            return Err(GalleryError::Upstream(format!(
                "player count for {} returned result code {}",
                app_id, data.response.result
            )));
        }

        Ok(data.response.player_count)
    }
}
