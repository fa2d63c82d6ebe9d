use gamegallery::config::{Command, Config};
use gamegallery::domain::{contains_game, Game};
use gamegallery::error::{GalleryError, Result};
use gamegallery::infrastructure::{ContentApiClient, SteamSearchClient};
use gamegallery::services::{CollectionStore, SearchConfig, SearchService};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::new()?;

    match &config.args.command {
        Command::Search {
            query,
            limit,
            players,
        } => {
            let search = search_service(&config);
            let results = search.search_shaped(query, *limit, *players).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Stats => {
            let search = search_service(&config);
            println!("{}", serde_json::to_string_pretty(&search.stats().await)?);
        }
        Command::List => {
            let (games, _) = collection_store(&config)?.fetch().await?;
            println!("{}", serde_json::to_string_pretty(&games)?);
        }
        Command::Add { app_id, name } => {
            let store = collection_store(&config)?;
            let id = *app_id;
            let mut added = false;
            store
                .update(&format!("Add {}", name), |mut games| {
                    if !contains_game(&games, id) {
                        added = true;
                        // most recent first
                        games.insert(0, Game::new(id, name.clone()).with_store_links());
                    }
                    games
                })
                .await?;
            if added {
                info!("Added {}", name);
            } else {
                warn!("{} is already in the list", name);
            }
        }
        Command::Move { app_id, status } => {
            let store = collection_store(&config)?;
            let id = *app_id;
            let status = *status;
            let mut found = false;
            store
                .update(&format!("Move {} to {}", id, status), |mut games| {
                    if let Some(game) = games.iter_mut().find(|game| game.id == id) {
                        game.set_status(status);
                        found = true;
                    }
                    games
                })
                .await?;
            if !found {
                warn!("Game {} is not in the list", id);
            }
        }
        Command::Pin { app_id, unpin } => {
            let store = collection_store(&config)?;
            let id = *app_id;
            let pinned = !*unpin;
            let mut found = false;
            let message = if pinned {
                format!("Pin {}", id)
            } else {
                format!("Unpin {}", id)
            };
            store
                .update(&message, |mut games| {
                    if let Some(game) = games.iter_mut().find(|game| game.id == id) {
                        game.set_pinned(pinned);
                        found = true;
                    }
                    games
                })
                .await?;
            if !found {
                warn!("Game {} is not in the list", id);
            }
        }
        Command::Remove { app_id } => {
            let store = collection_store(&config)?;
            let id = *app_id;
            let games = store
                .update(&format!("Remove {}", id), |mut games| {
                    games.retain(|game| game.id != id);
                    games
                })
                .await?;
            info!("{} games remain", games.len());
        }
    }

    Ok(())
}

fn search_service(config: &Config) -> SearchService {
    let catalog = Arc::new(SteamSearchClient::new(
        config.http_client.clone(),
        config.args.language.clone(),
        config.args.country.clone(),
    ));
    SearchService::new(catalog, SearchConfig::default())
}

fn collection_store(config: &Config) -> Result<CollectionStore> {
    let base_url = config
        .args
        .store_url
        .clone()
        .ok_or_else(|| GalleryError::Config("CONTENT_API_URL is not set".to_string()))?;
    let remote = Arc::new(ContentApiClient::new(
        config.http_client.clone(),
        base_url,
        config.args.store_token.clone(),
    ));
    Ok(CollectionStore::new(remote, config.args.store_path.clone()))
}
