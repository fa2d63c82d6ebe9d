pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod services;

pub use config::{Config, Transport};
pub use domain::{Catalog, CatalogApp, Game, GameStatus, RemoteStore, VersionedBlob};
pub use error::{GalleryError, Result};
pub use infrastructure::{ContentApiClient, SteamSearchClient};
pub use services::{CollectionStore, SearchConfig, SearchService};
