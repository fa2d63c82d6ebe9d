mod clients;

pub use clients::{
    content_api::ContentApiClient,
    steam::{SteamSearchClient, STEAM_PLAYERS_URL, STEAM_SEARCH_URL},
};
