use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    Queued,
    InProgress,
    Completed,
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GameStatus::Queued => "queued",
            GameStatus::InProgress => "in-progress",
            GameStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    pub name: String,
    pub status: GameStatus,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl Game {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            status: GameStatus::Queued,
            added_at: now,
            updated_at: now,
            steam_url: None,
            cover_image: None,
            rating_percent: None,
            review_count: None,
            release_date: None,
            tags: Vec::new(),
            pinned: false,
        }
    }

    pub fn with_store_links(mut self) -> Self {
        self.steam_url = Some(format!("https://store.steampowered.com/app/{}", self.id));
        self.cover_image = Some(format!(
            "https://cdn.cloudflare.steamstatic.com/steam/apps/{}/capsule_sm_120.jpg",
            self.id
        ));
        self
    }

    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Identifiers are unique within the document; transforms use this for
/// duplicate detection against the list they are handed.
pub fn contains_game(games: &[Game], id: u64) -> bool {
    games.iter().any(|game| game.id == id)
}
