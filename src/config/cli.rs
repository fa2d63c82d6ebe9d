use crate::domain::GameStatus;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Base URL of the content API that stores the game list document
    #[clap(long, env = "CONTENT_API_URL")]
    pub store_url: Option<String>,

    /// Document path under the content API base URL
    #[clap(long, env = "CONTENT_API_PATH", default_value = "games.json")]
    pub store_path: String,

    /// Bearer token for the content API
    #[clap(long, env = "CONTENT_API_TOKEN")]
    pub store_token: Option<String>,

    /// SOCKS5 proxy address for outbound calls, wins over HTTP proxies
    #[clap(long, env = "SOCKS_PROXY")]
    pub socks_proxy: Option<String>,

    /// HTTP proxy URL for outbound calls
    #[clap(long, env = "HTTP_PROXY")]
    pub http_proxy: Option<String>,

    /// HTTPS proxy URL, used when no HTTP proxy is set
    #[clap(long, env = "HTTPS_PROXY")]
    pub https_proxy: Option<String>,

    /// Storefront language for search results
    #[arg(long, default_value = "schinese")]
    pub language: String,

    /// Storefront country code for search results
    #[arg(long, default_value = "CN")]
    pub country: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the Steam catalog
    Search {
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Also fetch current player counts
        #[arg(long)]
        players: bool,
    },
    /// Add a game to the list
    Add { app_id: u64, name: String },
    /// Move a game to another status
    Move {
        app_id: u64,
        #[arg(value_enum)]
        status: GameStatus,
    },
    /// Pin a game, or unpin with --unpin
    Pin {
        app_id: u64,
        #[arg(long)]
        unpin: bool,
    },
    /// Remove a game from the list
    Remove { app_id: u64 },
    /// Print the current list
    List,
    /// Print search cache statistics
    Stats,
}
