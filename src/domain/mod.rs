mod catalog;
mod game;
mod store;

pub use catalog::{Catalog, CatalogApp};
pub use game::{contains_game, Game, GameStatus};
pub use store::{RemoteStore, VersionedBlob};
