// Core business logic lives here - the brain of the operation
pub mod alias;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod session;

pub use catalog::{CatalogPage, CatalogSource, PokeApiCatalog};
pub use config::Config;
pub use error::Error;
pub use favorites::{AddError, FavoritesStore, MAX_FAVORITES};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
