// HTTP access layer for the public PokeAPI
pub mod detail;
pub mod pokeapi;

// Re-export common types
pub use detail::{PokemonDetail, Sprites};
pub use pokeapi::{NamedResource, PokeApiClient, PokeApiError, PokemonListItem, PokemonPage};
