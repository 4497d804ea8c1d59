// Catalog access - bridges the PokeAPI client with the CatalogSource trait
use async_trait::async_trait;
use pokescout_api::{PokeApiClient, PokeApiError, PokemonDetail, PokemonListItem};

use crate::{
    models::{PokemonDetails, PokemonSummary, StatValue},
    Error, Result,
};

/// One page of the catalog as the UI consumes it
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub total: u32,
    pub items: Vec<PokemonSummary>,
}

/// Trait for catalog sources - makes testing easier and keeps things flexible
///
/// The TUI and CLI only ever see this trait, so tests can swap in a mock
/// instead of a live HTTP client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<CatalogPage>;
    async fn fetch_detail(&self, name_or_id: &str) -> Result<PokemonDetails>;
}

/// Wrapper around PokeApiClient that implements CatalogSource
pub struct PokeApiCatalog {
    client: PokeApiClient,
}

impl PokeApiCatalog {
    pub fn new(client: PokeApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for PokeApiCatalog {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<CatalogPage> {
        let page = self
            .client
            .fetch_page(limit, offset)
            .await
            .map_err(map_api_error)?;

        Ok(CatalogPage {
            total: page.count,
            items: page.items.into_iter().map(item_to_summary).collect(),
        })
    }

    async fn fetch_detail(&self, name_or_id: &str) -> Result<PokemonDetails> {
        let raw = self
            .client
            .fetch_detail(name_or_id)
            .await
            .map_err(map_api_error)?;

        Ok(detail_to_details(raw))
    }
}

fn map_api_error(err: PokeApiError) -> Error {
    match err {
        PokeApiError::NotFound(query) => Error::NotFound(query),
        other => Error::CatalogError(other.to_string()),
    }
}

fn item_to_summary(item: PokemonListItem) -> PokemonSummary {
    PokemonSummary {
        id: item.id,
        name: item.name,
        image: item.image,
    }
}

/// Convert the raw wire detail into the view model, defaulting every
/// missing nested field instead of failing.
fn detail_to_details(raw: PokemonDetail) -> PokemonDetails {
    let types = raw
        .types
        .into_iter()
        .filter_map(|slot| slot.kind.map(|kind| kind.name))
        .filter(|name| !name.is_empty())
        .collect();

    let abilities = raw
        .abilities
        .into_iter()
        .filter_map(|slot| slot.ability.map(|ability| ability.name))
        .filter(|name| !name.is_empty())
        .collect();

    let stats = raw
        .stats
        .into_iter()
        .map(|slot| StatValue {
            name: slot
                .stat
                .map(|stat| stat.name)
                .unwrap_or_else(|| "stat".to_string()),
            value: slot.base_stat,
        })
        .collect();

    PokemonDetails {
        id: raw.id,
        name: raw.name,
        height: raw.height,
        weight: raw.weight,
        base_experience: raw.base_experience.unwrap_or(0),
        order: raw.order,
        species: raw.species.map(|species| species.name).unwrap_or_default(),
        types,
        abilities,
        stats,
        moves_count: raw.moves.len(),
        forms_count: raw.forms.len(),
        held_items_count: raw.held_items.len(),
        image: raw.sprites.front_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_a_full_detail_record() {
        let raw: PokemonDetail = serde_json::from_value(json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "base_experience": 112,
            "order": 35,
            "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
            "sprites": {"front_default": "https://sprites/25.png"},
            "types": [{"type": {"name": "electric", "url": "u"}}],
            "abilities": [
                {"ability": {"name": "static", "url": "u"}},
                {"ability": {"name": "lightning-rod", "url": "u"}}
            ],
            "stats": [
                {"base_stat": 35, "stat": {"name": "hp", "url": "u"}},
                {"base_stat": 55, "stat": {"name": "attack", "url": "u"}}
            ],
            "moves": [1, 2, 3],
            "forms": [1],
            "held_items": []
        }))
        .unwrap();

        let details = detail_to_details(raw);

        assert_eq!(details.id, 25);
        assert_eq!(details.species, "pikachu");
        assert_eq!(details.types, vec!["electric"]);
        assert_eq!(details.abilities, vec!["static", "lightning-rod"]);
        assert_eq!(
            details.stats,
            vec![
                StatValue { name: "hp".to_string(), value: 35 },
                StatValue { name: "attack".to_string(), value: 55 },
            ]
        );
        assert_eq!(details.moves_count, 3);
        assert_eq!(details.forms_count, 1);
        assert_eq!(details.held_items_count, 0);
        assert_eq!(details.image.as_deref(), Some("https://sprites/25.png"));
    }

    #[test]
    fn maps_a_gutted_record_to_defaults() {
        let raw: PokemonDetail = serde_json::from_value(json!({
            "name": "missingno",
            "types": [{"slot": 1}],
            "stats": [{"base_stat": 33}]
        }))
        .unwrap();

        let details = detail_to_details(raw);

        assert_eq!(details.id, 0);
        assert_eq!(details.name, "missingno");
        assert_eq!(details.base_experience, 0);
        assert_eq!(details.species, "");
        assert!(details.types.is_empty());
        // a stat with no name keeps its value under the placeholder name
        assert_eq!(details.stats[0].name, "stat");
        assert_eq!(details.stats[0].value, 33);
        assert!(details.image.is_none());
    }

    #[tokio::test]
    async fn mocked_source_drives_callers_through_the_trait() {
        let mut source = MockCatalogSource::new();
        source.expect_fetch_page().returning(|limit, offset| {
            assert_eq!((limit, offset), (10, 0));
            Ok(CatalogPage {
                total: 1302,
                items: vec![PokemonSummary {
                    id: 1,
                    name: "bulbasaur".to_string(),
                    image: "img-1".to_string(),
                }],
            })
        });

        let page = source.fetch_page(10, 0).await.unwrap();
        assert_eq!(page.total, 1302);
        assert_eq!(page.items[0].name, "bulbasaur");
    }
}
