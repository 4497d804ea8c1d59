// Wire model for the detail endpoint.
//
// The detail payload is huge and loosely versioned, so every field here
// defaults when missing or null. A record that decodes to all-defaults is
// still a valid record; only transport and non-JSON bodies fail.
use serde::Deserialize;

use crate::pokeapi::NamedResource;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PokemonDetail {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub species: Option<NamedResource>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    // Only the lengths of these are interesting; decoding the elements as
    // raw values means a shape change upstream cannot fail the record.
    #[serde(default)]
    pub moves: Vec<serde_json::Value>,
    #[serde(default)]
    pub forms: Vec<serde_json::Value>,
    #[serde(default)]
    pub held_items: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeSlot {
    #[serde(default, rename = "type")]
    pub kind: Option<NamedResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbilitySlot {
    #[serde(default)]
    pub ability: Option<NamedResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatSlot {
    #[serde(default)]
    pub base_stat: u32,
    #[serde(default)]
    pub stat: Option<NamedResource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_decodes_to_defaults() {
        let detail: PokemonDetail = serde_json::from_value(json!({})).unwrap();

        assert_eq!(detail.id, 0);
        assert_eq!(detail.name, "");
        assert_eq!(detail.base_experience, None);
        assert!(detail.species.is_none());
        assert!(detail.types.is_empty());
        assert!(detail.stats.is_empty());
        assert!(detail.moves.is_empty());
        assert!(detail.sprites.front_default.is_none());
    }

    #[test]
    fn partial_record_keeps_what_is_present() {
        let detail: PokemonDetail = serde_json::from_value(json!({
            "id": 25,
            "name": "pikachu",
            "base_experience": null,
            "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
            "types": [
                {"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}},
                {"slot": 2}
            ],
            "stats": [
                {"base_stat": 35, "stat": {"name": "hp", "url": "https://pokeapi.co/api/v2/stat/1/"}}
            ],
            "moves": [{"move": {"name": "thunder-shock"}}, {"move": {"name": "quick-attack"}}]
        }))
        .unwrap();

        assert_eq!(detail.id, 25);
        assert_eq!(detail.name, "pikachu");
        assert_eq!(detail.base_experience, None);
        assert_eq!(detail.species.as_ref().unwrap().name, "pikachu");
        assert_eq!(detail.types.len(), 2);
        assert_eq!(detail.types[0].kind.as_ref().unwrap().name, "electric");
        assert!(detail.types[1].kind.is_none());
        assert_eq!(detail.stats[0].base_stat, 35);
        assert_eq!(detail.moves.len(), 2);
        assert!(detail.forms.is_empty());
    }
}
