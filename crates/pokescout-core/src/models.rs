use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name: String,
    pub image: String,
}

/// What the caller hands to the favorites store when adding
#[derive(Debug, Clone)]
pub struct FavoriteCandidate {
    pub id: u32,
    pub name: String,
    pub image: String,
}

impl From<PokemonSummary> for FavoriteCandidate {
    fn from(summary: PokemonSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: summary.image,
        }
    }
}

/// A favorited pokemon, enriched with the user's alias and the moment it
/// was saved.
///
/// `name`, `image` and `created_at` never change after creation; only the
/// alias is editable. The snapshot wire format is camelCase, matching the
/// persisted `createdAt` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: u32,
    pub name: String,
    pub alias: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl FavoriteEntry {
    /// Build a fresh entry from a candidate; the alias starts as the name.
    pub fn from_candidate(candidate: FavoriteCandidate) -> Self {
        Self {
            id: candidate.id,
            alias: candidate.name.clone(),
            name: candidate.name,
            image: candidate.image,
            created_at: Utc::now(),
        }
    }
}

/// A single base stat value on the detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub value: u32,
}

/// Fully-mapped detail record as the UI consumes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub base_experience: u32,
    pub order: i32,
    pub species: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatValue>,
    pub moves_count: usize,
    pub forms_count: usize,
    pub held_items_count: usize,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_defaults_alias_to_name() {
        let entry = FavoriteEntry::from_candidate(FavoriteCandidate {
            id: 25,
            name: "pikachu".to_string(),
            image: "sprites/25.png".to_string(),
        });

        assert_eq!(entry.alias, "pikachu");
        assert_eq!(entry.name, "pikachu");
    }

    #[test]
    fn entry_serializes_camel_case() {
        let entry = FavoriteEntry::from_candidate(FavoriteCandidate {
            id: 1,
            name: "bulbasaur".to_string(),
            image: "sprites/1.png".to_string(),
        });

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
