use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detail::PokemonDetail;

const POKEAPI_BASE: &str = "https://pokeapi.co/api/v2";
const SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Error, Debug)]
pub enum PokeApiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Pokemon not found: {0}")]
    NotFound(String),

    #[error("Could not parse a pokemon id from resource URL: {0}")]
    MalformedResource(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PokeApiError>;

/// A `{name, url}` reference as the list endpoint returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PokemonListResponse {
    count: u32,
    #[serde(default)]
    results: Vec<NamedResource>,
}

/// One row of a catalog page, with the id already pulled out of the
/// resource URL and a sprite URL built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonListItem {
    pub id: u32,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct PokemonPage {
    pub count: u32,
    pub items: Vec<PokemonListItem>,
}

pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
    sprite_base_url: String,
}

impl PokeApiClient {
    pub fn new() -> Self {
        Self::with_base_urls(POKEAPI_BASE.to_string(), SPRITE_BASE.to_string())
    }

    /// For mirrors or testing with a custom API URL
    pub fn with_base_urls(base_url: String, sprite_base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("PokeScout/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            sprite_base_url,
        }
    }

    /// Fetch one page of the pokemon catalog
    pub async fn fetch_page(&self, limit: u32, offset: u32) -> Result<PokemonPage> {
        let url = format!("{}/pokemon", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .send()
            .await?;

        if response.status() == 429 {
            return Err(PokeApiError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PokeApiError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let listing: PokemonListResponse = response.json().await?;
        tracing::debug!(
            count = listing.count,
            results = listing.results.len(),
            "fetched catalog page"
        );

        let items = listing
            .results
            .into_iter()
            .map(|resource| self.map_list_item(resource))
            .collect::<Result<Vec<_>>>()?;

        Ok(PokemonPage {
            count: listing.count,
            items,
        })
    }

    /// Fetch the detail record for a pokemon by name or numeric id
    pub async fn fetch_detail(&self, name_or_id: &str) -> Result<PokemonDetail> {
        let segment = urlencoding::encode(name_or_id);
        let url = format!("{}/pokemon/{}", self.base_url, segment);

        let response = self.client.get(&url).send().await?;

        if response.status() == 404 {
            return Err(PokeApiError::NotFound(name_or_id.to_string()));
        }

        if response.status() == 429 {
            return Err(PokeApiError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PokeApiError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let detail: PokemonDetail = response.json().await?;
        Ok(detail)
    }

    /// Sprite image URL for a pokemon id
    pub fn sprite_url(&self, id: u32) -> String {
        format!("{}/{}.png", self.sprite_base_url, id)
    }

    fn map_list_item(&self, resource: NamedResource) -> Result<PokemonListItem> {
        let id = parse_resource_id(&resource.url)?;
        Ok(PokemonListItem {
            id,
            name: resource.name,
            image: self.sprite_url(id),
        })
    }
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the numeric id out of a `.../pokemon/{id}/` resource URL.
///
/// The list endpoint never returns ids directly, only URLs, so a URL that
/// does not end in a numeric pokemon segment is a broken API contract.
pub fn parse_resource_id(url: &str) -> Result<u32> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let (prefix, segment) = trimmed
        .rsplit_once('/')
        .ok_or_else(|| PokeApiError::MalformedResource(url.to_string()))?;

    if !prefix.ends_with("/pokemon") {
        return Err(PokeApiError::MalformedResource(url.to_string()));
    }

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PokeApiError::MalformedResource(url.to_string()));
    }

    segment
        .parse::<u32>()
        .map_err(|_| PokeApiError::MalformedResource(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_with_trailing_slash() {
        let id = parse_resource_id("https://pokeapi.co/api/v2/pokemon/25/").unwrap();
        assert_eq!(id, 25);
    }

    #[test]
    fn parses_id_without_trailing_slash() {
        let id = parse_resource_id("https://pokeapi.co/api/v2/pokemon/151").unwrap();
        assert_eq!(id, 151);
    }

    #[test]
    fn rejects_non_numeric_segment() {
        let err = parse_resource_id("https://pokeapi.co/api/v2/pokemon/ditto/").unwrap_err();
        assert!(matches!(err, PokeApiError::MalformedResource(_)));
    }

    #[test]
    fn rejects_missing_id_segment() {
        let err = parse_resource_id("https://pokeapi.co/api/v2/pokemon/").unwrap_err();
        assert!(matches!(err, PokeApiError::MalformedResource(_)));

        let err = parse_resource_id("pokemon").unwrap_err();
        assert!(matches!(err, PokeApiError::MalformedResource(_)));
    }

    #[test]
    fn rejects_other_resource_kinds() {
        let err = parse_resource_id("https://pokeapi.co/api/v2/ability/65/").unwrap_err();
        assert!(matches!(err, PokeApiError::MalformedResource(_)));
    }

    #[test]
    fn rejects_signed_segment() {
        // u32::parse would happily take "+25", the API contract would not
        let err = parse_resource_id("https://pokeapi.co/api/v2/pokemon/+25/").unwrap_err();
        assert!(matches!(err, PokeApiError::MalformedResource(_)));
    }

    #[test]
    fn list_items_carry_sprite_urls() {
        let client = PokeApiClient::new();
        let item = client
            .map_list_item(NamedResource {
                name: "bulbasaur".to_string(),
                url: "https://pokeapi.co/api/v2/pokemon/1/".to_string(),
            })
            .unwrap();

        assert_eq!(item.id, 1);
        assert_eq!(item.name, "bulbasaur");
        assert_eq!(item.image, format!("{}/1.png", SPRITE_BASE));
    }

    #[tokio::test]
    #[ignore = "hits the live PokeAPI"]
    async fn fetches_first_page() {
        let client = PokeApiClient::new();
        let page = client.fetch_page(10, 0).await.unwrap();

        assert!(page.count > 0);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].id, 1);
    }

    #[tokio::test]
    #[ignore = "hits the live PokeAPI"]
    async fn fetches_detail_by_name() {
        let client = PokeApiClient::new();
        let detail = client.fetch_detail("pikachu").await.unwrap();

        assert_eq!(detail.id, 25);
        assert_eq!(detail.name, "pikachu");
    }

    #[tokio::test]
    #[ignore = "hits the live PokeAPI"]
    async fn unknown_name_is_not_found() {
        let client = PokeApiClient::new();
        let err = client.fetch_detail("definitely-not-a-pokemon").await.unwrap_err();
        assert!(matches!(err, PokeApiError::NotFound(_)));
    }
}
