use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::Pokemon;

/// Client for the upstream PokeAPI REST interface.
#[derive(Debug, Clone)]
pub struct PokeClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.pokeapi_base_url.clone(),
        })
    }

    /// Fetch one Pokémon and merge in its species record. The species record
    /// carries the legendary/mythical flags and flavor text; if that second
    /// fetch fails we degrade to flags-off rather than failing the lookup.
    pub async fn fetch_pokemon(&self, name_or_id: &str) -> Result<Pokemon> {
        let key = name_or_id.to_lowercase();
        let url = format!("{}/pokemon/{}", self.base_url, key);
        let body = self.get_json(&url, &key).await?;

        // Species is keyed by the numeric id so name lookups resolve too.
        let id = body
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("id"))?;
        let species_url = format!("{}/pokemon-species/{}", self.base_url, id);
        let species = match self.get_json(&species_url, &key).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("species fetch failed for {key}: {e}");
                None
            }
        };

        parse_pokemon(&body, species.as_ref())
    }

    /// Fetch the ordered species names of a pokédex (e.g. "kanto",
    /// "original-johto").
    pub async fn fetch_pokedex(&self, slug: &str) -> Result<Vec<String>> {
        let url = format!("{}/pokedex/{}", self.base_url, slug);
        let body = self.get_json(&url, slug).await?;
        parse_pokedex_entries(&body)
    }

    async fn get_json(&self, url: &str, entity: &str) -> Result<Value> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(entity.to_string()));
        }
        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{url} returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid JSON from {url}: {e}")))
    }
}

/// Build a [`Pokemon`] from the raw `/pokemon` payload plus an optional
/// `/pokemon-species` payload. Structurally required fields are rejected here;
/// individual missing stats are left for the aggregator to flag.
fn parse_pokemon(v: &Value, species: Option<&Value>) -> Result<Pokemon> {
    let id = v
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("id"))? as u32;
    let name = v
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("name"))?
        .to_string();

    let types: Vec<String> = v
        .get("types")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|t| {
                    t.get("type")
                        .and_then(|inner| inner.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default();
    if types.is_empty() {
        return Err(malformed("types"));
    }

    let abilities: Vec<String> = v
        .get("abilities")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|a| {
                    a.get("ability")
                        .and_then(|inner| inner.get("name"))
                        .and_then(Value::as_str)
                        .map(|s| s.replace('-', " "))
                })
                .collect()
        })
        .unwrap_or_default();

    let stats: BTreeMap<String, u32> = v
        .get("stats")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("stats"))?
        .iter()
        .filter_map(|s| {
            let stat_name = s.get("stat")?.get("name")?.as_str()?;
            let base = s.get("base_stat")?.as_u64()?;
            Some((stat_name.to_string(), base as u32))
        })
        .collect();

    let sprite_url = v
        .get("sprites")
        .and_then(|s| s.get("front_default"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let height = v.get("height").and_then(Value::as_u64).unwrap_or(0) as u32;
    let weight = v.get("weight").and_then(Value::as_u64).unwrap_or(0) as u32;

    let is_legendary = species
        .and_then(|s| s.get("is_legendary"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let is_mythical = species
        .and_then(|s| s.get("is_mythical"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let description = species.and_then(parse_english_flavor_text);

    Ok(Pokemon {
        id,
        name,
        types,
        sprite_url,
        height,
        weight,
        abilities,
        stats,
        is_legendary,
        is_mythical,
        description,
    })
}

/// First English flavor text entry, with page-control characters flattened
/// to spaces.
fn parse_english_flavor_text(species: &Value) -> Option<String> {
    species
        .get("flavor_text_entries")
        .and_then(Value::as_array)?
        .iter()
        .find(|entry| {
            entry
                .get("language")
                .and_then(|l| l.get("name"))
                .and_then(Value::as_str)
                == Some("en")
        })
        .and_then(|entry| entry.get("flavor_text"))
        .and_then(Value::as_str)
        .map(|s| s.replace(['\n', '\u{c}'], " "))
}

fn parse_pokedex_entries(v: &Value) -> Result<Vec<String>> {
    let entries = v
        .get("pokemon_entries")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("pokemon_entries"))?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            entry
                .get("pokemon_species")
                .and_then(|s| s.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect())
}

fn malformed(field: &str) -> AppError {
    AppError::Upstream(format!("malformed upstream payload: missing {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pikachu_payload() -> Value {
        json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [
                {"slot": 1, "type": {"name": "electric", "url": "..."}}
            ],
            "abilities": [
                {"ability": {"name": "static"}},
                {"ability": {"name": "lightning-rod"}}
            ],
            "stats": [
                {"base_stat": 35, "stat": {"name": "hp"}},
                {"base_stat": 55, "stat": {"name": "attack"}},
                {"base_stat": 40, "stat": {"name": "defense"}},
                {"base_stat": 50, "stat": {"name": "special-attack"}},
                {"base_stat": 50, "stat": {"name": "special-defense"}},
                {"base_stat": 90, "stat": {"name": "speed"}}
            ],
            "sprites": {"front_default": "https://example.test/25.png"}
        })
    }

    fn pikachu_species() -> Value {
        json!({
            "is_legendary": false,
            "is_mythical": false,
            "flavor_text_entries": [
                {
                    "flavor_text": "Wenn PIKACHU...",
                    "language": {"name": "de"}
                },
                {
                    "flavor_text": "When several of\nthese POKéMON\u{c}gather...",
                    "language": {"name": "en"}
                }
            ]
        })
    }

    #[test]
    fn parses_full_payload() {
        let p = parse_pokemon(&pikachu_payload(), Some(&pikachu_species())).unwrap();
        assert_eq!(p.id, 25);
        assert_eq!(p.name, "pikachu");
        assert_eq!(p.types, ["electric"]);
        assert_eq!(p.abilities, ["static", "lightning rod"]);
        assert_eq!(p.stats.get("speed"), Some(&90));
        assert_eq!(p.stats.len(), 6);
        assert!(!p.is_legendary);
        assert_eq!(
            p.description.as_deref(),
            Some("When several of these POKéMON gather...")
        );
    }

    #[test]
    fn missing_species_degrades_to_flags_off() {
        let p = parse_pokemon(&pikachu_payload(), None).unwrap();
        assert!(!p.is_legendary);
        assert!(!p.is_mythical);
        assert!(p.description.is_none());
    }

    #[test]
    fn payload_without_stats_is_rejected() {
        let mut payload = pikachu_payload();
        payload.as_object_mut().unwrap().remove("stats");
        assert!(matches!(
            parse_pokemon(&payload, None),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn payload_without_types_is_rejected() {
        let mut payload = pikachu_payload();
        payload.as_object_mut().unwrap().remove("types");
        assert!(matches!(
            parse_pokemon(&payload, None),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn parses_pokedex_entries_in_order() {
        let payload = json!({
            "pokemon_entries": [
                {"entry_number": 1, "pokemon_species": {"name": "bulbasaur"}},
                {"entry_number": 2, "pokemon_species": {"name": "ivysaur"}},
                {"entry_number": 3, "pokemon_species": {"name": "venusaur"}}
            ]
        });
        let names = parse_pokedex_entries(&payload).unwrap();
        assert_eq!(names, ["bulbasaur", "ivysaur", "venusaur"]);
    }

    #[test]
    fn pokedex_without_entries_is_rejected() {
        assert!(matches!(
            parse_pokedex_entries(&json!({})),
            Err(AppError::Upstream(_))
        ));
    }
}
