use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Pokemon
// ---------------------------------------------------------------------------

/// The six base stat names PokeAPI reports for every Pokémon, in canonical
/// order. The stat aggregator requires all of them to be present.
pub const STAT_NAMES: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

/// One Pokémon as served by this proxy: the upstream `/pokemon` record merged
/// with the legendary/mythical flags and flavor text from `/pokemon-species`.
/// Immutable once fetched; lives only for the request that fetched it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub sprite_url: Option<String>,
    pub height: u32,
    pub weight: u32,
    pub abilities: Vec<String>,
    /// Base stats keyed by PokeAPI stat name ("hp", "attack", ...).
    pub stats: BTreeMap<String, u32>,
    pub is_legendary: bool,
    pub is_mythical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Pokémon annotated with its base stat total — the ranking key used
/// wherever the API says "top" or "power".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPokemon {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    pub base_stat_total: u32,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Side-by-side comparison of 2–6 Pokémon, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub pokemon: Vec<RankedPokemon>,
    pub comparison: ComparisonSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Per-stat extremes, keyed by stat name.
    pub stats: BTreeMap<String, Extremes>,
    /// Which of the compared Pokémon carry each type.
    pub types: BTreeMap<String, Vec<String>>,
    pub height: Extremes,
    pub weight: Extremes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extremes {
    pub highest: NamedValue,
    pub lowest: NamedValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: u32,
}
