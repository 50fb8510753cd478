use std::collections::HashMap;

use crate::error::{AppError, Result};

/// Famous trainers and the Pokémon they are known for, in roster order.
const TRAINERS: &[(&str, &[&str])] = &[
    (
        "ash",
        &[
            "pikachu", "charizard", "squirtle", "bulbasaur", "greninja", "infernape",
            "sceptile", "lycanroc", "dragonite", "gengar",
        ],
    ),
    ("misty", &["starmie", "staryu", "goldeen", "psyduck", "togepi", "gyarados"]),
    ("brock", &["onix", "geodude", "vulpix", "crobat", "sudowoodo", "steelix"]),
    ("gary", &["blastoise", "umbreon", "electivire", "arcanine", "nidoking", "scizor"]),
    ("lance", &["dragonite", "gyarados", "aerodactyl", "charizard", "tyranitar"]),
    ("cynthia", &["garchomp", "spiritomb", "milotic", "roserade", "togekiss", "lucario"]),
];

/// Regions and the PokeAPI pokédex that enumerates each one.
const REGIONS: &[(&str, &str)] = &[
    ("kanto", "kanto"),
    ("johto", "original-johto"),
    ("hoenn", "hoenn"),
    ("sinnoh", "original-sinnoh"),
    ("unova", "original-unova"),
    ("kalos", "kalos-central"),
    ("alola", "original-alola"),
    ("galar", "galar"),
];

/// Static trainer/region lookup table. Built once at startup and injected
/// into the query pipeline; never mutated afterwards, so it needs no locking.
#[derive(Debug, Clone)]
pub struct RosterTable {
    trainers: HashMap<String, Vec<String>>,
    regions: HashMap<String, String>,
}

impl RosterTable {
    /// The table bundled with the service.
    pub fn builtin() -> Self {
        Self {
            trainers: TRAINERS
                .iter()
                .map(|(trainer, roster)| {
                    (
                        trainer.to_string(),
                        roster.iter().map(|p| p.to_string()).collect(),
                    )
                })
                .collect(),
            regions: REGIONS
                .iter()
                .map(|(region, pokedex)| (region.to_string(), pokedex.to_string()))
                .collect(),
        }
    }

    /// Pokémon belonging to a famous trainer, in roster order.
    /// Keys match case-insensitively.
    pub fn trainer(&self, key: &str) -> Result<&[String]> {
        self.trainers
            .get(&key.to_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::UnknownTrainer(key.to_string()))
    }

    /// PokeAPI pokédex slug for a region. Keys match case-insensitively.
    pub fn region_pokedex(&self, key: &str) -> Result<&str> {
        self.regions
            .get(&key.to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| AppError::UnknownRegion(key.to_string()))
    }

    pub fn trainer_count(&self) -> usize {
        self.trainers.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}
