use std::cmp::Reverse;

use crate::error::{AppError, Result};
use crate::types::{Pokemon, RankedPokemon, STAT_NAMES};

/// Sum of the six base stats. Errors if the upstream record is missing one of
/// the canonical stat names — a guard against upstream schema drift, not a
/// condition we expect to see in practice.
pub fn base_stat_total(pokemon: &Pokemon) -> Result<u32> {
    let mut total = 0u32;
    for name in STAT_NAMES {
        let value = pokemon
            .stats
            .get(name)
            .copied()
            .ok_or_else(|| AppError::MissingStat(name.to_string()))?;
        total += value;
    }
    Ok(total)
}

/// Annotate each record with its base stat total without re-ordering.
/// Compare output must stay in request order.
pub fn annotate(pokemon: Vec<Pokemon>) -> Result<Vec<RankedPokemon>> {
    pokemon
        .into_iter()
        .map(|p| {
            let total = base_stat_total(&p)?;
            Ok(RankedPokemon {
                pokemon: p,
                base_stat_total: total,
            })
        })
        .collect()
}

/// Rank by base stat total descending. Ties break by ascending id so that
/// paginated output is stable across identical requests.
pub fn rank_descending(pokemon: Vec<Pokemon>) -> Result<Vec<RankedPokemon>> {
    let mut ranked = annotate(pokemon)?;
    ranked.sort_by_key(|r| (Reverse(r.base_stat_total), r.pokemon.id));
    Ok(ranked)
}
