use std::future::Future;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::config::FETCH_CONCURRENCY;
use crate::error::{AppError, Result};
use crate::gateway::PokeClient;
use crate::roster::RosterTable;
use crate::stats::{annotate, rank_descending};
use crate::types::{
    ComparisonResult, ComparisonSummary, Extremes, NamedValue, Pokemon, RankedPokemon, STAT_NAMES,
};

/// Upstream lookup seam. Implemented by [`PokeClient`]; pipeline tests
/// substitute an in-memory fake. Arguments are owned so the returned futures
/// borrow only the gateway itself.
pub trait Gateway: Send + Sync {
    fn fetch_pokemon(&self, name_or_id: String) -> impl Future<Output = Result<Pokemon>> + Send;
    fn fetch_pokedex(&self, slug: String) -> impl Future<Output = Result<Vec<String>>> + Send;
}

impl Gateway for PokeClient {
    async fn fetch_pokemon(&self, name_or_id: String) -> Result<Pokemon> {
        PokeClient::fetch_pokemon(self, &name_or_id).await
    }

    async fn fetch_pokedex(&self, slug: String) -> Result<Vec<String>> {
        PokeClient::fetch_pokedex(self, &slug).await
    }
}

/// Per-endpoint orchestration: resolve candidate identifiers, fetch records,
/// filter, rank/paginate, shape the response. Stateless across requests; the
/// only shared data is the immutable roster table.
pub struct QueryPipeline<G> {
    gateway: G,
    roster: RosterTable,
    /// Upper bound of the national dex id range scanned for the legendary and
    /// top-by-power listings.
    catalog_limit: u32,
}

impl<G: Gateway> QueryPipeline<G> {
    pub fn new(gateway: G, roster: RosterTable, catalog_limit: u32) -> Self {
        Self {
            gateway,
            roster,
            catalog_limit,
        }
    }

    pub async fn get_by_identifier(&self, name_or_id: &str) -> Result<Pokemon> {
        self.gateway.fetch_pokemon(name_or_id.to_string()).await
    }

    /// Side-by-side comparison of 2–6 Pokémon. Output order matches the
    /// request order. If any single lookup misses, the whole comparison fails
    /// naming the missing entry — no partial results.
    pub async fn compare(&self, names: &[String]) -> Result<ComparisonResult> {
        if names.len() < 2 {
            return Err(AppError::InvalidArgument(
                "provide at least 2 Pokemon to compare".to_string(),
            ));
        }
        if names.len() > 6 {
            return Err(AppError::InvalidArgument(
                "you can compare a maximum of 6 Pokemon".to_string(),
            ));
        }

        let records = self.fetch_ordered(names.iter().cloned()).await?;
        let ranked = annotate(records)?;
        let comparison = summarize(&ranked);
        Ok(ComparisonResult {
            pokemon: ranked,
            comparison,
        })
    }

    /// Legendary Pokémon from the bounded catalog, ascending by id, with
    /// offset/limit applied after filtering. An offset past the end yields an
    /// empty list, not an error.
    pub async fn list_legendary(&self, limit: u32, offset: u32) -> Result<Vec<Pokemon>> {
        let catalog = self.fetch_catalog().await?;
        Ok(catalog
            .into_iter()
            .filter(|p| p.is_legendary)
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    /// Strongest Pokémon of the bounded catalog by base stat total.
    pub async fn top_by_power(&self, limit: u32) -> Result<Vec<RankedPokemon>> {
        if limit < 1 {
            return Err(AppError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        let catalog = self.fetch_catalog().await?;
        let mut ranked = rank_descending(catalog)?;
        ranked.truncate(limit as usize);
        Ok(ranked)
    }

    /// Full roster of a famous trainer, in roster order. Roster entries the
    /// upstream cannot resolve (form-suffixed species like lycanroc) are
    /// skipped rather than failing the whole request.
    pub async fn trainer_roster(&self, trainer: &str) -> Result<Vec<Pokemon>> {
        let roster = self.roster.trainer(trainer)?;
        self.fetch_available(roster.iter().cloned()).await
    }

    /// One page of a region's pokédex, in dex order. Pagination is applied to
    /// the entry list before fetching so a page costs `limit` upstream calls.
    /// Dex entries the upstream cannot resolve are skipped.
    pub async fn region_roster(&self, region: &str, limit: u32, offset: u32) -> Result<Vec<Pokemon>> {
        let names = self.region_names(region).await?;
        let page = names
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize);
        self.fetch_available(page).await
    }

    /// Strongest Pokémon of a region by base stat total.
    pub async fn top_regional(&self, region: &str, limit: u32) -> Result<Vec<RankedPokemon>> {
        if limit < 1 {
            return Err(AppError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        let names = self.region_names(region).await?;
        let records = self.fetch_available(names).await?;
        let mut ranked = rank_descending(records)?;
        ranked.truncate(limit as usize);
        Ok(ranked)
    }

    async fn region_names(&self, region: &str) -> Result<Vec<String>> {
        let pokedex = self.roster.region_pokedex(region)?;
        self.gateway.fetch_pokedex(pokedex.to_string()).await
    }

    /// Fan out fetches with bounded concurrency, re-assembling results in the
    /// input order. Any failure aborts the whole batch; compare must not
    /// return partial results.
    async fn fetch_ordered<I>(&self, names: I) -> Result<Vec<Pokemon>>
    where
        I: IntoIterator<Item = String>,
    {
        stream::iter(names.into_iter().map(|name| self.gateway.fetch_pokemon(name)))
            .buffered(FETCH_CONCURRENCY)
            .try_collect()
            .await
    }

    /// Like [`fetch_ordered`](Self::fetch_ordered), but names the upstream
    /// does not know are dropped instead of failing the batch. Other upstream
    /// failures still abort.
    async fn fetch_available<I>(&self, names: I) -> Result<Vec<Pokemon>>
    where
        I: IntoIterator<Item = String>,
    {
        let fetches = names.into_iter().map(|name| {
            let gateway = &self.gateway;
            async move {
                match gateway.fetch_pokemon(name).await {
                    Ok(p) => Ok(Some(p)),
                    Err(AppError::NotFound(_)) => Ok(None),
                    Err(e) => Err(e),
                }
            }
        });

        let records: Vec<Option<Pokemon>> = stream::iter(fetches)
            .buffered(FETCH_CONCURRENCY)
            .try_collect()
            .await?;

        Ok(records.into_iter().flatten().collect())
    }

    /// Fetch ids 1..=catalog_limit in order. Ids the upstream does not know
    /// (gaps inside the bound) are skipped, not errors.
    async fn fetch_catalog(&self) -> Result<Vec<Pokemon>> {
        let catalog = self
            .fetch_available((1..=self.catalog_limit).map(|id| id.to_string()))
            .await?;
        debug!(
            "catalog scan: {} of {} ids resolved",
            catalog.len(),
            self.catalog_limit
        );
        Ok(catalog)
    }
}

/// Comparison summary: per-stat extremes, type membership, and physical
/// extremes across the compared set. A stat a record does not carry counts
/// as 0 here, matching the lenient comparison semantics of the listing.
fn summarize(ranked: &[RankedPokemon]) -> ComparisonSummary {
    let mut summary = ComparisonSummary {
        stats: Default::default(),
        types: Default::default(),
        height: extremes(ranked, |p| p.height),
        weight: extremes(ranked, |p| p.weight),
    };

    for stat in STAT_NAMES {
        summary.stats.insert(
            stat.to_string(),
            extremes(ranked, |p| p.stats.get(stat).copied().unwrap_or(0)),
        );
    }

    for entry in ranked {
        for type_name in &entry.pokemon.types {
            summary
                .types
                .entry(type_name.clone())
                .or_default()
                .push(entry.pokemon.name.clone());
        }
    }

    summary
}

fn extremes<F>(ranked: &[RankedPokemon], value: F) -> Extremes
where
    F: Fn(&Pokemon) -> u32,
{
    let named = |entry: &RankedPokemon| NamedValue {
        name: entry.pokemon.name.clone(),
        value: value(&entry.pokemon),
    };

    let mut highest = named(&ranked[0]);
    let mut lowest = named(&ranked[0]);
    for entry in &ranked[1..] {
        let v = value(&entry.pokemon);
        if v > highest.value {
            highest = named(entry);
        }
        if v < lowest.value {
            lowest = named(entry);
        }
    }

    Extremes { highest, lowest }
}
