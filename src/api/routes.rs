use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::config::{DEFAULT_PAGE_LIMIT, DEFAULT_REGIONAL_TOP_LIMIT, DEFAULT_TOP_LIMIT};
use crate::error::AppError;
use crate::gateway::PokeClient;
use crate::pipeline::QueryPipeline;
use crate::types::{ComparisonResult, Pokemon, RankedPokemon};

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<QueryPipeline<PokeClient>>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/pokemon/compare", get(compare_pokemon))
        .route("/pokemon/legendary", get(get_legendary))
        .route("/pokemon/top", get(get_top))
        .route("/pokemon/trainer/:trainer_name", get(get_trainer_pokemon))
        .route("/pokemon/region/:region_name", get(get_region_pokemon))
        .route("/pokemon/region/:region_name/top", get(get_region_top))
        .route("/pokemon/:name_or_id", get(get_pokemon))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Deserialize)]
pub struct TopQuery {
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Pokemon API!",
        "endpoints": [
            "/pokemon/{name_or_id}",
            "/pokemon/compare",
            "/pokemon/legendary",
            "/pokemon/top",
            "/pokemon/trainer/{trainer_name}",
            "/pokemon/region/{region_name}",
            "/pokemon/region/{region_name}/top",
        ],
    }))
}

async fn get_pokemon(
    State(state): State<ApiState>,
    Path(name_or_id): Path<String>,
) -> Result<Json<Pokemon>, AppError> {
    let pokemon = state.pipeline.get_by_identifier(&name_or_id).await?;
    Ok(Json(pokemon))
}

/// `pokemon_names` is a repeated query parameter, which serde_urlencoded
/// cannot deserialize into a struct field, so the raw pair list is filtered
/// by hand.
async fn compare_pokemon(
    State(state): State<ApiState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ComparisonResult>, AppError> {
    let names: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "pokemon_names")
        .map(|(_, value)| value)
        .collect();

    let result = state.pipeline.compare(&names).await?;
    Ok(Json(result))
}

async fn get_legendary(
    State(state): State<ApiState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<Pokemon>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let legendary = state.pipeline.list_legendary(limit, offset).await?;
    Ok(Json(legendary))
}

async fn get_top(
    State(state): State<ApiState>,
    Query(params): Query<TopQuery>,
) -> Result<Json<Vec<RankedPokemon>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    let top = state.pipeline.top_by_power(limit).await?;
    Ok(Json(top))
}

async fn get_trainer_pokemon(
    State(state): State<ApiState>,
    Path(trainer_name): Path<String>,
) -> Result<Json<Vec<Pokemon>>, AppError> {
    let roster = state.pipeline.trainer_roster(&trainer_name).await?;
    Ok(Json(roster))
}

async fn get_region_pokemon(
    State(state): State<ApiState>,
    Path(region_name): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<Pokemon>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let page = state
        .pipeline
        .region_roster(&region_name, limit, offset)
        .await?;
    Ok(Json(page))
}

async fn get_region_top(
    State(state): State<ApiState>,
    Path(region_name): Path<String>,
    Query(params): Query<TopQuery>,
) -> Result<Json<Vec<RankedPokemon>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_REGIONAL_TOP_LIMIT);
    let top = state.pipeline.top_regional(&region_name, limit).await?;
    Ok(Json(top))
}
