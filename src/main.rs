mod api;
mod config;
mod error;
mod gateway;
mod pipeline;
mod roster;
mod stats;
mod types;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::PokeClient;
use crate::pipeline::QueryPipeline;
use crate::roster::RosterTable;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let gateway = PokeClient::new(&cfg)?;

    let roster = RosterTable::builtin();
    info!(
        "Roster table loaded: {} trainers, {} regions",
        roster.trainer_count(),
        roster.region_count()
    );

    let pipeline = QueryPipeline::new(gateway, roster, cfg.catalog_limit);
    let state = ApiState {
        pipeline: Arc::new(pipeline),
    };
    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        "HTTP API listening on {bind_addr} (upstream: {}, catalog bound: {})",
        cfg.pokeapi_base_url, cfg.catalog_limit
    );

    axum::serve(listener, app).await?;

    Ok(())
}
