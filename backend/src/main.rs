//! Backend entry point: loads configuration, wires adapters and serves HTTP.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use darpan_backend::inbound::http::health::HealthState;
use darpan_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use darpan_backend::outbound::persistence::{DbPool, PoolConfig};
use darpan_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

fn init_tracing() {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("darpan")
        .endpoint("/metrics")
        .build()
        .map_err(|err| io::Error::other(format!("configure Prometheus metrics: {err}")))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = AppSettings::load()
        .map_err(|err| io::Error::other(format!("load configuration: {err}")))?
        .validate()
        .map_err(io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;

    let pool_config = PoolConfig::from(&settings.database);
    info!(
        db_host = settings.database.host(),
        db_port = settings.database.port(),
        db_name = settings.database.name(),
        pool_max_size = pool_config.max_size(),
        pool_min_idle = ?pool_config.min_idle(),
        "database pool configured"
    );
    let pool = DbPool::new(&pool_config);

    let config = ServerConfig::new(session, settings.bind_addr, pool);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
