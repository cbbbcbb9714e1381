//! PADDLA Game Server
//!
//! Provably-fair game server. Serves the commitment, opens games,
//! settles them by deterministic replay and reveals its seed to verified
//! players.

use std::env;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use paddla::network::server::{routes, spawn_rotation_task, spawn_sweeper_task, AppState};
use paddla::{PROTOCOL, VERSION};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ROTATION_SECS: u64 = 3600;
const DEFAULT_FINISHED_TTL_SECS: u64 = 300;
const DEFAULT_SWEEP_SECS: u64 = 60;

fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let bind_addr = env::var("PADDLA_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let rotation = Duration::from_secs(read_env_u64("PADDLA_ROTATION_SECS", DEFAULT_ROTATION_SECS));
    let finished_ttl =
        Duration::from_secs(read_env_u64("PADDLA_FINISHED_TTL_SECS", DEFAULT_FINISHED_TTL_SECS));
    let sweep_every = Duration::from_secs(read_env_u64("PADDLA_SWEEP_SECS", DEFAULT_SWEEP_SECS));

    info!("PADDLA server v{} ({})", VERSION, PROTOCOL);
    info!(
        "bind={} rotation={}s finished_ttl={}s sweep={}s",
        bind_addr,
        rotation.as_secs(),
        finished_ttl.as_secs(),
        sweep_every.as_secs()
    );

    let state = AppState::new(rotation);
    spawn_rotation_task(state.clone());
    spawn_sweeper_task(state.clone(), finished_ttl, sweep_every);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
