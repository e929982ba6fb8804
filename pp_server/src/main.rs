//! Party game server.
//!
//! Hosts Texas Hold'em and BS Poker rooms, each room running in its own
//! actor task behind a per-variant room manager.

use std::{net::SocketAddr, time::Duration};

use anyhow::Error;
use log::info;
use pico_args::Arguments;
use pp_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging,
};

const HELP: &str = "\
Run a party poker server (Texas Hold'em and BS Poker rooms)

USAGE:
  pp_server [OPTIONS]

OPTIONS:
  --bind        IP:PORT    Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --sweep-secs  N          Seconds between idle room sweeps  [default: env ROOM_SWEEP_INTERVAL_SECS or 300]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                  Server bind address (e.g., 0.0.0.0:8080)
  ROOM_SWEEP_INTERVAL_SECS     Idle room sweep period
  DEFAULT_MAX_PLAYERS          Seats for rooms created without a capacity
  HOLDEM_DEFAULT_BUY_IN        Hold'em stack for rooms created without stakes
  HOLDEM_DEFAULT_SMALL_BLIND   Hold'em small blind default
  HOLDEM_DEFAULT_BIG_BLIND     Hold'em big blind default
  RUST_LOG                     Log filter (e.g., info,party_poker=debug)
";

struct Args {
    bind: Option<SocketAddr>,
    sweep_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        sweep_secs: pargs.opt_value_from_str("--sweep-secs")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.sweep_secs)?;
    config.validate()?;
    info!(
        "Room defaults: {} seats, Hold'em {}/{} with {} buy-in",
        config.room_defaults.max_players,
        config.room_defaults.stakes.small_blind,
        config.room_defaults.stakes.big_blind,
        config.room_defaults.stakes.buy_in
    );

    let state = AppState::new(config.room_defaults);

    let sweeper = tokio::spawn(sweep_idle_rooms(
        state.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    ));

    let app = api::create_router(state);

    info!("Starting HTTP/WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    sweeper.abort();
    info!("Shutting down server...");

    Ok(())
}

/// Periodically evict rooms that sat empty past their retention window
async fn sweep_idle_rooms(state: AppState, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        let holdem = state.holdem.cleanup_idle_rooms().await;
        let bs = state.bs.cleanup_idle_rooms().await;
        if holdem + bs > 0 {
            info!("Idle sweep evicted {holdem} Hold'em and {bs} BS Poker room(s)");
        }
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
