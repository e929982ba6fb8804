//! Structured logging setup.
//!
//! The game library logs through the `log` facade. Those records are
//! forwarded into `tracing` by the subscriber's log bridge, so one filter
//! (`RUST_LOG`) controls both.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info,hyper=warn,tower_http=warn";

/// Initialize the global subscriber
///
/// # Example
///
/// ```no_run
/// use pp_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}
