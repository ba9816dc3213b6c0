use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre for binary error reports.
///
/// Call early in `main()`. Safe to call more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_filter(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,mongodb=warn,tower_http=info"
    } else {
        "debug,mongodb=info,hyper=info"
    }
}

/// Initialize tracing for the given environment.
///
/// - **Production**: flattened JSON events, no module targets.
/// - **Development**: pretty, human-readable output.
///
/// Both install `tracing_error::ErrorLayer` so `eyre` reports carry span traces.
/// `RUST_LOG` overrides the level filter. A second call is a no-op.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
