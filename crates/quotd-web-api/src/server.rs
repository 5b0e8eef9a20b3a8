use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use quotd_core::QuoteStore;

use crate::{
    cleanup::CleanupService,
    config::{Config, LogFormat},
    handlers::AppState,
    rate_limiter::RateLimiter,
    routes::create_router,
};

pub fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .init();
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting quotd-web-api server with config: {:?}", config);

    // The quote file is the sole data source; without it there is nothing
    // to serve, so any load failure aborts startup.
    let store = QuoteStore::load(&config.quotes_path)?;
    let total_quotes = store.len();
    info!(
        "Loaded {} quotes from {}",
        total_quotes,
        config.quotes_path.display()
    );

    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
    let state = AppState::new(&config, store, StdRng::from_os_rng());
    let app = create_router(&config, state, Arc::clone(&rate_limiter));

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    let server_url = config.server_url();
    info!("Quote API {} running at {}", config.api_version, server_url);
    info!("Environment: {}", config.environment.as_str());
    info!(
        "Rate limit: {} requests per {} seconds",
        config.rate_limit.max_requests,
        config.rate_limit.window_ms / 1000
    );
    info!(
        "Security headers: {}",
        if config.security_headers {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    info!("Total quotes: {}", total_quotes);
    info!("API endpoints mounted under {}", config.api_prefix);

    // Print available environment variables for configuration
    info!("Configuration options:");
    info!("  QUOTD_HOST: Host to bind to (default: 0.0.0.0)");
    info!("  QUOTD_PORT: Port to bind to (default: 3000)");
    info!("  QUOTD_ENV: 'development' or 'production' (default: development)");
    info!("  RUST_LOG or QUOTD_LOG_LEVEL: Log level");
    info!("  QUOTD_LOG_FORMAT: Log format - 'json' or 'text' (default: text)");
    info!("  QUOTD_API_PREFIX: Mount point for data routes (default: /api)");
    info!("  QUOTD_QUOTES_PATH: Quotes data file (default: quotes.json)");
    info!("  QUOTD_API_VERSION: Version reported by /health (default: v1)");
    info!("  QUOTD_PRETTY_JSON: Pretty-print responses in development (default: false)");
    info!("  QUOTD_SECURITY_HEADERS: Security response headers (default: false)");
    info!("  QUOTD_RATE_LIMIT_WINDOW_MS: Rate limit window in ms (default: 60000)");
    info!("  QUOTD_RATE_LIMIT_MAX: Requests per window (default: 60)");
    info!("  QUOTD_RATE_LIMIT_CLEANUP_INTERVAL_SECONDS: Cleanup interval (default: 3600)");

    // Start cleanup service
    let mut cleanup_service = CleanupService::new(
        Arc::clone(&rate_limiter),
        config.rate_limit.cleanup_interval_seconds,
    );
    cleanup_service.start();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down quotd-web-api server");

    Ok(())
}
