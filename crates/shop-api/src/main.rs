//! # Printshop RS
//!
//! Storefront backend for the print gallery.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_API_KEY_PRODUCTS=rk_live_...
//! export STRIPE_SECRET_KEY=sk_live_...
//!
//! # Run the server
//! printshop
//! ```

use shop_api::{routes, state::AppConfig, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if config.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Catalog entries loaded: {}", state.catalog.len());
    info!("Storefront provider: {}", state.provider.provider_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Printshop starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Products: GET http://{}/api/products", addr);
        info!("Checkout: POST http://{}/api/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Printshop RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Print gallery storefront
  Version: {}
  
"#,
        env!("CARGO_PKG_VERSION")
    );
}
