//! # shop-api
//!
//! HTTP API layer for printshop-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Catalog listing, image proxy and checkout endpoints
//! - Per-route CORS handling for the static gallery pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/products` | List products |
//! | GET | `/api/image?url=` | Proxy a file-download link |
//! | POST | `/api/checkout` | Create checkout session |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
