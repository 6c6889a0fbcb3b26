//! # Routes
//!
//! Axum router configuration for the storefront API.
//!
//! Every `/api/*` route answers `OPTIONS` preflights itself and stamps the
//! permissive CORS headers on all of its responses, errors included.

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

const GET_METHODS: &str = "GET, OPTIONS";
const POST_METHODS: &str = "POST, OPTIONS";

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - GET  /api/products - Catalog listing
/// - GET  /api/image?url= - File-link image proxy
/// - POST /api/checkout - Create checkout session
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/products",
            get(handlers::list_products)
                .fallback(handlers::method_not_allowed)
                .layer(middleware::from_fn_with_state(GET_METHODS, cors)),
        )
        .route(
            "/image",
            get(handlers::proxy_image)
                .fallback(handlers::method_not_allowed)
                .layer(middleware::from_fn_with_state(GET_METHODS, cors)),
        )
        .route(
            "/checkout",
            post(handlers::create_checkout)
                .fallback(handlers::method_not_allowed)
                .layer(middleware::from_fn_with_state(POST_METHODS, cors)),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Answer preflights and add CORS headers to everything else
async fn cors(State(methods): State<&'static str>, request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(methods),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    response
}
