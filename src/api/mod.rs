use std::sync::Arc;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod handlers;

/// Routes for the HubSpot integration.
/// All routes are relative; the caller mounts this under `/integrations/hubspot`.
pub fn hubspot_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/authorize", post(handlers::authorize_hubspot))
        .route("/oauth2callback", get(handlers::oauth2callback_hubspot))
        .route("/credentials", post(handlers::get_hubspot_credentials))
        .route("/load", post(handlers::load_hubspot_items))
}

/// Build the full application router with its middleware stack.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.dashboard_origin.clone());

    Router::new()
        // Health endpoints
        .route("/healthz", get(|| async { "ok" }))
        .route("/readyz", get(|| async { "ok" }))
        .nest("/integrations/hubspot", hubspot_router())
        .fallback(fallback_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
}

async fn fallback_404() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// The host frontend posts forms from the dashboard origin; local dev
/// servers on any port are allowed too.
fn cors_layer(dashboard_origin: String) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            let origin_str = origin.to_str().unwrap_or("");
            origin_str == dashboard_origin
                || origin_str.starts_with("http://localhost:")
                || origin_str.starts_with("http://127.0.0.1:")
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // NOTE: Cannot use AllowHeaders::any() with allow_credentials(true) per CORS spec
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}

/// Middleware: injects a unique X-Request-Id into every response.
async fn request_id_middleware(req: Request, next: Next) -> Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}

/// Middleware: injects security headers into every response.
async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    // Credentials pass through these responses
    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    // The callback URL carries the authorization code
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.remove("server");

    resp
}
