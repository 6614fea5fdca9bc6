use tower_http::cors::{Any, CorsLayer};

/// Wide-open CORS for the dashboard frontend. Response headers are exposed
/// so export downloads can read Content-Disposition from browser code.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
        .expose_headers(Any)
}
