use axum::Router;

pub mod products;
pub mod system;

/// Router for all public endpoints except `/health`.
pub fn router() -> Router {
    Router::new().nest("/products", products::router())
}
