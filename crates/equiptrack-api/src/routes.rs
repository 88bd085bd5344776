use super::{auth, customers, machinery, products};
use axum::routing::{get, patch, post};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub(super) fn setup(app_state: super::AppState) -> axum::routing::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/register", post(auth::register::post))
        .route("/api/v1/auth/login", post(auth::login::post))
        .route("/api/v1/auth/me", get(auth::me::get))
        .route("/api/v1/auth/logout", post(auth::logout::post))
        .route(
            "/api/v1/customers",
            post(customers::create).get(customers::list),
        )
        .route(
            "/api/v1/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route(
            "/api/v1/products",
            post(products::create).get(products::list),
        )
        .route("/api/v1/products/low-stock", get(products::low_stock))
        .route(
            "/api/v1/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/api/v1/machinery",
            post(machinery::create).get(machinery::list),
        )
        .route("/api/v1/machinery/stats", get(machinery::stats))
        .route("/api/v1/machinery/alerts", get(machinery::alerts))
        .route(
            "/api/v1/machinery/{id}",
            get(machinery::get)
                .put(machinery::update)
                .delete(machinery::delete),
        )
        .route(
            "/api/v1/machinery/{id}/horometer",
            patch(machinery::update_horometer),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .fallback(fallback)
        .with_state(app_state)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn fallback(_uri: axum::http::Uri) -> impl axum::response::IntoResponse {
    (axum::http::StatusCode::NOT_FOUND, "not found")
}
