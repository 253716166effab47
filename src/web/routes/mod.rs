//! Contains all the routes that this application can handle.

mod subscriptions;

use axum::{http::StatusCode, routing::get, Router};

use crate::AppState;

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(subscription_routes(app_state))
        .route("/health-check", get(health_check))
}

/// SUBSCRIPTIONS - the CRUD routes plus the price aggregate.
/// `/subscriptions/sum` is a static segment and wins over the `{id}` capture.
fn subscription_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route("/subscriptions/sum", get(subscriptions::sum))
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        )
        .with_state(app_state)
}
