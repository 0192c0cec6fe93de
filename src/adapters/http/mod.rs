use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{commands::DomainLogic, ports::storage::StoragePort};

pub mod page;
pub mod routes;

/// Build the club-facing router over a shared [`DomainLogic`]
pub fn create_app<S>(logic: DomainLogic<S>) -> Router
where
    S: StoragePort + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(routes::home))
        .route(
            "/showSummary",
            get(routes::summary_by_club::<S>).post(routes::show_summary::<S>),
        )
        .route("/book/:competition/:club", get(routes::book::<S>))
        .route("/purchasePlaces", post(routes::purchase_places::<S>))
        .route("/points", get(routes::points::<S>))
        .route("/logout", get(routes::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(logic)
}
