//! Parcel API module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/parcels", routes())
}

fn routes() -> Router<ServerState> {
    // /track/{tracking_id} is public; everything else is gated by the
    // auth middleware layered on the top-level router.
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/track/{tracking_id}", get(handler::track))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/cancel", patch(handler::cancel))
}
