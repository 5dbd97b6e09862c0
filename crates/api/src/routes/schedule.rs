use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/schedule/slots", get(handlers::schedule::get_available_slots))
        .route("/api/schedule/catalog", get(handlers::schedule::get_slot_catalog))
        .route("/api/schedule/bookings", post(handlers::schedule::create_booking))
}
