use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/contact", post(handlers::contact::submit_message))
        .route("/api/contact/messages", get(handlers::contact::list_messages))
        .route(
            "/api/contact/messages/:id/read",
            put(handlers::contact::mark_read),
        )
}
