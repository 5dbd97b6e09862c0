use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/content/:key",
        get(handlers::content::get_content)
            .put(handlers::content::put_content)
            .patch(handlers::content::patch_content),
    )
}
