use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::ContactService;

/// Contact routes with the service injected as an extension.
pub fn router(service: Arc<ContactService>) -> Router {
    Router::new()
        .route(
            "/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        // Form action used by the legacy HTML page.
        .route("/postContact", post(handlers::create_contact))
        .route("/health", get(handlers::health))
        .layer(Extension(service))
}
