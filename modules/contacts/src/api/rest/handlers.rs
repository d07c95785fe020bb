use std::sync::Arc;

use axum::{extract::Form, http::Uri, response::Json, Extension};
use tracing::{debug, info};

use crate::api::rest::dto::{ContactDto, ContactForm};
use crate::api::rest::error::map_contact_error;
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::Contact;
use crate::domain::service::ContactService;

/// List every contact with its phone numbers.
pub async fn list_contacts(Extension(svc): Extension<Arc<ContactService>>) -> Json<Vec<ContactDto>> {
    let contacts = svc.get_all_contacts().await;
    info!("listing {} contacts", contacts.len());
    Json(contacts.into_iter().map(ContactDto::from).collect())
}

/// Create a contact from an url-encoded form.
pub async fn create_contact(
    uri: Uri,
    Extension(svc): Extension<Arc<ContactService>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    let mut contact = Contact::from(ContactForm::from_pairs(pairs));
    info!(full_name = %contact.full_name, "creating contact");

    // Internal failures are logged by `map_contact_error`.
    match svc.insert_new_contact(&mut contact).await {
        Ok(()) => Ok(Json(ContactDto::from(contact))),
        Err(e) => {
            debug!(error = %e, "contact rejected");
            Err(map_contact_error(&e, uri.path()))
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}
