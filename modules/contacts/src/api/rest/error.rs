use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::error::ContactError;

pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{code}"))
        .with_code(code)
        .with_instance(instance);

    let problem = match tracing::Span::current().id() {
        Some(id) => problem.with_span_id(id.into_u64().to_string()),
        None => problem,
    };

    problem.into()
}

/// User-input errors become 400 with the error's own message; everything
/// else is a 500 whose details stay in the log.
pub fn map_contact_error(e: &ContactError, instance: &str) -> ProblemResponse {
    if !e.is_user_error() {
        tracing::error!(error = ?e, kind = ?e.kind(), "contact insert failed");
        return from_parts(
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONTACTS_INTERNAL",
            "Internal Server Error",
            "An internal error occurred",
            instance,
        );
    }

    let code = match e {
        ContactError::InvalidFullName { .. } => "CONTACTS_INVALID_FULL_NAME",
        ContactError::InvalidEmail { .. } => "CONTACTS_INVALID_EMAIL",
        _ => "CONTACTS_INVALID_PHONE_NUMBER",
    };
    from_parts(
        StatusCode::BAD_REQUEST,
        code,
        "Validation error",
        e.to_string(),
        instance,
    )
}
