use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    /// Human-readable explanation; for user-input errors this is the message
    /// shown back to the person filling in the form.
    pub detail: String,
    pub instance: String,
    /// Machine-readable error code.
    pub code: String,
    /// Id of the `tracing` span that produced the error, for matching
    /// against the server log. Not a distributed trace id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            span_id: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_span_id(mut self, id: impl Into<String>) -> Self {
        self.span_id = Some(id.into());
        self
    }
}

/// Axum response wrapper that renders `Problem` with correct status & content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_status_and_problem_content_type() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "Invalid Email provided");
        let resp = ProblemResponse::from(p).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn builder_sets_optional_fields() {
        let p = Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal", "x")
            .with_type("https://errors.example.com/CONTACTS_INTERNAL")
            .with_code("CONTACTS_INTERNAL")
            .with_instance("/contacts")
            .with_span_id("42");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "https://errors.example.com/CONTACTS_INTERNAL");
        assert_eq!(json["status"], 500);
        assert_eq!(json["instance"], "/contacts");
        assert_eq!(json["span_id"], "42");
        assert!(json.get("trace_id").is_none());
    }
}
