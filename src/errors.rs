use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    /// Missing or malformed input, rejected before touching the store.
    Validation(String),
    NotAuthorized(&'static str),
    Forbidden,
    NotFound(&'static str),
    /// External store or generative API failure. The upstream detail is
    /// passed through verbatim for operator debugging.
    Upstream(String),
    /// A required server-side secret is absent. Fails the request instead of
    /// silently degrading permissions.
    Misconfigured(&'static str),
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: RequestErrorJson,
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    body: Vec<String>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson {
                body: vec![error.to_string()],
            },
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let (status_code, json) = match self {
            RequestError::Validation(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJsonWrapper::new(message))
            }
            RequestError::NotAuthorized(message) => (
                StatusCode::UNAUTHORIZED,
                RequestErrorJsonWrapper::new(message),
            ),
            RequestError::Forbidden => (
                StatusCode::FORBIDDEN,
                RequestErrorJsonWrapper::new("Forbidden"),
            ),
            RequestError::NotFound(message) => {
                (StatusCode::NOT_FOUND, RequestErrorJsonWrapper::new(message))
            }
            RequestError::Upstream(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJsonWrapper::new(message),
            ),
            RequestError::Misconfigured(message) => {
                tracing::error!("server misconfigured: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJsonWrapper::new(message),
                )
            }
            RequestError::DatabaseError(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJsonWrapper::new("Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}

/// True when the driver reported a unique-constraint violation. Used to make
/// inserts into the likes and follows join tables idempotent.
pub fn is_unique_violation(error: &RequestError) -> bool {
    if let RequestError::DatabaseError(sqlx::Error::Database(e)) = error {
        return e.message().contains("UNIQUE constraint failed");
    }
    false
}
