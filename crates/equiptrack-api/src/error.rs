use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("unexpected failure")]
    Internal,
}

impl From<equiptrack_db::Error> for Error {
    fn from(err: equiptrack_db::Error) -> Self {
        match err {
            equiptrack_db::Error::NotFound => Error::NotFound("record"),
            equiptrack_db::Error::Conflict(message) => Error::Conflict(message),
            other => {
                tracing::error!("store failure: {other}");
                Error::Internal
            }
        }
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            Error::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not-found"),
            Error::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict"),
            Error::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            Error::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
