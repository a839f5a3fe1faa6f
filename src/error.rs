use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Failure of a single round trip to the movie API.
///
/// Pages never branch on the variant; every failure becomes the same fixed
/// message at the call site.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to movie API failed: {0}")]
    Transport(#[source] wreq::Error),
    #[error("movie API responded with status {status}")]
    Status { status: u16 },
    #[error("could not decode movie API response: {0}")]
    Decode(#[source] wreq::Error),
}

impl From<wreq::Error> for ApiError {
    fn from(err: wreq::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status { status: status.as_u16() };
        }
        if err.is_decode() { Self::Decode(err) } else { Self::Transport(err) }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = crate::templates::error_page(self.to_string());
        (StatusCode::BAD_REQUEST, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
