use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionsApiError {
    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API responded with status {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("GitHub API returned an invalid response: {0}")]
    InvalidResponse(String),
}
