//! Error types for WaterSave

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Advice API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Advice response contained no text")]
    EmptyResponse,

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// True for faults that originate at the advice service boundary
    pub fn is_advice_fault(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Api { .. } | Error::EmptyResponse | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
