//! Error types for the exchange board.
//!
//! Every stage of the fetch → convert → render pipeline returns a
//! `BoardResult`; the board collapses any of these into one message.
use std::io;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// Transport-level failure talking to the rate endpoint.
    #[error("Error fetching exchange rates: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("API request limit exceeded")]
    RequestLimit,

    /// Endpoint answered with a non-success status.
    #[error("Error fetching exchange rates: {0}")]
    Status(StatusCode),

    /// Response body did not have the expected shape or held an unusable rate.
    #[error("Unexpected rates payload: {0}")]
    Payload(String),

    /// A tracked currency is absent from the snapshot.
    #[error("Rate not found in response: {0}")]
    MissingRate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Payload(err.to_string())
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
