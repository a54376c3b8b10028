use thiserror::Error;

/// Message shown to the user whenever a submitted form is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";

/// Message shown when the startup position lookup fails.
pub const NO_POSITION_MESSAGE: &str = "We could not find your location.";

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{}", INVALID_INPUT_MESSAGE)]
    Validation,

    #[error("no location selected; pick a point on the map first")]
    NoLocation,

    #[error("{}", NO_POSITION_MESSAGE)]
    GeolocationUnavailable,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed workout snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
