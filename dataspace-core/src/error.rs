use thiserror::Error;

/// Failure of a single API client call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. Only the failed operation
    /// is reported, never the status or body.
    #[error("Failed to fetch {operation}")]
    RequestFailed { operation: &'static str },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Rejected interaction with a view container.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown city '{0}'. Run `dataspace cities` to list the available ones.")]
    UnknownCity(String),

    #[error("Invalid {axis} '{input}': expected a decimal number")]
    InvalidCoordinate { axis: &'static str, input: String },

    #[error("A request is already in flight")]
    AlreadyFetching,

    #[error("The view has been torn down")]
    Unmounted,
}
