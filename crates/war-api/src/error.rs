use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;

/// A failed War API fetch. `Clone` so a single failure can be handed to every
/// caller waiting on the same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The task driving the request died before settling.
    #[error("fetch for {key} did not complete: {message}")]
    Aborted { key: String, message: String },
}
