use thiserror::Error;

/// Errors that stop the program before or outside the repair loop.
///
/// Everything the loop itself can recover from is expressed as a
/// [`crate::Diagnostic`] or a [`SuggestError`] instead.
#[derive(Debug, Error)]
pub enum MendError {
    /// Missing or unusable startup configuration, e.g. the API credential.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single fix request.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The service call itself failed (network, auth, quota, timeout).
    /// Retrying an identical request is unlikely to help, so the loop
    /// treats this as fatal.
    #[error("fix service error: {0}")]
    Service(String),
    /// The service answered, but the reply did not parse into exactly one
    /// fix suggestion variant. Counts as a stagnant iteration.
    #[error("malformed fix suggestion: {0}")]
    MalformedResponse(String),
}
