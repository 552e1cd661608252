use thiserror::Error;

/// Failures talking to the services around the backend.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The request never completed (DNS, TLS, timeouts, body reads).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Service {
        service: &'static str,
        status: u16,
        message: String,
    },
    /// The service answered 2xx but the payload was not usable.
    #[error("{0}")]
    InvalidResponse(String),
    /// Anything on the SMTP path, from bad addresses to send errors.
    #[error("{0}")]
    Mail(String),
}
