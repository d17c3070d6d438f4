//! Error taxonomy shared by the core transformations and the shell.

/// Errors raised by core operations.
///
/// Construction of entities never fails; these are raised by derived
/// operations with stricter shape requirements (URL derivation, response
/// validation, query building).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required input was missing before any remote call was attempted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A resource identifier does not match its kind-specific grammar.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// A transported response lacks an expected top-level key.
    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// Opaque failure reported by the transport.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// An operation needing a session was invoked before login.
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    /// The configuration document could not be parsed.
    #[error("Config error: {0}")]
    Config(String),
}
