#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("XRPC error [{status}] on {method}: {body}")]
    Http {
        method: String,
        status: u16,
        body: String,
    },

    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
