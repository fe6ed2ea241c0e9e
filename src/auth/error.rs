use thiserror::Error;

/// Failures of the credential and session-token layer.
///
/// The `Display` strings of the two 401 variants are the exact messages sent to
/// clients, so they stay short and never say which check failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Authorization header absent or not of the form `Bearer <token>`.
    #[error("Missing token")]
    MissingCredential,

    /// Bad signature, malformed payload, or elapsed expiry.
    #[error("Invalid/expired token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}
