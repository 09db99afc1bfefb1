//! Credential port supplying the bearer token for API requests.

/// Supplies the value sent as `Authorization: Bearer <token>`.
///
/// The server never validates the token against an identity, so this is the
/// single seam where a real credential would be plugged in.
pub trait CredentialProvider: Send + Sync {
    /// Returns the bearer token for the next request.
    fn bearer_token(&self) -> String;
}
