//! Live adapters for the `CredentialProvider` port.

use crate::ports::{Clock, CredentialProvider, IdGenerator};

const RANDOM_PART_LEN: usize = 11;

/// A token supplied from configuration.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps a configured token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> String {
        self.0.clone()
    }
}

/// A throwaway token generated once per process.
///
/// Shape: a random lowercase alphanumeric prefix followed by the base-36
/// encoding of the generation time in milliseconds.
#[derive(Debug, Clone)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a token from the given randomness and time sources.
    #[must_use]
    pub fn generate(id_gen: &dyn IdGenerator, clock: &dyn Clock) -> Self {
        let random: String = id_gen
            .generate_id()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .take(RANDOM_PART_LEN)
            .collect();
        let millis = clock.now().timestamp_millis().unsigned_abs();
        Self(format!("{random}{}", to_base36(millis)))
    }

    /// Returns the generated token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CredentialProvider for SessionToken {
    fn bearer_token(&self) -> String {
        self.0.clone()
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[usize::try_from(value % 36).unwrap_or_default()]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
