use std::fmt;

use super::AuthError;

/// Bearer token handed out by the local credential helper.
///
/// Construction validates the raw helper output, so a broken helper fails
/// here instead of as an opaque 401 on the first request.
#[derive(Clone, PartialEq, Eq)]
pub struct GhToken(String);

impl GhToken {
    /// Trim and validate raw helper output.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        if token
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control())
        {
            return Err(AuthError::MalformedToken);
        }
        Ok(Self(token.to_owned()))
    }

    /// Raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` request header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for GhToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GhToken(<redacted>)")
    }
}
