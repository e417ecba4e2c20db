//! Authentication state held by the HTTP client.

/// Token currently used for authenticated calls.
///
/// The session starts empty unless seeded and is only replaced by a
/// successful token creation. Upstream expiry is not tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Session seeded with an existing token.
    pub const fn with_token(token: String) -> Self {
        Self { token: Some(token) }
    }

    /// Stored token, if one has been issued.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the stored token.
    pub(crate) fn replace(&mut self, token: String) {
        self.token = Some(token);
    }
}
