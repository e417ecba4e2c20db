//! Account used to mint TShock REST tokens.
//!
//! Loaded once from configuration and handed to the client, which only needs
//! it when the session holds no token. The password never appears in `Debug`
//! output or log fields; it only leaves this type as a token-request query
//! parameter.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

/// Query parameter naming the account on a token request.
pub const USERNAME_PARAM: &str = "username";
/// Query parameter carrying the password on a token request.
pub const PASSWORD_PARAM: &str = "password";

/// Reasons a configured account cannot be used for token requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    /// Nothing but whitespace was configured as the username.
    #[error("username must not be empty")]
    EmptyUsername,
    /// An empty password was configured.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Account name and password accepted by `/v2/token/create`.
///
/// The username is trimmed; the password is sent exactly as configured and
/// wiped from memory when the value is dropped.
///
/// # Examples
/// ```
/// use tshock_gateway::domain::Credentials;
///
/// let account = Credentials::try_from_parts(" admin ", "hunter2").unwrap();
/// assert_eq!(account.username(), "admin");
/// assert!(!format!("{account:?}").contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Check a configured username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] when the trimmed username or the
    /// password is empty.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let account = username.trim();
        match (account.is_empty(), password.is_empty()) {
            (true, _) => Err(CredentialsValidationError::EmptyUsername),
            (false, true) => Err(CredentialsValidationError::EmptyPassword),
            (false, false) => Ok(Self {
                username: account.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
        }
    }

    /// Account name, safe to log.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Plain-text password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Query parameters for a token request.
    pub fn token_request_params(&self) -> [(&'static str, String); 2] {
        [
            (USERNAME_PARAM, self.username.clone()),
            (PASSWORD_PARAM, self.password.as_str().to_owned()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
