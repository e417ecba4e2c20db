//! TShock REST API settings loaded via OrthoConfig.
//!
//! Values come from `TS_REST_API_*` environment variables (or a config file)
//! and are read once at startup.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{Credentials, CredentialsValidationError};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7878";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Errors raised while turning settings into client inputs.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The configured base URL is not a valid URL.
    #[error("invalid TS_REST_API_BASE_URL {value:?}: {source}")]
    InvalidBaseUrl {
        /// Raw configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// No username was configured.
    #[error("TS_REST_API_USERNAME must be set")]
    MissingUsername,
    /// No password was configured.
    #[error("TS_REST_API_PASSWORD must be set")]
    MissingPassword,
    /// Configured credentials are blank.
    #[error("invalid TShock credentials: {0}")]
    InvalidCredentials(#[from] CredentialsValidationError),
}

/// Connection settings for the upstream TShock REST API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TS_REST_API")]
pub struct TShockSettings {
    /// Root URL of the REST API.
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Account used to mint tokens.
    pub username: Option<String>,
    /// Password for `username`.
    pub password: Option<String>,
}

impl TShockSettings {
    /// Return the configured base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not parse.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let value = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::InvalidBaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the configured request timeout, falling back to the default.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// Return validated login credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when either value is missing or blank.
    pub fn credentials(&self) -> Result<Credentials, SettingsError> {
        let username = self
            .username
            .as_deref()
            .ok_or(SettingsError::MissingUsername)?;
        let password = self
            .password
            .as_deref()
            .ok_or(SettingsError::MissingPassword)?;
        Ok(Credentials::try_from_parts(username, password)?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for TShock settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> TShockSettings {
        TShockSettings::load_from_iter([OsString::from("tshock-admin")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("TS_REST_API_BASE_URL", None::<String>),
            ("TS_REST_API_TIMEOUT_MS", None::<String>),
            ("TS_REST_API_USERNAME", None::<String>),
            ("TS_REST_API_PASSWORD", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("default URL").as_str(),
            "http://127.0.0.1:7878/"
        );
        assert_eq!(settings.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert!(matches!(
            settings.credentials(),
            Err(SettingsError::MissingUsername)
        ));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "TS_REST_API_BASE_URL",
                Some("http://tshock.internal:7878".to_owned()),
            ),
            ("TS_REST_API_TIMEOUT_MS", Some("2500".to_owned())),
            ("TS_REST_API_USERNAME", Some("  admin ".to_owned())),
            ("TS_REST_API_PASSWORD", Some("secret".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("configured URL").host_str(),
            Some("tshock.internal")
        );
        assert_eq!(settings.timeout(), Duration::from_millis(2500));
        let credentials = settings.credentials().expect("credentials");
        assert_eq!(credentials.username(), "admin");
        assert_eq!(credentials.password(), "secret");
    }

    #[rstest]
    #[case(Some("admin"), None, "TS_REST_API_PASSWORD must be set")]
    #[case(Some("   "), Some("pw"), "invalid TShock credentials: username must not be empty")]
    fn incomplete_credentials_are_reported(
        #[case] username: Option<&str>,
        #[case] password: Option<&str>,
        #[case] expected: &str,
    ) {
        let settings = TShockSettings {
            base_url: None,
            timeout_ms: None,
            username: username.map(str::to_owned),
            password: password.map(str::to_owned),
        };
        let error = settings.credentials().expect_err("credentials must fail");
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let settings = TShockSettings {
            base_url: Some("not a url".to_owned()),
            timeout_ms: None,
            username: None,
            password: None,
        };
        assert!(matches!(
            settings.base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
    }
}
