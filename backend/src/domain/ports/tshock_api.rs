//! Driven port for the TShock REST API.
//!
//! The domain owns the operation set and the error contract; the outbound
//! adapter owns tokens, query encoding, and response decoding.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Credentials, NewUser, ServerStatus, UserCondition, UserRecord, UserUpdate};

/// Status marker the upstream reports for successful calls.
pub const UPSTREAM_SUCCESS_STATUS: &str = "200";

define_port_error! {
    /// Failures surfaced by a TShock REST API call.
    pub enum TShockApiError {
        /// No response was received.
        Transport {
            /// Transport failure, with credentials and token stripped.
            message: String,
        } => "tshock transport failed: {message}",
        /// The per-request timeout elapsed.
        Timeout {
            /// Timeout detail.
            message: String,
        } => "tshock request timed out: {message}",
        /// The response body was not the expected JSON shape.
        Decode {
            /// Decoder failure.
            message: String,
        } => "tshock response decode failed: {message}",
        /// Upstream answered with a non-success HTTP status or status marker.
        Rejected {
            /// HTTP status, or the payload marker when it parses as a number.
            status: u16,
            /// Upstream `error` member, or a preview of the body.
            message: String,
        } => "tshock rejected request with status {status}: {message}",
    }
}

impl TShockApiError {
    /// Status code reported by upstream, when the call got that far.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Operations offered by the TShock REST API.
///
/// Calls that need a token obtain one lazily with the credentials the
/// implementation was built with.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TShockApi: Send + Sync {
    /// Mint a token for `credentials` and make it the session token.
    async fn create_token(&self, credentials: &Credentials) -> Result<String, TShockApiError>;

    /// Revoke `token`, or the session token when `None`.
    async fn destroy_token(&self, token: Option<String>) -> Result<(), TShockApiError>;

    /// Revoke every token issued by the server.
    async fn destroy_all_tokens(&self) -> Result<(), TShockApiError>;

    /// Check the session token and return the account it belongs to.
    async fn test_token(&self) -> Result<String, TShockApiError>;

    /// Fetch server state, optionally with players and rules.
    async fn server_status(
        &self,
        include_players: bool,
        include_rules: bool,
    ) -> Result<ServerStatus, TShockApiError>;

    /// Fetch the message of the day, one entry per line.
    async fn server_motd(&self) -> Result<Vec<String>, TShockApiError>;

    /// Fetch the server rules, one entry per line.
    async fn server_rules(&self) -> Result<Vec<String>, TShockApiError>;

    /// Broadcast `message` to every connected player.
    async fn server_broadcast(&self, message: &str) -> Result<(), TShockApiError>;

    /// Reload server configuration.
    async fn server_reload(&self) -> Result<(), TShockApiError>;

    /// Shut the server down.
    async fn server_off(&self) -> Result<(), TShockApiError>;

    /// Run a console command and return its output lines.
    async fn server_raw_cmd(&self, command: &str) -> Result<Vec<String>, TShockApiError>;

    /// List registered accounts.
    async fn users_list(&self) -> Result<Vec<UserRecord>, TShockApiError>;

    /// Read one account.
    async fn users_read(&self, condition: &UserCondition) -> Result<UserRecord, TShockApiError>;

    /// Register a new account.
    async fn users_create(&self, user: &NewUser) -> Result<(), TShockApiError>;

    /// Change password and/or group of an account.
    async fn users_update(
        &self,
        condition: &UserCondition,
        update: &UserUpdate,
    ) -> Result<(), TShockApiError>;

    /// Delete an account.
    async fn users_destroy(&self, condition: &UserCondition) -> Result<(), TShockApiError>;
}
