//! Server administration façade.
//!
//! Maps administrative intents onto [`TShockApi`] calls. Port failures are
//! logged with their full detail and then collapsed into `false`, `None`, or
//! an empty list, so callers only ever see whether an operation succeeded.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{TShockApi, TShockApiError};
use crate::domain::{Credentials, NewUser, ServerStatus, UserCondition, UserRecord, UserUpdate};

/// Façade translating domain operations into TShock REST API calls.
pub struct ServerAdminService<A: ?Sized> {
    api: Arc<A>,
    credentials: Credentials,
}

impl<A: ?Sized> Clone for ServerAdminService<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            credentials: self.credentials.clone(),
        }
    }
}

impl<A: ?Sized> ServerAdminService<A> {
    /// Create a façade over `api`, logging in with `credentials` on demand.
    pub fn new(api: Arc<A>, credentials: Credentials) -> Self {
        Self { api, credentials }
    }
}

impl<A> ServerAdminService<A>
where
    A: TShockApi + ?Sized,
{
    /// Mint a fresh token with the configured credentials.
    pub async fn login(&self) -> bool {
        let outcome = settle("login", self.api.create_token(&self.credentials).await);
        if outcome.is_some() {
            info!(username = self.credentials.username(), "tshock login succeeded");
        }
        outcome.is_some()
    }

    /// Check that the session token is still accepted; returns its account.
    pub async fn verify_token(&self) -> Option<String> {
        settle("verify_token", self.api.test_token().await)
    }

    /// Current server state without transport fields.
    pub async fn status(&self, include_players: bool, include_rules: bool) -> Option<ServerStatus> {
        settle(
            "status",
            self.api.server_status(include_players, include_rules).await,
        )
    }

    /// Message of the day; empty when unavailable.
    pub async fn motd(&self) -> Vec<String> {
        settle("motd", self.api.server_motd().await).unwrap_or_default()
    }

    /// Server rules; empty when unavailable.
    pub async fn rules(&self) -> Vec<String> {
        settle("rules", self.api.server_rules().await).unwrap_or_default()
    }

    /// Broadcast `message` to all players.
    pub async fn broadcast(&self, message: &str) -> bool {
        settle("broadcast", self.api.server_broadcast(message).await).is_some()
    }

    /// Run a console command; returns its output lines, or nothing on failure.
    pub async fn execute_command(&self, command: &str) -> Vec<String> {
        settle("execute_command", self.api.server_raw_cmd(command).await).unwrap_or_default()
    }

    /// Registered accounts; empty when unavailable.
    pub async fn list_users(&self) -> Vec<UserRecord> {
        settle("list_users", self.api.users_list().await).unwrap_or_default()
    }

    /// Look up an account by name or numeric id.
    pub async fn get_user(&self, identifier: &str) -> Option<UserRecord> {
        let condition = UserCondition::parse(identifier);
        settle("get_user", self.api.users_read(&condition).await)
    }

    /// Register an account.
    pub async fn create_user(&self, name: &str, password: &str, group: Option<&str>) -> bool {
        let user = NewUser {
            name: name.to_owned(),
            password: password.to_owned(),
            group: group.map(str::to_owned),
        };
        settle("create_user", self.api.users_create(&user).await).is_some()
    }

    /// Delete the account addressed by `identifier`.
    pub async fn remove_user(&self, identifier: &str) -> bool {
        let condition = UserCondition::parse(identifier);
        settle("remove_user", self.api.users_destroy(&condition).await).is_some()
    }

    /// Change password and/or group of the account addressed by `identifier`.
    pub async fn save_user(
        &self,
        identifier: &str,
        password: Option<&str>,
        group: Option<&str>,
    ) -> bool {
        let condition = UserCondition::parse(identifier);
        let update = UserUpdate {
            password: password.map(str::to_owned),
            group: group.map(str::to_owned),
        };
        settle("save_user", self.api.users_update(&condition, &update).await).is_some()
    }
}

fn settle<T>(operation: &'static str, result: Result<T, TShockApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(
                operation,
                status = error.status_code(),
                error = %error,
                "tshock call failed"
            );
            None
        }
    }
}
