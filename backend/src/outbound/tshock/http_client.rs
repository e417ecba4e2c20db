//! Reqwest-backed TShock REST API client.
//!
//! This adapter owns transport details only: the token session, query
//! encoding, envelope checks, and mapping of HTTP failures into
//! [`TShockApiError`]. Every call is a single GET without retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::dto::{
    MotdDto, RawCmdDto, RulesDto, ServerStatusDto, TokenCreateDto, TokenTestDto, UserDto,
    UserListDto,
};
use super::session::Session;
use crate::domain::ports::{TShockApi, TShockApiError, UPSTREAM_SUCCESS_STATUS};
use crate::domain::{Credentials, NewUser, ServerStatus, UserCondition, UserRecord, UserUpdate};

/// Query parameter carrying the session token on authenticated calls.
pub const TOKEN_PARAM: &str = "token";

const TOKEN_CREATE_PATH: &str = "/v2/token/create";
const TOKEN_DESTROY_PATH: &str = "/token/destroy";
const TOKEN_DESTROY_ALL_PATH: &str = "/token/destroy/all";
const TOKEN_TEST_PATH: &str = "/tokentest";
const SERVER_STATUS_PATH: &str = "/v2/server/status";
const SERVER_MOTD_PATH: &str = "/v3/server/motd";
const SERVER_RULES_PATH: &str = "/v3/server/rules";
const SERVER_BROADCAST_PATH: &str = "/v2/server/broadcast";
const SERVER_RELOAD_PATH: &str = "/v3/server/reload";
const SERVER_OFF_PATH: &str = "/v2/server/off";
const SERVER_RAW_CMD_PATH: &str = "/v3/server/rawcmd";
const USERS_LIST_PATH: &str = "/v2/users/list";
const USERS_READ_PATH: &str = "/v2/users/read";
const USERS_CREATE_PATH: &str = "/v2/users/create";
const USERS_UPDATE_PATH: &str = "/v2/users/update";
const USERS_DESTROY_PATH: &str = "/v2/users/destroy";

type QueryParams = Vec<(&'static str, String)>;

/// Errors raised while constructing [`TShockHttpClient`].
#[derive(Debug, Error)]
pub enum TShockClientBuildError {
    /// The underlying reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    /// The base URL cannot have path segments appended.
    #[error("base URL {url} cannot carry an API path")]
    InvalidBaseUrl {
        /// Rejected base URL.
        url: Url,
    },
}

/// TShock REST API client that authenticates lazily and keeps one token.
///
/// The session mutex is held across "check token, create if missing", so
/// concurrent authenticated calls on an empty session share a single login.
pub struct TShockHttpClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    session: Mutex<Session>,
}

impl TShockHttpClient {
    /// Build a client with an empty session and a fixed per-request timeout.
    /// ```rust,ignore
    /// let client = TShockHttpClient::new(base_url, Duration::from_secs(1), credentials)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the base URL cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        credentials: Credentials,
    ) -> Result<Self, TShockClientBuildError> {
        Self::with_session(base_url, timeout, credentials, Session::default())
    }

    /// Build a client whose session is seeded with an existing token.
    ///
    /// # Errors
    ///
    /// Same as [`TShockHttpClient::new`].
    pub fn with_token(
        base_url: Url,
        timeout: Duration,
        credentials: Credentials,
        token: String,
    ) -> Result<Self, TShockClientBuildError> {
        Self::with_session(base_url, timeout, credentials, Session::with_token(token))
    }

    fn with_session(
        base_url: Url,
        timeout: Duration,
        credentials: Credentials,
        session: Session,
    ) -> Result<Self, TShockClientBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(TShockClientBuildError::InvalidBaseUrl { url: base_url });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
            session: Mutex::new(session),
        })
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Issue one GET against `path` and decode the payload as `T`.
    ///
    /// When `needs_auth` is set the session token is appended as
    /// [`TOKEN_PARAM`], logging in first with the construction-time
    /// credentials if no token is held yet.
    ///
    /// # Errors
    ///
    /// Returns [`TShockApiError`] for transport failures, timeouts, non-2xx
    /// statuses, non-success status markers, and undecodable payloads.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: QueryParams,
        needs_auth: bool,
    ) -> Result<T, TShockApiError> {
        let url = self.endpoint(path_segments(path))?;
        if needs_auth {
            params.push((TOKEN_PARAM, self.authenticated_token().await?));
        }
        self.dispatch(path, url, &params, needs_auth).await
    }

    async fn authenticated_token(&self) -> Result<String, TShockApiError> {
        let mut session = self.session.lock().await;
        if let Some(token) = session.token() {
            return Ok(token.to_owned());
        }
        debug!("no session token held; logging in first");
        self.issue_token(&mut session, &self.credentials).await
    }

    async fn issue_token(
        &self,
        session: &mut Session,
        credentials: &Credentials,
    ) -> Result<String, TShockApiError> {
        let url = self.endpoint(path_segments(TOKEN_CREATE_PATH))?;
        let params = credentials.token_request_params();
        let created: TokenCreateDto = self
            .dispatch(TOKEN_CREATE_PATH, url, &params, false)
            .await?;
        session.replace(created.token.clone());
        info!(username = credentials.username(), "tshock token issued");
        Ok(created.token)
    }

    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, TShockApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TShockApiError::transport(format!(
                    "base URL {} cannot carry an API path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        route: &str,
        url: Url,
        params: &[(&'static str, String)],
        authenticated: bool,
    ) -> Result<T, TShockApiError> {
        debug!(route, authenticated, "sending tshock request");
        let result = self.exchange(url, params).await;
        if let Err(error) = &result {
            warn!(
                route,
                status = error.status_code(),
                error = %error,
                "tshock request failed"
            );
        }
        result
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&'static str, String)],
    ) -> Result<T, TShockApiError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        decode_body(status, body.as_ref())
    }
}

#[async_trait]
impl TShockApi for TShockHttpClient {
    async fn create_token(&self, credentials: &Credentials) -> Result<String, TShockApiError> {
        let mut session = self.session.lock().await;
        self.issue_token(&mut session, credentials).await
    }

    async fn destroy_token(&self, token: Option<String>) -> Result<(), TShockApiError> {
        let current = self.authenticated_token().await?;
        let target = token.unwrap_or_else(|| current.clone());
        let url = self.endpoint(path_segments(TOKEN_DESTROY_PATH).chain([target.as_str()]))?;
        self.dispatch::<IgnoredAny>(TOKEN_DESTROY_PATH, url, &[(TOKEN_PARAM, current)], true)
            .await?;
        Ok(())
    }

    async fn destroy_all_tokens(&self) -> Result<(), TShockApiError> {
        self.get::<IgnoredAny>(TOKEN_DESTROY_ALL_PATH, Vec::new(), true)
            .await?;
        Ok(())
    }

    async fn test_token(&self) -> Result<String, TShockApiError> {
        let dto: TokenTestDto = self.get(TOKEN_TEST_PATH, Vec::new(), true).await?;
        Ok(dto.associateduser)
    }

    async fn server_status(
        &self,
        include_players: bool,
        include_rules: bool,
    ) -> Result<ServerStatus, TShockApiError> {
        let params = vec![
            ("players", include_players.to_string()),
            ("rules", include_rules.to_string()),
        ];
        let dto: ServerStatusDto = self.get(SERVER_STATUS_PATH, params, false).await?;
        Ok(dto.into_domain())
    }

    async fn server_motd(&self) -> Result<Vec<String>, TShockApiError> {
        let dto: MotdDto = self.get(SERVER_MOTD_PATH, Vec::new(), false).await?;
        Ok(dto.motd)
    }

    async fn server_rules(&self) -> Result<Vec<String>, TShockApiError> {
        let dto: RulesDto = self.get(SERVER_RULES_PATH, Vec::new(), false).await?;
        Ok(dto.rules)
    }

    async fn server_broadcast(&self, message: &str) -> Result<(), TShockApiError> {
        let params = vec![("msg", message.to_owned())];
        self.get::<IgnoredAny>(SERVER_BROADCAST_PATH, params, true)
            .await?;
        Ok(())
    }

    async fn server_reload(&self) -> Result<(), TShockApiError> {
        self.get::<IgnoredAny>(SERVER_RELOAD_PATH, Vec::new(), true)
            .await?;
        Ok(())
    }

    async fn server_off(&self) -> Result<(), TShockApiError> {
        // Upstream refuses to shut down without an explicit confirmation flag.
        let params = vec![("confirm", "true".to_owned())];
        self.get::<IgnoredAny>(SERVER_OFF_PATH, params, true).await?;
        Ok(())
    }

    async fn server_raw_cmd(&self, command: &str) -> Result<Vec<String>, TShockApiError> {
        let params = vec![("cmd", command.to_owned())];
        let dto: RawCmdDto = self.get(SERVER_RAW_CMD_PATH, params, true).await?;
        Ok(dto.into_lines())
    }

    async fn users_list(&self) -> Result<Vec<UserRecord>, TShockApiError> {
        let dto: UserListDto = self.get(USERS_LIST_PATH, Vec::new(), true).await?;
        Ok(dto.into_domain())
    }

    async fn users_read(&self, condition: &UserCondition) -> Result<UserRecord, TShockApiError> {
        let dto: UserDto = self
            .get(USERS_READ_PATH, condition.query_pairs().into(), true)
            .await?;
        Ok(dto.into_domain())
    }

    async fn users_create(&self, user: &NewUser) -> Result<(), TShockApiError> {
        let mut params = vec![
            ("user", user.name.clone()),
            ("password", user.password.clone()),
        ];
        if let Some(group) = &user.group {
            params.push(("group", group.clone()));
        }
        self.get::<IgnoredAny>(USERS_CREATE_PATH, params, true)
            .await?;
        Ok(())
    }

    async fn users_update(
        &self,
        condition: &UserCondition,
        update: &UserUpdate,
    ) -> Result<(), TShockApiError> {
        let mut params: QueryParams = condition.query_pairs().into();
        if let Some(password) = &update.password {
            params.push(("password", password.clone()));
        }
        if let Some(group) = &update.group {
            params.push(("group", group.clone()));
        }
        self.get::<IgnoredAny>(USERS_UPDATE_PATH, params, true)
            .await?;
        Ok(())
    }

    async fn users_destroy(&self, condition: &UserCondition) -> Result<(), TShockApiError> {
        self.get::<IgnoredAny>(USERS_DESTROY_PATH, condition.query_pairs().into(), true)
            .await?;
        Ok(())
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, TShockApiError> {
    if !status.is_success() {
        return Err(map_status_error(status, body));
    }

    let payload: Value = serde_json::from_slice(body).map_err(|error| {
        TShockApiError::decode(format!("invalid TShock JSON payload: {error}"))
    })?;
    check_status_marker(status, &payload)?;
    serde_json::from_value(payload)
        .map_err(|error| TShockApiError::decode(format!("unexpected TShock payload: {error}")))
}

fn check_status_marker(status: StatusCode, payload: &Value) -> Result<(), TShockApiError> {
    let marker = match payload.get("status") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(marker)) => marker.clone(),
        Some(other) => other.to_string(),
    };
    if marker == UPSTREAM_SUCCESS_STATUS {
        return Ok(());
    }

    let code = marker.parse::<u16>().unwrap_or_else(|_| status.as_u16());
    let message = upstream_error(payload).unwrap_or_else(|| format!("status marker {marker}"));
    Err(TShockApiError::rejected(code, message))
}

fn upstream_error(payload: &Value) -> Option<String> {
    payload
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_owned)
}

fn map_transport_error(error: reqwest::Error) -> TShockApiError {
    // The request URL carries the password or session token in its query.
    let error = error.without_url();
    if error.is_timeout() {
        TShockApiError::timeout(error.to_string())
    } else if error.is_decode() {
        TShockApiError::decode(error.to_string())
    } else {
        TShockApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TShockApiError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(upstream_error)
        .unwrap_or_else(|| {
            let preview = body_preview(body);
            if preview.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                preview
            }
        });
    TShockApiError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
