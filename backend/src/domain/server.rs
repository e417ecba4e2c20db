//! Server state reported by the status endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of a running game server.
///
/// Only server-state fields live here; transport envelope members such as the
/// upstream `status` marker are consumed by the outbound adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Configured server name.
    pub name: String,
    /// Game server version string.
    pub serverversion: String,
    /// TShock plugin version string.
    pub tshockversion: String,
    /// Listening port.
    pub port: u16,
    /// Players currently connected.
    pub playercount: u32,
    /// Player slots available.
    pub maxplayers: u32,
    /// Loaded world name.
    pub world: String,
    /// Uptime as formatted by the server.
    pub uptime: String,
    /// Whether joining requires a server password.
    pub serverpassword: bool,
    /// Connected players, present when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<Player>>,
    /// Server rule switches keyed by rule name, present when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<BTreeMap<String, Value>>,
}

/// One connected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// In-game character name.
    pub nickname: String,
    /// Account the player is logged in as; empty when anonymous.
    pub username: String,
    /// Permission group.
    pub group: String,
    /// Whether the player slot is active.
    pub active: bool,
    /// Connection state code as reported upstream.
    pub state: Value,
    /// Team identifier as reported upstream.
    pub team: Value,
}
