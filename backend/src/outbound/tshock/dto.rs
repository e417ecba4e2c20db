//! DTOs for decoding TShock REST API payloads.
//!
//! Every upstream body is a JSON object that mixes envelope members
//! (`status`, `error`) with endpoint fields. The adapter checks the envelope
//! first, then decodes the endpoint fields into these DTOs and maps them into
//! domain records.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Player, ServerStatus, UserRecord};

#[derive(Debug, Deserialize)]
pub(super) struct TokenCreateDto {
    pub(super) token: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenTestDto {
    pub(super) associateduser: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ServerStatusDto {
    name: String,
    #[serde(default)]
    serverversion: String,
    #[serde(default)]
    tshockversion: String,
    port: u16,
    playercount: u32,
    maxplayers: u32,
    #[serde(default)]
    world: String,
    #[serde(default)]
    uptime: String,
    #[serde(default)]
    serverpassword: bool,
    #[serde(default)]
    players: Option<Vec<PlayerDto>>,
    #[serde(default)]
    rules: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct PlayerDto {
    nickname: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    group: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    state: Value,
    #[serde(default)]
    team: Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct MotdDto {
    #[serde(default)]
    pub(super) motd: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RulesDto {
    #[serde(default)]
    pub(super) rules: Vec<String>,
}

/// Raw command output: upstream sends either one string or a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseLinesDto {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub(super) struct RawCmdDto {
    #[serde(default)]
    response: Option<ResponseLinesDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    name: String,
    id: i64,
    #[serde(default)]
    group: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserListDto {
    #[serde(default)]
    users: Vec<UserDto>,
}

impl ServerStatusDto {
    pub(super) fn into_domain(self) -> ServerStatus {
        ServerStatus {
            name: self.name,
            serverversion: self.serverversion,
            tshockversion: self.tshockversion,
            port: self.port,
            playercount: self.playercount,
            maxplayers: self.maxplayers,
            world: self.world,
            uptime: self.uptime,
            serverpassword: self.serverpassword,
            players: self
                .players
                .map(|players| players.into_iter().map(PlayerDto::into_domain).collect()),
            rules: self.rules,
        }
    }
}

impl PlayerDto {
    fn into_domain(self) -> Player {
        Player {
            nickname: self.nickname,
            username: self.username,
            group: self.group,
            active: self.active,
            state: self.state,
            team: self.team,
        }
    }
}

impl RawCmdDto {
    pub(super) fn into_lines(self) -> Vec<String> {
        match self.response {
            Some(ResponseLinesDto::One(line)) => vec![line],
            Some(ResponseLinesDto::Many(lines)) => lines,
            None => Vec::new(),
        }
    }
}

impl UserDto {
    pub(super) fn into_domain(self) -> UserRecord {
        UserRecord {
            name: self.name,
            id: self.id,
            group: self.group,
        }
    }
}

impl UserListDto {
    pub(super) fn into_domain(self) -> Vec<UserRecord> {
        self.users.into_iter().map(UserDto::into_domain).collect()
    }
}
