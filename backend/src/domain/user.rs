//! Upstream user accounts and the conditions used to address them.
//!
//! The user endpoints accept either an account name or a numeric account id,
//! tagged by a `type` parameter. [`UserCondition::parse`] derives the tag from
//! caller text so the two can never disagree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Read-only projection of one upstream user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Account name.
    pub name: String,
    /// Numeric account id.
    pub id: i64,
    /// Permission group the account belongs to.
    pub group: String,
}

/// How a [`UserCondition`] addresses its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    /// Address by account name.
    Name,
    /// Address by numeric account id.
    Id,
}

impl UserKind {
    /// Wire value of the upstream `type` parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier carried by a [`UserCondition`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRef {
    /// Account name, kept exactly as supplied.
    Name(String),
    /// Numeric account id.
    Id(i64),
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Target of a read, update, or destroy user call.
///
/// ## Invariants
/// - `kind` is [`UserKind::Id`] exactly when the identifier is
///   [`UserRef::Id`]. Fields are private so the pair cannot be built
///   inconsistently.
///
/// # Examples
/// ```
/// use tshock_gateway::domain::{UserCondition, UserKind, UserRef};
///
/// let by_id = UserCondition::parse("007");
/// assert_eq!(by_id.kind(), UserKind::Id);
/// assert_eq!(by_id.user(), &UserRef::Id(7));
///
/// let by_name = UserCondition::parse("alice");
/// assert_eq!(by_name.kind(), UserKind::Name);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserCondition {
    user: UserRef,
}

impl UserCondition {
    /// Classify caller text as an id or a name.
    ///
    /// Text that parses as an `i64` once surrounding whitespace is removed is
    /// always treated as an id, so an account literally named `"42"` is
    /// addressed as id 42. Anything else, including values that overflow
    /// `i64`, is treated as a name and kept verbatim.
    pub fn parse(identifier: &str) -> Self {
        match identifier.trim().parse::<i64>() {
            Ok(id) => Self::by_id(id),
            Err(_) => Self::by_name(identifier),
        }
    }

    /// Address an account by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            user: UserRef::Name(name.into()),
        }
    }

    /// Address an account by numeric id.
    pub const fn by_id(id: i64) -> Self {
        Self {
            user: UserRef::Id(id),
        }
    }

    /// Identifier of the target account.
    pub const fn user(&self) -> &UserRef {
        &self.user
    }

    /// Addressing mode derived from the identifier.
    pub const fn kind(&self) -> UserKind {
        match self.user {
            UserRef::Name(_) => UserKind::Name,
            UserRef::Id(_) => UserKind::Id,
        }
    }

    /// Query parameters understood by the upstream user endpoints.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("user", self.user.to_string()),
            ("type", self.kind().as_str().to_owned()),
        ]
    }
}

impl fmt::Display for UserCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.user)
    }
}

/// Account to register upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Account name.
    pub name: String,
    /// Initial password.
    pub password: String,
    /// Permission group; the upstream default applies when absent.
    pub group: Option<String>,
}

/// Changes applied to an existing account. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// Replacement password.
    pub password: Option<String>,
    /// Replacement permission group.
    pub group: Option<String>,
}
