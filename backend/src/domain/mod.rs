//! Domain types and the server administration façade.
//!
//! Purpose: keep the vocabulary of the TShock administration workflow free of
//! transport detail. Outbound adapters implement [`ports::TShockApi`];
//! [`ServerAdminService`] adapts port results for callers that only need a
//! success flag or a payload.
//!
//! Public surface:
//! - Credentials: validated username/password pair.
//! - UserCondition: name/id disambiguated user address.
//! - ServerStatus, UserRecord: upstream state projections.
//! - ResponseMessage: `{ code, message, data? }` envelope for outer surfaces.
//! - ServerAdminService: façade over a [`ports::TShockApi`] implementation.

pub mod credentials;
pub mod envelope;
pub mod ports;
pub mod server;
pub mod server_admin_service;
pub mod user;

pub use self::credentials::{Credentials, CredentialsValidationError};
pub use self::envelope::{FAILURE_CODE, ResponseMessage, SUCCESS_CODE};
pub use self::server::{Player, ServerStatus};
pub use self::server_admin_service::ServerAdminService;
pub use self::user::{NewUser, UserCondition, UserKind, UserRecord, UserRef, UserUpdate};
