//! TShock REST API outbound adapter.
//!
//! This module provides the reqwest implementation of the `TShockApi` port
//! together with the token session it maintains.

mod dto;
mod http_client;
mod session;

pub use http_client::{TOKEN_PARAM, TShockClientBuildError, TShockHttpClient};
pub use session::Session;
