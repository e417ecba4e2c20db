//! Session-aware client and command façade for the TShock REST API.
//!
//! - [`outbound::tshock::TShockHttpClient`] owns the token session and talks
//!   to the upstream REST API.
//! - [`domain::ServerAdminService`] maps administrative operations onto the
//!   client and collapses failures into simple outcomes.
//! - [`config::TShockSettings`] loads connection settings once at startup.

pub mod config;
pub mod domain;
pub mod outbound;
