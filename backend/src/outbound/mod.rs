//! Outbound adapters implementing domain ports for external services.
//!
//! - **tshock**: reqwest-backed client for the TShock REST API.
//!
//! Adapters translate between domain types and wire representations and own
//! transport concerns such as authentication tokens. They contain no
//! administrative policy.

pub mod tshock;
