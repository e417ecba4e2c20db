//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod tshock_api;

#[cfg(test)]
pub use tshock_api::MockTShockApi;
pub use tshock_api::{TShockApi, TShockApiError, UPSTREAM_SUCCESS_STATUS};
