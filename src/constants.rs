//! Shared constants used across the client.

/// User agent sent with every API request.
pub const CLIENT_USER_AGENT: &str = concat!("complexapp-client/", env!("CARGO_PKG_VERSION"));

/// Name appended to every page title.
pub const APP_NAME: &str = "ComplexApp";
