//! Control-plane HTTP surface.
//!
//! `POST /send` lets an external system push a message to any recipient.
//! It bypasses the classifier and the single-flight guard entirely.

pub mod routes;

pub use routes::{GatewayState, SendRequest, control_routes};
