//! HTTP and WebSocket front end for the party_poker room managers.
//!
//! The binary in `main.rs` wires these modules together. They are exposed
//! as a library so the router can be driven in tests without a socket.

pub mod api;
pub mod config;
pub mod logging;
