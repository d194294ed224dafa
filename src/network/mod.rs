//! Network layer - backend calls and avatar decoding
//!
//! The Network actor receives commands and sends back tagged responses.

pub mod actor;
pub mod avatar;
pub mod client;

pub use actor::NetworkActor;
pub use client::ApiClient;
