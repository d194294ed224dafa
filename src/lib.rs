//! # Cheery Admin
//!
//! A terminal admin console for the Cheery Cats backend.
//!
//! ## Features
//! - Cookie-session login and logout
//! - User table (username, first name, last name, bio)
//! - Profile panel with the user's avatar drawn in the terminal
//! - User deletion
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod table;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use error::{ClientError, ConfigError};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Avatar, Profile, Session, SessionCredential, User};
pub use network::{ApiClient, NetworkActor};
pub use table::UserTable;
