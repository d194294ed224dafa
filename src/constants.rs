//! Application constants
//!
//! Centralized location for backend paths and display defaults.

/// Backend origin used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Request timeout used when nothing is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const LOGIN_PATH: &str = "/api/login";
pub const LOGOUT_PATH: &str = "/api/logout";
pub const USERS_PATH: &str = "/api/users";

/// Avatar bounding box in image pixels. Two pixel rows share one terminal row.
pub const AVATAR_WIDTH: u32 = 32;
pub const AVATAR_HEIGHT: u32 = 32;

/// Avatar responses larger than this are rejected
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Config directory under the user's home
pub const CONFIG_DIR: &str = ".cheery-admin";
pub const CONFIG_FILE: &str = "config.yaml";

/// Environment overrides
pub const ENV_BASE_URL: &str = "CHEERY_ADMIN_URL";
pub const ENV_TIMEOUT: &str = "CHEERY_ADMIN_TIMEOUT";

/// Log file written next to the working directory
pub const LOG_FILE: &str = "cheery-admin.log";

/// Application name
pub const APP_NAME: &str = "Cheery Cats Admin";
