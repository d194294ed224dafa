//! App state - pure data structure with no I/O logic

use chrono::{DateTime, Local};

use crate::messages::ui_events::{LoginField, Screen};
use crate::messages::RenderState;
use crate::models::{Profile, Session};
use crate::table::UserTable;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Message shown in a popup until the user dismisses it
#[derive(Clone, Debug)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Info,
            message: message.into(),
            at: Local::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
            at: Local::now(),
        }
    }
}

/// Request ids the app is currently waiting on, one slot per action.
/// A completion whose id is not in its slot is stale and gets dropped.
/// Deletes are independent of each other, so every in-flight one is kept.
#[derive(Clone, Debug, Default)]
pub struct PendingRequests {
    pub login: Option<u64>,
    pub users: Option<u64>,
    pub profile: Option<u64>,
    pub delete: Vec<u64>,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub session: Session,

    // Login form
    pub username_input: String,
    pub password_input: String,
    pub login_field: LoginField,
    pub signed_in_as: Option<String>,

    // User table
    pub table: UserTable,
    pub selected_row: Option<usize>,

    // Profile panel
    pub profile: Option<Profile>,

    // Requests
    pub next_request_id: u64,
    pub pending: PendingRequests,

    // Popups
    pub notification: Option<Notification>,
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            session: Session::default(),
            username_input: String::new(),
            password_input: String::new(),
            login_field: LoginField::Username,
            signed_in_as: None,
            table: UserTable::default(),
            selected_row: None,
            profile: None,
            next_request_id: 1,
            pending: PendingRequests::default(),
            notification: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_authenticated() {
            Screen::Users
        } else {
            Screen::Login
        }
    }

    pub fn delete_enabled(&self) -> bool {
        self.session.is_authenticated() && self.selected_row.is_some()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen(),
            username_input: self.username_input.clone(),
            password_len: self.password_input.chars().count(),
            login_field: self.login_field,
            login_in_flight: self.pending.login.is_some(),
            signed_in_as: self.signed_in_as.clone(),
            table: self.table.clone(),
            selected_row: self.selected_row,
            loading_users: self.pending.users.is_some(),
            delete_enabled: self.delete_enabled(),
            delete_in_flight: !self.pending.delete.is_empty(),
            profile: self.profile.clone(),
            profile_loading: self.pending.profile.is_some(),
            notification: self.notification.clone(),
            show_help: self.show_help,
        }
    }
}
