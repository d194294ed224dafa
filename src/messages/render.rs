//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::Notification;
use crate::messages::ui_events::{LoginField, Screen};
use crate::models::Profile;
use crate::table::UserTable;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,

    // Login form
    pub username_input: String,
    /// Length only; the password itself never leaves the app state
    pub password_len: usize,
    pub login_field: LoginField,
    pub login_in_flight: bool,
    /// Username the backend confirmed at login
    pub signed_in_as: Option<String>,

    // User table
    pub table: UserTable,
    pub selected_row: Option<usize>,
    pub loading_users: bool,
    pub delete_enabled: bool,
    pub delete_in_flight: bool,

    // Profile panel
    pub profile: Option<Profile>,
    pub profile_loading: bool,

    // Popups
    pub notification: Option<Notification>,
    pub show_help: bool,
}

impl RenderState {
    pub fn popup_open(&self) -> bool {
        self.notification.is_some() || self.show_help
    }
}
