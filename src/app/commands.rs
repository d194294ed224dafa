//! Command handlers - business logic for processing UI events and network results

use crate::app::state::{Notification, PendingRequests};
use crate::app::AppState;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::messages::ui_events::LoginField;
use crate::models::Profile;

impl AppState {
    // ========================
    // Login form
    // ========================

    fn focused_input_mut(&mut self) -> &mut String {
        match self.login_field {
            LoginField::Username => &mut self.username_input,
            LoginField::Password => &mut self.password_input,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        self.focused_input_mut().push(c);
    }

    pub fn delete_char(&mut self) {
        self.focused_input_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.login_field = self.login_field.next();
    }

    /// Start a login unless one is already in flight
    pub fn submit_login(&mut self) -> Option<NetworkCommand> {
        if self.pending.login.is_some() || self.session.is_authenticated() {
            return None;
        }
        let id = self.next_id();
        self.pending.login = Some(id);
        Some(NetworkCommand::Login {
            id,
            username: self.username_input.clone(),
            password: self.password_input.clone(),
        })
    }

    // ========================
    // Session
    // ========================

    /// Clear everything tied to the session. The returned command carries the
    /// old credential for a best-effort server-side logout.
    pub fn logout(&mut self) -> Option<NetworkCommand> {
        let credential = self.session.clear();
        self.table.clear();
        self.selected_row = None;
        self.profile = None;
        self.pending = PendingRequests::default();
        self.username_input.clear();
        self.password_input.clear();
        self.login_field = LoginField::Username;
        self.signed_in_as = None;

        credential.map(|credential| {
            self.notification = Some(Notification::info("Logged out successfully."));
            NetworkCommand::Logout {
                credential: Some(credential),
            }
        })
    }

    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        if !self.session.is_authenticated() {
            return None;
        }
        let id = self.next_id();
        self.pending.users = Some(id);
        Some(NetworkCommand::ListUsers {
            id,
            credential: self.session.credential().cloned(),
        })
    }

    // ========================
    // Selection and profile
    // ========================

    pub fn select_next(&mut self) -> Option<NetworkCommand> {
        if self.table.is_empty() {
            return None;
        }
        let row = match self.selected_row {
            Some(r) => (r + 1).min(self.table.row_count() - 1),
            None => 0,
        };
        self.select_row(row)
    }

    pub fn select_prev(&mut self) -> Option<NetworkCommand> {
        if self.table.is_empty() {
            return None;
        }
        let row = match self.selected_row {
            Some(r) => r.saturating_sub(1),
            None => 0,
        };
        self.select_row(row)
    }

    /// Select `row` and request its profile. Re-selecting the shown row is a no-op.
    pub fn select_row(&mut self, row: usize) -> Option<NetworkCommand> {
        let user = self.table.user_at(row)?.clone();
        if self.selected_row == Some(row) && self.profile.as_ref().is_some_and(|p| p.user.id == user.id) {
            return None;
        }
        self.selected_row = Some(row);

        if user.avatar_path().is_none() {
            self.pending.profile = None;
            self.profile = Some(Profile { user, avatar: None });
            return None;
        }

        let id = self.next_id();
        self.pending.profile = Some(id);
        Some(NetworkCommand::FetchAvatar {
            id,
            user,
            credential: self.session.credential().cloned(),
        })
    }

    // ========================
    // Delete
    // ========================

    pub fn delete_selected(&mut self) -> Option<NetworkCommand> {
        if !self.delete_enabled() {
            return None;
        }
        let user_id = self.table.user_at(self.selected_row?)?.id;
        let id = self.next_id();
        self.pending.delete.push(id);
        Some(NetworkCommand::DeleteUser {
            id,
            user_id,
            credential: self.session.credential().cloned(),
        })
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn dismiss_popup(&mut self) {
        if self.notification.is_some() {
            self.notification = None;
        } else {
            self.show_help = false;
        }
    }

    // ========================
    // Network results
    // ========================

    /// Apply a completed call. May return a follow-up command.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::LoginCompleted { id, result } => {
                if !take_pending(&mut self.pending.login, id) {
                    return None;
                }
                match result {
                    Ok(outcome) => {
                        self.session.set(outcome.credential);
                        self.signed_in_as = outcome.username.or_else(|| Some(self.username_input.clone()));
                        self.password_input.clear();
                        self.refresh()
                    }
                    Err(e) => {
                        self.notification = Some(Notification::error(format!("Login failed: {}", e)));
                        None
                    }
                }
            }

            NetworkResponse::UsersLoaded { id, result } => {
                if !take_pending(&mut self.pending.users, id) {
                    return None;
                }
                match result {
                    Ok(users) => {
                        self.table.set_users(users);
                        self.selected_row = None;
                        self.profile = None;
                        self.pending.profile = None;
                    }
                    Err(e) => {
                        self.notification = Some(Notification::error(format!("Failed to fetch users: {}", e)));
                    }
                }
                None
            }

            NetworkResponse::UserDeleted { id, user_id, result } => {
                if !take_pending_delete(&mut self.pending.delete, id) {
                    return None;
                }
                match result {
                    Ok(()) => {
                        if let Some(row) = self.table.position_of(user_id) {
                            self.table.remove_row(row);
                            self.selected_row = match self.selected_row {
                                Some(s) if s == row => None,
                                Some(s) if s > row => Some(s - 1),
                                other => other,
                            };
                        }
                        if self.profile.as_ref().is_some_and(|p| p.user.id == user_id) {
                            self.profile = None;
                            self.pending.profile = None;
                        }
                        self.notification = Some(Notification::info("User deleted."));
                    }
                    Err(e) => {
                        self.notification = Some(Notification::error(format!("Failed to delete user: {}", e)));
                    }
                }
                None
            }

            NetworkResponse::AvatarLoaded { id, user, result } => {
                if !take_pending(&mut self.pending.profile, id) {
                    return None;
                }
                // Show the table's current copy; drop the result if the user is gone
                match self.table.position_of(user.id).and_then(|row| self.table.user_at(row)).cloned() {
                    Some(current) => {
                        // Fields are shown either way; a failed image only loses the picture
                        let avatar = result.unwrap_or_else(|e| {
                            self.notification = Some(Notification::error(format!("Failed to load profile image: {}", e)));
                            None
                        });
                        self.profile = Some(Profile { user: current, avatar });
                    }
                    None => tracing::debug!(id, user_id = user.id, "Profile for removed user dropped"),
                }
                None
            }
        }
    }
}

/// Clear `slot` if it holds `id`. Returns false for stale completions.
fn take_pending(slot: &mut Option<u64>, id: u64) -> bool {
    if *slot == Some(id) {
        *slot = None;
        true
    } else {
        tracing::debug!(id, expected = ?slot, "Discarding stale completion");
        false
    }
}

/// Remove `id` from the in-flight deletes. Returns false if it was never issued
/// or belongs to a session that has since logged out.
fn take_pending_delete(pending: &mut Vec<u64>, id: u64) -> bool {
    match pending.iter().position(|&p| p == id) {
        Some(pos) => {
            pending.swap_remove(pos);
            true
        }
        None => {
            tracing::debug!(id, "Discarding stale delete completion");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::NotificationLevel;
    use crate::error::ClientError;
    use crate::models::{Avatar, LoginOutcome, SessionCredential, User};
    use crate::messages::ui_events::Screen;
    use std::sync::Arc;

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            firstname: username.to_uppercase(),
            lastname: "Cat".to_string(),
            bio: Some(format!("I am {}", username)),
            avatar: Some(format!("/images/avatars/{}.png", username)),
            date_of_birth: None,
            is_admin: None,
            article_count: None,
        }
    }

    fn avatar() -> Arc<Avatar> {
        Arc::new(Avatar {
            width: 1,
            height: 1,
            pixels: vec![[9, 9, 9]],
        })
    }

    fn command_id(cmd: &NetworkCommand) -> u64 {
        match cmd {
            NetworkCommand::Login { id, .. }
            | NetworkCommand::ListUsers { id, .. }
            | NetworkCommand::DeleteUser { id, .. }
            | NetworkCommand::FetchAvatar { id, .. } => *id,
            other => panic!("command has no id: {:?}", other),
        }
    }

    /// Log in as alice and load `users`
    fn logged_in(users: Vec<User>) -> AppState {
        let mut state = AppState::new();
        for c in "alice".chars() {
            state.enter_char(c);
        }
        state.next_field();
        for c in "pw1".chars() {
            state.enter_char(c);
        }

        let login = state.submit_login().unwrap();
        match &login {
            NetworkCommand::Login { username, password, .. } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "pw1");
            }
            other => panic!("expected login, got {:?}", other),
        }

        let list = state
            .handle_response(NetworkResponse::LoginCompleted {
                id: command_id(&login),
                result: Ok(LoginOutcome {
                    credential: SessionCredential::new("authToken=t"),
                    username: Some("alice".to_string()),
                }),
            })
            .unwrap();
        match &list {
            NetworkCommand::ListUsers { credential, .. } => {
                assert_eq!(credential.as_ref().map(|c| c.cookie_header()), Some("authToken=t"));
            }
            other => panic!("expected list, got {:?}", other),
        }

        state.handle_response(NetworkResponse::UsersLoaded {
            id: command_id(&list),
            result: Ok(users),
        });
        state
    }

    #[test]
    fn test_login_then_list_keeps_backend_order() {
        let state = logged_in(vec![user(3, "c"), user(1, "a"), user(2, "b")]);
        assert_eq!(state.screen(), Screen::Users);
        assert!(state.password_input.is_empty());
        let ids: Vec<i64> = state.table.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_login_is_disabled_while_in_flight() {
        let mut state = AppState::new();
        let first = state.submit_login().unwrap();
        assert!(state.submit_login().is_none());
        assert!(state.to_render_state().login_in_flight);

        state.handle_response(NetworkResponse::LoginCompleted {
            id: command_id(&first),
            result: Err(ClientError::AuthenticationFailed),
        });
        assert!(!state.session.is_authenticated());
        assert_eq!(state.screen(), Screen::Login);
        assert!(state.notification.as_ref().unwrap().message.contains("Invalid username or password"));
        assert!(state.submit_login().is_some());
    }

    #[test]
    fn test_scenario_select_then_delete() {
        let mut state = logged_in(vec![user(1, "alice"), user(2, "bob")]);

        assert!(state.delete_selected().is_none());
        state.select_next();
        let fetch = state.select_next().unwrap();
        assert_eq!(state.selected_row, Some(1));
        let (fetch_id, fetched_user) = match fetch {
            NetworkCommand::FetchAvatar { id, user, .. } => (id, user),
            other => panic!("expected avatar fetch, got {:?}", other),
        };
        assert_eq!(fetched_user.id, 2);

        state.handle_response(NetworkResponse::AvatarLoaded {
            id: fetch_id,
            user: fetched_user,
            result: Ok(Some(avatar())),
        });
        let profile = state.profile.as_ref().unwrap();
        assert_eq!(profile.user.username, "bob");
        assert_eq!(profile.user.full_name(), "BOB Cat");
        assert!(profile.avatar.is_some());

        let delete = state.delete_selected().unwrap();
        assert!(state.to_render_state().delete_in_flight);
        let delete_id = match delete {
            NetworkCommand::DeleteUser { id, user_id, .. } => {
                assert_eq!(user_id, 2);
                id
            }
            other => panic!("expected delete, got {:?}", other),
        };
        state.handle_response(NetworkResponse::UserDeleted {
            id: delete_id,
            user_id: 2,
            result: Ok(()),
        });
        assert_eq!(state.table.users(), &[user(1, "alice")]);
        assert!(state.profile.is_none());
        assert!(state.selected_row.is_none());
        assert!(!state.to_render_state().delete_in_flight);
    }

    #[test]
    fn test_failed_delete_leaves_table_alone() {
        let mut state = logged_in(vec![user(1, "a"), user(2, "b")]);
        state.select_next();
        let delete = state.delete_selected().unwrap();
        state.handle_response(NetworkResponse::UserDeleted {
            id: command_id(&delete),
            user_id: 1,
            result: Err(ClientError::RequestFailed(500)),
        });
        assert_eq!(state.table.row_count(), 2);
        assert!(state.notification.as_ref().unwrap().message.contains("HTTP 500"));
        assert!(state.delete_enabled());
    }

    #[test]
    fn test_stale_profile_is_discarded() {
        let mut state = logged_in(vec![user(1, "a"), user(2, "b")]);
        let first = state.select_next().unwrap();
        let second = state.select_next().unwrap();

        let user_of = |cmd: &NetworkCommand| match cmd {
            NetworkCommand::FetchAvatar { user, .. } => user.clone(),
            other => panic!("expected avatar fetch, got {:?}", other),
        };

        state.handle_response(NetworkResponse::AvatarLoaded {
            id: command_id(&second),
            user: user_of(&second),
            result: Ok(None),
        });
        // The older request completes last and must not win
        state.handle_response(NetworkResponse::AvatarLoaded {
            id: command_id(&first),
            user: user_of(&first),
            result: Ok(Some(avatar())),
        });

        let profile = state.profile.as_ref().unwrap();
        assert_eq!(profile.user.id, 2);
        assert!(profile.avatar.is_none());
    }

    #[test]
    fn test_user_without_avatar_shows_immediately() {
        let mut plain = user(7, "plain");
        plain.avatar = None;
        let mut state = logged_in(vec![plain]);
        assert!(state.select_next().is_none());
        assert_eq!(state.profile.as_ref().map(|p| p.user.id), Some(7));
        assert!(!state.to_render_state().profile_loading);
    }

    #[test]
    fn test_logout_clears_everything_and_ignores_late_results() {
        let mut state = logged_in(vec![user(1, "a"), user(2, "b")]);
        let fetch = state.select_next().unwrap();
        let refresh = state.refresh().unwrap();

        match state.logout() {
            Some(NetworkCommand::Logout { credential }) => assert!(credential.is_some()),
            other => panic!("expected logout, got {:?}", other),
        }
        assert!(!state.session.is_authenticated());
        assert!(state.table.is_empty());
        assert!(state.profile.is_none());
        assert!(state.username_input.is_empty());

        state.handle_response(NetworkResponse::UsersLoaded {
            id: command_id(&refresh),
            result: Ok(vec![user(9, "late")]),
        });
        state.handle_response(NetworkResponse::AvatarLoaded {
            id: command_id(&fetch),
            user: user(1, "a"),
            result: Ok(None),
        });
        assert!(state.table.is_empty());
        assert!(state.profile.is_none());

        // Logging out twice is harmless
        assert!(state.logout().is_none());
    }

    #[test]
    fn test_refresh_failure_reports_unauthenticated() {
        let mut state = logged_in(vec![user(1, "a")]);
        let refresh = state.refresh().unwrap();
        state.handle_response(NetworkResponse::UsersLoaded {
            id: command_id(&refresh),
            result: Err(ClientError::Unauthenticated),
        });
        assert_eq!(state.table.row_count(), 1);
        assert!(state.notification.as_ref().unwrap().message.contains("Not authenticated"));
    }

    #[test]
    fn test_delete_shifts_selection_below_removed_row() {
        let mut state = logged_in(vec![user(1, "a"), user(2, "b")]);
        state.select_next();
        let delete = state.delete_selected().unwrap();
        let fetch = state.select_next().unwrap();
        state.handle_response(NetworkResponse::UserDeleted {
            id: command_id(&delete),
            user_id: 1,
            result: Ok(()),
        });
        assert_eq!(state.selected_row, Some(0));

        state.handle_response(NetworkResponse::AvatarLoaded {
            id: command_id(&fetch),
            user: user(2, "b"),
            result: Ok(None),
        });
        assert_eq!(state.profile.as_ref().map(|p| p.user.id), Some(2));
    }

    #[test]
    fn test_profile_for_deleted_user_is_dropped() {
        let mut state = logged_in(vec![user(1, "a"), user(2, "b")]);
        let fetch = state.select_next().unwrap();
        let delete = state.delete_selected().unwrap();
        state.handle_response(NetworkResponse::UserDeleted {
            id: command_id(&delete),
            user_id: 1,
            result: Ok(()),
        });
        state.handle_response(NetworkResponse::AvatarLoaded {
            id: command_id(&fetch),
            user: user(1, "a"),
            result: Ok(Some(avatar())),
        });
        assert!(state.profile.is_none());
        assert!(state.selected_row.is_none());
    }

    #[test]
    fn test_second_delete_while_first_in_flight() {
        let mut state = logged_in(vec![user(1, "a"), user(2, "b"), user(3, "c")]);
        state.select_next();
        let first = state.delete_selected().unwrap();
        assert!(state.delete_enabled());
        state.select_next();
        let second = state.delete_selected().unwrap();
        assert_ne!(command_id(&first), command_id(&second));

        // Completions arrive out of order; both rows go
        state.handle_response(NetworkResponse::UserDeleted {
            id: command_id(&second),
            user_id: 2,
            result: Ok(()),
        });
        assert!(state.to_render_state().delete_in_flight);
        state.handle_response(NetworkResponse::UserDeleted {
            id: command_id(&first),
            user_id: 1,
            result: Ok(()),
        });
        let ids: Vec<i64> = state.table.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3]);
        assert!(!state.to_render_state().delete_in_flight);

        // A repeated completion is not applied twice
        state.handle_response(NetworkResponse::UserDeleted {
            id: command_id(&first),
            user_id: 3,
            result: Ok(()),
        });
        assert_eq!(state.table.row_count(), 1);
    }

    #[test]
    fn test_failed_avatar_still_shows_profile_and_notifies() {
        let mut state = logged_in(vec![user(1, "a")]);
        let fetch = state.select_next().unwrap();
        state.handle_response(NetworkResponse::AvatarLoaded {
            id: command_id(&fetch),
            user: user(1, "a"),
            result: Err(ClientError::Decode("not an image".to_string())),
        });

        let profile = state.profile.as_ref().unwrap();
        assert_eq!(profile.user.id, 1);
        assert!(profile.avatar.is_none());
        let note = state.notification.as_ref().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert!(note.message.starts_with("Failed to load profile image:"));
        assert!(note.message.contains("not an image"));
    }
}
