//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which screen is showing
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    Users,
}

/// Focused field on the login form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginField {
    pub fn next(&self) -> LoginField {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Login form
    CharInput(char),
    Backspace,
    NextField,
    SubmitLogin,

    // User table
    SelectNext,
    SelectPrev,
    DeleteSelected,
    Refresh,
    Logout,

    // Popups
    ToggleHelp,
    DismissPopup,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, screen: Screen, popup_open: bool) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Any key closes a popup
    if popup_open {
        return Some(UiEvent::DismissPopup);
    }

    match screen {
        Screen::Login => handle_login_keys(key),
        Screen::Users => handle_users_keys(key),
    }
}

/// Login form: printable keys are text, so quitting is on Esc
fn handle_login_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::Quit),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::Enter => Some(UiEvent::SubmitLogin),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_users_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('l') => Some(UiEvent::Logout),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_are_text_on_login_screen() {
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), Screen::Login, false), Some(UiEvent::CharInput('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), Screen::Login, false), Some(UiEvent::Quit));
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), Screen::Login, false), Some(UiEvent::SubmitLogin));
    }

    #[test]
    fn test_user_screen_bindings() {
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), Screen::Users, false), Some(UiEvent::Quit));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('d')), Screen::Users, false), Some(UiEvent::DeleteSelected));
        assert_eq!(key_to_ui_event(press(KeyCode::Down), Screen::Users, false), Some(UiEvent::SelectNext));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('x')), Screen::Users, false), None);
    }

    #[test]
    fn test_popup_swallows_keys_but_not_ctrl_c() {
        assert_eq!(key_to_ui_event(press(KeyCode::Char('d')), Screen::Users, true), Some(UiEvent::DismissPopup));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(ctrl_c, Screen::Users, true), Some(UiEvent::Quit));
    }
}
