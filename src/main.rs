//! Cheery Admin - actor-based terminal admin console
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async backend calls

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use cheery_admin::constants::{APP_NAME, AVATAR_HEIGHT, AVATAR_WIDTH, LOG_FILE};
use cheery_admin::messages::ui_events::{key_to_ui_event, LoginField, Screen};
use cheery_admin::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use cheery_admin::table::COLUMNS;
use cheery_admin::ui::{avatar_lines, notification_color, render_input};
use cheery_admin::{ApiClient, AppActor, Config, NetworkActor};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Fail before touching the terminal so errors stay readable
    let config = Config::load()?;
    let client = ApiClient::new(&config)?;
    tracing::info!(base_url = %config.base_url, timeout = ?config.timeout, "Starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.screen, current_state.popup_open()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);

    match state.screen {
        Screen::Login => draw_login(f, state, chunks[1]),
        Screen::Users => draw_users(f, state, chunks[1]),
    }

    draw_status_bar(f, state, chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }

    if state.notification.is_some() {
        draw_notification_popup(f, state, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", APP_NAME),
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
    )];
    if let Some(name) = &state.signed_in_as {
        spans.push(Span::styled(
            format!(" signed in as {} ", name),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let form_area = centered_rect(50, 50, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Log in ");
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(1), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

    let username = render_input(
        state.username_input.clone(),
        " Username ",
        state.login_field == LoginField::Username,
    );
    f.render_widget(username, rows[0]);

    let password = render_input(
        "*".repeat(state.password_len),
        " Password ",
        state.login_field == LoginField::Password,
    );
    f.render_widget(password, rows[1]);

    let hint = if state.login_in_flight {
        Span::styled(" Logging in... ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" Enter:log in | Tab:switch field | Esc:quit ", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(hint), rows[2]);

    // Cursor at the end of the focused field
    let (row, len) = match state.login_field {
        LoginField::Username => (rows[0], state.username_input.chars().count()),
        LoginField::Password => (rows[1], state.password_len),
    };
    if !state.login_in_flight && !state.popup_open() {
        let max_x = row.x + row.width.saturating_sub(2);
        let cursor_x = (row.x + len as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, row.y + 1));
    }
}

fn draw_users(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),                            // Table
            Constraint::Length(AVATAR_WIDTH as u16 + 4),    // Profile
        ])
        .split(area);

    draw_user_table(f, state, chunks[0]);
    draw_profile(f, state, chunks[1]);
}

fn draw_user_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Yellow).bold());

    let table = &state.table;
    let rows: Vec<Row> = (0..table.row_count())
        .map(|r| {
            Row::new((0..table.column_count()).map(|c| Cell::from(table.cell(r, c).unwrap_or("").to_string())))
        })
        .collect();

    let title = if state.loading_users {
        " Users [...] ".to_string()
    } else {
        format!(" Users ({}) ", table.row_count())
    };

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)).title(title))
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(state.selected_row);
    f.render_stateful_widget(widget, area, &mut table_state);
}

fn draw_profile(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = if state.profile_loading { " Profile [...] " } else { " Profile " };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((AVATAR_HEIGHT as u16).div_ceil(2)), // Avatar
            Constraint::Min(0),                                      // Fields
        ])
        .split(inner);

    let Some(profile) = &state.profile else {
        let placeholder = Paragraph::new("Select a user to see their profile.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false });
        f.render_widget(placeholder, chunks[1]);
        return;
    };

    match &profile.avatar {
        Some(avatar) => {
            let image = Paragraph::new(avatar_lines(avatar)).alignment(Alignment::Center);
            f.render_widget(image, chunks[0]);
        }
        None => {
            let missing = Paragraph::new("[ no avatar ]")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(missing, chunks[0]);
        }
    }

    let user = &profile.user;
    let label = |name: &'static str| Span::styled(name, Style::default().fg(Color::Cyan).bold());
    let mut lines = vec![
        Line::from(vec![label("Username: "), Span::raw(user.username.clone())]),
        Line::from(vec![label("Full Name: "), Span::raw(user.full_name())]),
        Line::from(vec![label("Bio: "), Span::raw(user.bio().to_string())]),
    ];
    if let Some(dob) = &user.date_of_birth {
        lines.push(Line::from(vec![label("Born: "), Span::raw(dob.clone())]));
    }
    if let Some(count) = user.article_count {
        lines.push(Line::from(vec![label("Articles: "), Span::raw(count.to_string())]));
    }
    if user.is_admin == Some(true) {
        lines.push(Line::from(Span::styled("Administrator", Style::default().fg(Color::Magenta))));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let spans = match state.screen {
        Screen::Login => vec![Span::styled(" Not signed in ", dim)],
        Screen::Users => {
            let delete_style = if state.delete_enabled {
                Style::default().fg(Color::Red)
            } else {
                dim.add_modifier(Modifier::CROSSED_OUT)
            };
            let delete_label = if state.delete_in_flight { "deleting..." } else { "d:delete" };
            vec![
                Span::styled(" ↑/↓:select | ", dim),
                Span::styled(delete_label, delete_style),
                Span::styled(" | r:refresh | l:logout | ?:help | q:quit ", dim),
            ]
        }
    };

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 50, area);

    let help_text = r#"
 CHEERY ADMIN - Keyboard Shortcuts

 LOGIN
   Tab                Switch username / password
   Enter              Log in
   Esc                Quit

 USERS
   ↑ / ↓  (k / j)     Select user and load profile
   d                  Delete selected user
   r                  Reload user list
   l                  Log out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_notification_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(note) = &state.notification else {
        return;
    };
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(notification_color(note.level)))
        .title(format!(" {} ", note.at.format("%H:%M:%S")))
        .title_bottom(Line::from(" any key to close ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let message = Paragraph::new(note.message.as_str())
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(message, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
