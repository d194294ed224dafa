use ratatui::{prelude::*, widgets::*};

use crate::app::state::NotificationLevel;
use crate::models::Avatar;

/// Renders a text input field
pub fn render_input<'a>(content: String, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Render an avatar with upper-half blocks: each terminal cell shows two
/// vertically stacked pixels, the top one as foreground, the bottom as background.
pub fn avatar_lines(avatar: &Avatar) -> Vec<Line<'static>> {
    let rgb = |p: [u8; 3]| Color::Rgb(p[0], p[1], p[2]);

    (0..avatar.height)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span> = (0..avatar.width)
                .map(|x| {
                    let top = avatar.pixel(x, y).map(rgb).unwrap_or(Color::Reset);
                    let bottom = avatar.pixel(x, y + 1).map(rgb).unwrap_or(Color::Reset);
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Notification border color
pub fn notification_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => Color::Green,
        NotificationLevel::Error => Color::Red,
    }
}
