//! Key binding overlay
//!
//! Drawn over the forecast screen while `App::show_help` is set.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Width of the key column, including its indent
const KEY_COLUMN: usize = 14;

const OVERLAY_WIDTH: u16 = 50;

/// Key bindings grouped by the part of the screen that has focus
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "City input",
        &[
            ("Enter", "Fetch forecast"),
            ("Backspace", "Delete character"),
            ("Esc/Tab", "Leave the input"),
        ],
    ),
    (
        "Forecast list",
        &[
            ("↑/k, ↓/j", "Move selection up/down"),
            ("PgUp/PgDn", "Move by a page"),
            ("g/G", "First/last day"),
            ("/ or i", "Edit city"),
            ("r", "Refresh forecast"),
            ("q/Esc", "Quit application"),
        ],
    ),
    (
        "Anywhere",
        &[("F1 or ?", "Toggle this help"), ("Ctrl-C", "Quit")],
    ),
];

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);

    let mut lines = Vec::new();
    for (title, bindings) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(*title, heading)));
        lines.extend(bindings.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<width$}", key, width = KEY_COLUMN - 2), key_style),
                Span::raw(*action),
            ])
        }));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc or F1 closes",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

/// Rect of at most `width` x `height` centred in `area`, clipped to fit
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Renders the overlay on top of whatever is already drawn
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    // Two rows of border around the content
    let height = lines.len() as u16 + 2;
    let area = centered(OVERLAY_WIDTH, height, frame.area());

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
