//! Forecast screen rendering
//!
//! Renders the city input line, the scrollable list of forecast days with
//! their condition icons, and a footer carrying either the current status
//! message or key hints.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, IconState};
use crate::data::ForecastDay;
use crate::ui::widgets::IconThumbnail;

/// Terminal rows used by one forecast day
const ROW_HEIGHT: u16 = 3;

/// Terminal columns used by a row's icon
const ICON_WIDTH: u16 = 6;

/// Renders the forecast screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing the forecast and input
pub fn render_forecast(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // City input
            Constraint::Min(3),    // Forecast list
            Constraint::Length(1), // Status / help
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "SKYCAST",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(city) = app.forecast.city() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{}-day forecast for {}", app.forecast.len(), city),
            Style::default().fg(Color::White),
        ));
    }

    if app.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.input_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" City ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let text = if app.input.is_empty() && !app.input_focused {
        Line::from(Span::styled(
            "Press / to enter a city",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(app.input.as_str()))
    };

    frame.render_widget(Paragraph::new(text).block(block), area);

    if app.input_focused {
        let width = app.input.chars().count() as u16;
        let x = (area.x + 1 + width).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

/// Index of the first visible row so that `selected` stays on screen
fn first_visible_row(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    selected.saturating_sub(visible - 1)
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.forecast.is_empty() {
        let hint = if app.loading {
            "Fetching forecast..."
        } else {
            "Type a city name and press Enter"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }

    let visible = (inner.height / ROW_HEIGHT) as usize;
    let first = first_visible_row(app.selected_index, visible);
    let pending = IconState::Pending;

    for (slot, index) in (first..app.forecast.len()).take(visible).enumerate() {
        let Some(day) = app.forecast.get(index) else {
            break;
        };
        let row_area = Rect {
            x: inner.x,
            y: inner.y + slot as u16 * ROW_HEIGHT,
            width: inner.width,
            height: ROW_HEIGHT,
        };
        let icon_state = app
            .rows
            .get(index)
            .map(|row| &row.icon)
            .unwrap_or(&pending);
        render_row(frame, day, icon_state, index == app.selected_index, row_area);
    }
}

fn render_row(
    frame: &mut Frame,
    day: &ForecastDay,
    icon: &IconState,
    is_selected: bool,
    area: Rect,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),          // Cursor
            Constraint::Length(ICON_WIDTH), // Icon
            Constraint::Length(1),          // Gap
            Constraint::Min(10),            // Text
        ])
        .split(area);

    let cursor = if is_selected { "\u{25B8}" } else { " " }; // ▸
    frame.render_widget(
        Paragraph::new(Span::styled(cursor, Style::default().fg(Color::Cyan))),
        columns[0],
    );

    frame.render_widget(IconThumbnail::new(icon), columns[1]);

    let heading_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(day.weekday().to_string(), heading_style),
            Span::styled(": ", heading_style),
            Span::raw(day.description().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Low: ", Style::default().fg(Color::DarkGray)),
            Span::styled(day.min_temp().to_string(), Style::default().fg(Color::Blue)),
            Span::raw("   "),
            Span::styled("High: ", Style::default().fg(Color::DarkGray)),
            Span::styled(day.max_temp().to_string(), Style::default().fg(Color::LightRed)),
        ]),
        Line::from(vec![
            Span::styled("Humidity: ", Style::default().fg(Color::DarkGray)),
            Span::raw(day.humidity().to_string()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), columns[3]);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.toast {
        Some(toast) => Line::from(Span::styled(
            toast.message.as_str(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None if app.input_focused => Line::from(Span::styled(
            "Enter: fetch  Esc: list  F1: help  Ctrl-C: quit",
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::from(Span::styled(
            "↑↓: scroll  /: city  r: refresh  ?: help  q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Icon, IconCache};
    use crate::data::ForecastClient;
    use crate::pipeline::{ForecastPipeline, PipelineMessage};
    use image::{Rgba, RgbaImage};
    use ratatui::{backend::TestBackend, Terminal};

    const ICON_URL: &str = "https://cdn.weatherapi.com/weather/64x64/day/113.png";

    fn create_test_app() -> App {
        let icons = IconCache::new();
        icons.insert(
            ICON_URL,
            Icon::from_image(RgbaImage::from_pixel(8, 8, Rgba([250, 200, 0, 255]))),
        );
        App::new(ForecastPipeline::new(ForecastClient::new("test-key"), icons))
    }

    fn load_days(app: &mut App, dates: &[&str]) {
        let days = dates
            .iter()
            .map(|date| {
                ForecastDay::from_raw(date, 68.4, 84.6, 73.0, "Sunny", ICON_URL).unwrap()
            })
            .collect();
        app.apply_message(PipelineMessage::ForecastLoaded {
            generation: 0,
            city: "Boston".to_string(),
            days,
        });
    }

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render_forecast(frame, app);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_state_shows_hint() {
        let app = create_test_app();
        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("SKYCAST"));
        assert!(content.contains("City"));
        assert!(content.contains("Type a city name and press Enter"));
    }

    #[test]
    fn test_forecast_rows_are_rendered() {
        let mut app = create_test_app();
        load_days(&mut app, &["2024-07-04", "2024-07-05"]);
        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("Thursday, July 04 2024"));
        assert!(content.contains("Friday, July 05 2024"));
        assert!(content.contains("Low: 68°F"));
        assert!(content.contains("High: 85°F"));
        assert!(content.contains("Humidity: 73%"));
        assert!(content.contains("2-day forecast for Boston"));
        assert!(content.contains("▀"), "Cached icon should be drawn");
    }

    #[test]
    fn test_selected_row_has_cursor() {
        let mut app = create_test_app();
        load_days(&mut app, &["2024-07-04", "2024-07-05"]);
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("\u{25B8}"));
    }

    #[test]
    fn test_selected_row_scrolls_into_view() {
        let mut app = create_test_app();
        load_days(
            &mut app,
            &[
                "2024-07-01",
                "2024-07-02",
                "2024-07-03",
                "2024-07-04",
                "2024-07-05",
                "2024-07-06",
                "2024-07-07",
            ],
        );
        app.selected_index = 6;

        // 14 rows: 1 title + 3 input + 1 footer leaves 9, minus borders = 7 -> 2 rows visible
        let content = render_to_string(&app, 80, 14);
        assert!(content.contains("Sunday, July 07 2024"));
        assert!(!content.contains("Monday, July 01 2024"));
    }

    #[test]
    fn test_toast_is_shown_in_footer() {
        let mut app = create_test_app();
        app.show_toast("Unable to connect to weather service");
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Unable to connect to weather service"));
    }

    #[test]
    fn test_loading_indicator() {
        let mut app = create_test_app();
        app.loading = true;
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Loading..."));
        assert!(content.contains("Fetching forecast..."));
    }

    #[test]
    fn test_first_visible_row() {
        assert_eq!(first_visible_row(0, 3), 0);
        assert_eq!(first_visible_row(2, 3), 0);
        assert_eq!(first_visible_row(5, 3), 3);
        assert_eq!(first_visible_row(5, 0), 0);
    }
}
