//! Condition icon widget drawn with half-block characters

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::app::IconState;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// Shown while the icon is downloading
const PENDING_MARK: char = '…';

/// Shown when the icon could not be loaded
const MISSING_MARK: char = '·';

/// Renders a row's icon state into a small cell grid
pub struct IconThumbnail<'a> {
    state: &'a IconState,
    placeholder_style: Style,
}

impl<'a> IconThumbnail<'a> {
    pub fn new(state: &'a IconState) -> Self {
        Self {
            state,
            placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }

    fn draw_placeholder(&self, mark: char, area: Rect, buf: &mut Buffer) {
        let x = area.x + area.width / 2;
        let y = area.y + area.height / 2;
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_char(mark).set_style(self.placeholder_style);
        }
    }
}

fn to_color(pixel: Option<[u8; 3]>) -> Color {
    match pixel {
        Some([r, g, b]) => Color::Rgb(r, g, b),
        None => Color::Reset,
    }
}

impl<'a> Widget for IconThumbnail<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let icon = match self.state {
            IconState::Ready(icon) => icon,
            IconState::Pending => return self.draw_placeholder(PENDING_MARK, area, buf),
            IconState::Unavailable => return self.draw_placeholder(MISSING_MARK, area, buf),
        };

        for (dy, row) in icon.thumbnail(area.width, area.height).iter().enumerate() {
            for (dx, pixel) in row.iter().enumerate() {
                let x = area.x + dx as u16;
                let y = area.y + dy as u16;
                if pixel.top.is_none() && pixel.bottom.is_none() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(HALF_BLOCK)
                        .set_fg(to_color(pixel.top))
                        .set_bg(to_color(pixel.bottom));
                }
            }
        }
    }
}
