mod content;
mod dialogs;
pub mod images;
mod lightbox;
mod nav;
mod status_bar;

use ratatui::prelude::*;

use crate::app::{App, AppMode};

/// Width of the navigation sidebar in columns.
const NAV_WIDTH: u16 = 24;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: content area + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    // Sidebar + gallery
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(0)])
        .split(main_chunks[0]);

    nav::render(frame, app, columns[0]);
    content::render(frame, app, columns[1]);
    status_bar::render(frame, app, main_chunks[1]);

    match app.mode {
        AppMode::Lightbox => lightbox::render(frame, app, area),
        AppMode::Help => dialogs::render_help(frame, area),
        AppMode::Browse => {}
    }
}

/// A `width` x `height` rect centred in `area`, clipped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Truncate to at most `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
