//! Full-screen lightbox overlay.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use ratatui_image::{Resize, StatefulImage};

use super::centered_rect;
use crate::app::App;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    frame.render_widget(Clear, area);

    // Image + status lines
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(block, chunks[0]);

    if let Some(url) = app.lightbox_url() {
        if let Some(protocol) = app.images.get_mut(&url) {
            let image = StatefulImage::new(None).resize(Resize::Fit(None));
            frame.render_stateful_widget(image, chunks[0], protocol);
        } else {
            let message = if app.images.is_loading(&url) {
                "Loading..."
            } else if app.images.is_failed(&url) {
                "Image unavailable"
            } else if !app.images.is_available() {
                "Image preview not supported by this terminal"
            } else {
                ""
            };
            let hint = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(hint, centered_rect(chunks[0], chunks[0].width, 1));
        }
    }

    render_status(frame, app, chunks[1]);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let position = app.lightbox.position_label().unwrap_or_default();
    let name = app
        .lightbox
        .current()
        .map(|e| e.name.clone())
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let status = Paragraph::new(format!(" {} | {} ", position, name)).style(Style::default().fg(Color::Cyan));
    frame.render_widget(status, chunks[0]);

    let help = Paragraph::new("h/Left:prev | l/Right:next | Esc/q:close").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[1]);
}
