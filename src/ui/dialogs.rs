use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_help(frame: &mut Frame, area: Rect) {
    // Center the help dialog
    let dialog_width = 56.min(area.width.saturating_sub(4));
    let dialog_height = 30.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let heading = Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan);
    let help_text = vec![
        Line::from(Span::styled("Navigation", heading)),
        Line::from(""),
        Line::from("  j / ↓      Move down"),
        Line::from("  k / ↑      Move up"),
        Line::from("  ↵ / l      Open entry, expand or collapse category"),
        Line::from("  Tab        Switch between sidebar and gallery"),
        Line::from("  p          Portfolio"),
        Line::from("  i          Info"),
        Line::from(""),
        Line::from(Span::styled("Gallery", heading)),
        Line::from(""),
        Line::from("  h j k l    Move selection (pages scroll in books)"),
        Line::from("  g / G      First / last"),
        Line::from("  ↵          Open image in lightbox"),
        Line::from("  Esc        Back to sidebar"),
        Line::from(""),
        Line::from(Span::styled("Lightbox", heading)),
        Line::from(""),
        Line::from("  h / ←      Previous image"),
        Line::from("  l / →      Next image"),
        Line::from("  Esc / q    Close"),
        Line::from(""),
        Line::from(Span::styled("Export", heading)),
        Line::from(""),
        Line::from("  e / E / C  Export folder as HTML / JSON / CSV"),
        Line::from("  ?          Show this help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(Span::styled("Press Esc to close", Style::default().fg(Color::DarkGray))),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, dialog_area);
}
