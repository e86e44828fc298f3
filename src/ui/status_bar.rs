use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, Content};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // If there's a status message, show it prominently
    if let Some(ref message) = app.status_message {
        let line = Line::from(vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let (title, position) = match app.content {
        Content::Empty => ("-".to_string(), String::new()),
        Content::Loading { ref title } => (title.clone(), "loading".to_string()),
        Content::Info(_) => ("Info".to_string(), String::new()),
        Content::Folder { ref title, ref view } => {
            let len = view.area.len();
            let position = if len == 0 {
                "0/0".to_string()
            } else if view.options.is_book {
                format!("page {}/{}", app.scroll_offset + 1, len)
            } else {
                format!("{}/{}", app.grid_selected + 1, len)
            };
            (title.clone(), position)
        }
    };

    // Build running task indicators
    let task_indicators: String = app
        .tasks
        .running_tasks()
        .iter()
        .map(|(task_type, _)| format!("[{}:...]", task_type.short_name()))
        .collect::<Vec<_>>()
        .join(" ");

    let mut spans = vec![Span::styled(
        format!(" {} ", title),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    )];

    if !position.is_empty() {
        spans.push(Span::styled(format!(" {} ", position), Style::default().fg(Color::Gray)));
    }

    if !task_indicators.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", task_indicators),
            Style::default().fg(Color::Cyan),
        ));
    }

    let content_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let help_text = " Tab:focus e:export ?:help q:quit ";
    let help_len = help_text.len();

    let available = area.width as usize;
    if available > content_len + help_len {
        spans.push(Span::raw(" ".repeat(available - content_len - help_len)));
    }

    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
