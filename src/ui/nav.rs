use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::{App, Focus};
use crate::nav::NavItem;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app.nav_items().iter().map(nav_to_list_item).collect();

    let focused = app.focus == Focus::Nav;
    let border_color = if focused { Color::Blue } else { Color::DarkGray };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Drivefolio "),
        )
        .highlight_style(if focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        });

    let mut state = ListState::default();
    state.select(Some(app.nav_selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn nav_to_list_item(item: &NavItem) -> ListItem<'static> {
    let (marker, style) = match item.depth {
        0 if item.expanded => ("▾ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        0 => ("  ", Style::default().fg(Color::White)),
        _ => ("    ", Style::default().fg(Color::Gray)),
    };

    ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::styled(item.label.clone(), style),
    ]))
}
