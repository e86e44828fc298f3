//! The main pane: a folder's cover, description and image grid or book pages.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage};

use super::images::ImageCache;
use super::{centered_rect, truncate};
use crate::app::{App, Content, Focus};
use crate::gallery::{FolderView, ImageArea, Thumbnail};

/// Grid cell size in terminal cells
const CELL_WIDTH: u16 = 28;
const CELL_HEIGHT: u16 = 14;

/// Height of one book page
const PAGE_HEIGHT: u16 = 24;

/// Height of the cover block in book folders
const COVER_HEIGHT: u16 = 16;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let border_color = if app.focus == Focus::Content {
        Color::Blue
    } else {
        Color::DarkGray
    };

    match app.content {
        Content::Empty => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_centered_hint(frame, "Pick a category or press p for the portfolio", inner);
        }
        Content::Loading { ref title } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(format!(" {} ", title));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_centered_hint(frame, "Loading...", inner);
        }
        Content::Info(ref text) => {
            let paragraph = Paragraph::new(text.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color))
                        .title(" Info "),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
        Content::Folder { ref title, ref view } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(format!(" {} | {} images ", title, view.area.len()));
            let inner = block.inner(area);
            frame.render_widget(block, area);

            if view.is_empty() {
                render_centered_hint(frame, "Nothing here yet", inner);
                return;
            }

            let state = GridState {
                selected: app.grid_selected,
                scroll_offset: &mut app.scroll_offset,
                columns: &mut app.grid_columns,
            };
            render_folder(frame, view, &mut app.images, state, inner);
        }
    }
}

/// Selection state the grid reads and the renderer keeps in range.
struct GridState<'a> {
    selected: usize,
    scroll_offset: &'a mut usize,
    columns: &'a mut usize,
}

fn render_folder(frame: &mut Frame, view: &FolderView, images: &mut ImageCache, state: GridState, area: Rect) {
    let mut constraints = Vec::new();
    if view.cover.is_some() {
        constraints.push(Constraint::Length(COVER_HEIGHT));
    } else if let Some(ref description) = view.description {
        let lines = description.lines().count() as u16;
        constraints.push(Constraint::Length((lines + 2).min(10)));
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let body = chunks[chunks.len() - 1];
    if chunks.len() > 1 {
        render_heading(frame, view, images, chunks[0]);
    }

    match view.area {
        ImageArea::Tiles(ref tiles) => {
            let thumbs: Vec<&Thumbnail> = tiles.iter().map(|t| &t.thumbnail).collect();
            render_grid(frame, &thumbs, images, state, body);
        }
        ImageArea::Pages(ref pages) => render_pages(frame, pages, images, *state.scroll_offset, body),
    }
}

/// Cover on the left, description beside it; or the description alone.
fn render_heading(frame: &mut Frame, view: &FolderView, images: &mut ImageCache, area: Rect) {
    let description_area = match view.cover {
        Some(ref cover) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            render_thumbnail(frame, images, cover, cols[0], " Cover ", Color::Yellow);
            cols[1]
        }
        None => area,
    };

    if let Some(ref description) = view.description {
        let paragraph = Paragraph::new(description.as_str())
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, description_area.inner(Margin::new(1, 1)));
    }
}

fn render_grid(frame: &mut Frame, thumbs: &[&Thumbnail], images: &mut ImageCache, state: GridState, area: Rect) {
    let columns = (area.width / CELL_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CELL_HEIGHT).max(1) as usize;
    *state.columns = columns;
    ensure_visible(state.selected, columns, visible_rows, state.scroll_offset);

    let col_constraints: Vec<Constraint> = (0..columns).map(|_| Constraint::Length(CELL_WIDTH)).collect();
    let row_constraints: Vec<Constraint> = (0..visible_rows).map(|_| Constraint::Length(CELL_HEIGHT)).collect();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let actual_row = *state.scroll_offset + row_idx;

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let index = actual_row * columns + col_idx;
            let Some(thumb) = thumbs.get(index) else {
                continue;
            };

            let border_color = if index == state.selected {
                Color::Cyan
            } else {
                Color::DarkGray
            };
            let title = truncate(&thumb.entry.name, (cell_area.width as usize).saturating_sub(4));
            render_thumbnail(frame, images, thumb, *cell_area, &title, border_color);
        }
    }
}

/// Scroll so the selected tile's row is on screen.
fn ensure_visible(selected: usize, columns: usize, visible_rows: usize, scroll_offset: &mut usize) {
    let selected_row = selected / columns;

    if selected_row < *scroll_offset {
        *scroll_offset = selected_row;
    }

    if selected_row >= *scroll_offset + visible_rows {
        *scroll_offset = selected_row - visible_rows + 1;
    }
}

fn render_pages(frame: &mut Frame, pages: &[Thumbnail], images: &mut ImageCache, first: usize, area: Rect) {
    let mut y = area.y;
    for (offset, page) in pages.iter().enumerate().skip(first) {
        if y >= area.bottom() {
            break;
        }
        let height = PAGE_HEIGHT.min(area.bottom() - y);
        let page_area = Rect::new(area.x, y, area.width, height);
        let title = format!(" {}/{} ", offset + 1, pages.len());
        render_thumbnail(frame, images, page, page_area, &title, Color::DarkGray);
        y += height;
    }
}

fn render_thumbnail(
    frame: &mut Frame,
    images: &mut ImageCache,
    thumb: &Thumbnail,
    area: Rect,
    title: &str,
    border_color: Color,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 2 || inner.height < 2 {
        return;
    }

    if let Some(protocol) = images.get_mut(&thumb.url) {
        let image = StatefulImage::new(None).resize(Resize::Fit(None));
        frame.render_stateful_widget(image, inner, protocol);
    } else {
        // Failed preload or no terminal graphics: name only
        render_centered_hint(frame, &truncate(&thumb.entry.name, inner.width as usize), inner);
    }
}

fn render_centered_hint(frame: &mut Frame, text: &str, area: Rect) {
    let hint = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    frame.render_widget(hint, centered_rect(area, area.width, 1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_visible_scrolls_both_ways() {
        let mut offset = 0;
        ensure_visible(9, 3, 2, &mut offset);
        assert_eq!(offset, 2);

        ensure_visible(1, 3, 2, &mut offset);
        assert_eq!(offset, 0);

        ensure_visible(4, 3, 2, &mut offset);
        assert_eq!(offset, 0);
    }
}
