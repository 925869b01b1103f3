//! Speed-dial action menu overlay

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::App;
use crate::view::theme::Styles;

const MENU_WIDTH: u16 = 32;

/// Shortcut reminders, in the same order as the menu items.
const SHORTCUTS: [&str; 3] = ["Alt+d", "Alt+u", "Alt+p"];

/// Render the action menu anchored to the bottom-right of the content
/// area, mirroring a floating speed dial.
pub fn render(app: &App, frame: &mut Frame, content_area: Rect) {
    if !app.menu.is_open() {
        return;
    }

    let items = app.menu.items();
    let height = items.len() as u16 + 2;
    let width = MENU_WIDTH.min(content_area.width);
    let x = content_area
        .right()
        .saturating_sub(width)
        .saturating_sub(2)
        .max(content_area.x);
    let y = content_area
        .bottom()
        .saturating_sub(height)
        .saturating_sub(1)
        .max(content_area.y);
    let area = Rect::new(x, y, width, height.min(content_area.height));

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label_width = usize::from(inner.width).saturating_sub(12);
    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_cursor = i == app.menu_cursor;
            let style = if item.disabled {
                Style::default().fg(Color::DarkGray)
            } else if is_cursor {
                Styles::selected()
            } else {
                Style::default().fg(Color::White)
            };
            let shortcut = SHORTCUTS.get(i).copied().unwrap_or("");
            let shortcut_style = if is_cursor && !item.disabled {
                style
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} {:<label_width$}", item.icon, item.tooltip),
                    style,
                ),
                Span::styled(format!("{shortcut:>5} "), shortcut_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
