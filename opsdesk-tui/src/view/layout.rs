//! Main frame layout

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::model::App;

use super::components;
use super::editor;
use super::invoices;
use super::theme::colors;

/// Render one frame: title bar, content panes, status bar, then the
/// overlays from back to front.
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(1),    // content
            Constraint::Length(1), // status bar
        ])
        .split(size);

    let title_area = main_layout[0];
    let content_area = main_layout[1];
    let status_area = main_layout[2];

    render_title_bar(frame, title_area);
    render_content(app, frame, content_area);
    components::statusbar::render(app, frame, status_area);

    // Overlays stack above the panes; the confirmation dialog wins.
    components::modal::render_payment(app, frame);
    components::menu::render(app, frame, content_area);
    components::modal::render_confirm(app, frame);
    components::modal::render_help(app, frame);
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let c = colors();
    let title = Paragraph::new(" OpsDesk v0.1.0")
        .style(Style::default().bg(c.highlight).fg(c.selected_fg));
    frame.render_widget(title, area);
}

/// Pick the pane arrangement for the current layout.
///
/// Wide terminals show the list and the edit view side by side. Narrow
/// ones show a single pane: the edit view while a record is open, the
/// list otherwise. An explicitly full-screen edit view covers the whole
/// content area in either mode.
fn render_content(app: &App, frame: &mut Frame, area: Rect) {
    let two_column = app.layout.is_two_column();

    if app.editor.is_full_screen(two_column) {
        editor::render(app, frame, area);
        return;
    }

    if !two_column {
        if app.editor.selected().is_some() {
            editor::render(app, frame, area);
        } else {
            invoices::render(app, frame, area);
        }
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    invoices::render(app, frame, columns[0]);
    editor::render(app, frame, columns[1]);
}
