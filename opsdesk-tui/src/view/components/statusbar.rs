//! Bottom status bar

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::{App, FocusPanel};
use crate::view::theme::Styles;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let hints = get_hints(app);

    let mut spans = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Styles::hint_key()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, Styles::hint_desc()));
    }

    // Transient status message on the right.
    if let Some(ref msg) = app.status_message {
        spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)));
    }

    let content = Line::from(spans);
    let paragraph = Paragraph::new(content).style(Styles::statusbar());

    frame.render_widget(paragraph, area);
}

/// Shortcut hints for whatever currently receives keys, mirroring the
/// routing order of the event handler.
fn get_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = Vec::new();

    if app.show_help {
        hints.push(("Esc", "Close"));
        return hints;
    }

    if app.confirm.is_some() {
        hints.push(("Tab", "Switch"));
        hints.push(("Enter", "Choose"));
        hints.push(("Esc", "Cancel"));
        return hints;
    }

    if app.menu.is_open() {
        hints.push(("↑↓", "Navigate"));
        hints.push(("Enter", "Run"));
        hints.push(("Esc", "Close"));
        return hints;
    }

    if app.editor.nested().is_some() {
        hints.push(("Tab", "Next field"));
        hints.push(("Enter", "Save"));
        hints.push(("Esc", "Cancel"));
        return hints;
    }

    match app.focus {
        FocusPanel::List => {
            hints.push(("↑↓", "Select"));
            hints.push(("Enter", "Open"));
            hints.push(("Alt+n", "New"));
            hints.push(("Alt+r", "Reload"));
            hints.push(("?", "Help"));
        }
        FocusPanel::Editor => {
            hints.push(("Tab", "Next field"));
            hints.push(("Alt+s", "Save"));
            hints.push(("Alt+a", "Actions"));
            hints.push(("Alt+e", "Expand"));
            hints.push(("Alt+f", "Full screen"));
            hints.push(("Esc", "Close"));
        }
    }

    hints.push(("Alt+q", "Quit"));

    hints
}
