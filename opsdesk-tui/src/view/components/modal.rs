//! Modal overlays: the confirmation dialog, the nested payment form
//! and the help screen

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::fields::field_text;
use crate::model::App;

/// Centered rectangle of the given size, clamped to `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Render the confirmation dialog, if one is open. Drawn last so it
/// sits above every other overlay.
pub fn render_confirm(app: &App, frame: &mut Frame) {
    let Some(ref confirm) = app.confirm else {
        return;
    };

    let area = centered_rect(48, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Confirm ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(block, area);

    let inner = Rect::new(area.x + 2, area.y + 1, area.width - 4, area.height - 2);

    let cancel_style = if confirm.confirm_focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Black).bg(Color::White)
    };
    let confirm_style = if confirm.confirm_focused {
        Style::default().fg(Color::Black).bg(Color::Red)
    } else {
        Style::default().fg(Color::Red)
    };

    let request = &confirm.request;
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("  {}", request.message),
            Style::default().fg(Color::White),
        ),
        Line::from(""),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!(" {} ", request.cancel_label), cancel_style),
            Span::raw("    "),
            Span::styled(format!(" {} ", request.confirm_label), confirm_style),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the nested payment form, if one is open.
pub fn render_payment(app: &App, frame: &mut Frame) {
    let Some(nested) = app.editor.nested() else {
        return;
    };

    let title = if nested.is_creating_new() {
        format!(" Record {} ", nested.spec().display_name)
    } else {
        format!(" Edit {} ", nested.spec().display_name)
    };

    // Label + value + spacer per field, then error and hint rows.
    let field_rows = app.payment_fields.len() as u16 * 3;
    let height = 2 + field_rows + 2;
    let area = centered_rect(46, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(block, area);

    let inner = Rect::new(area.x + 2, area.y + 1, area.width - 4, area.height - 2);

    let form = nested.form();
    let mut lines = Vec::new();

    for (i, field) in app.payment_fields.iter().enumerate() {
        let focused = app.nested_field_focus == i;

        let mut label = field.label.to_string();
        if field.required {
            label.push_str(" *");
        }
        let mut label_spans = vec![Span::styled(label, Style::default().fg(Color::Gray))];
        if let Some(err) = form.field_error(field.path) {
            label_spans.push(Span::styled(
                format!("  ⚠ {err}"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(label_spans));

        let text = field_text(form, field.path);
        let display = if focused {
            format!("  {text}▎")
        } else {
            format!("  {text}")
        };
        let value_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::styled(display, value_style));
        lines.push(Line::from(""));
    }

    if let Some(err) = form.form_error() {
        lines.push(Line::styled(
            format!("  ⚠ {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    lines.push(Line::from(vec![
        Span::styled("  Tab", Style::default().fg(Color::Yellow)),
        Span::styled(" Next | ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" Save | ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn help_line(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(keys, Style::default().fg(Color::Yellow)),
        Span::styled(action, Style::default().fg(Color::White)),
    ])
}

/// Render the keyboard shortcut overlay.
pub fn render_help(app: &App, frame: &mut Frame) {
    if !app.show_help {
        return;
    }

    let area = centered_rect(50, 19, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(block, area);

    let inner = Rect::new(area.x + 2, area.y + 1, area.width - 4, area.height - 2);

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::styled("Global shortcuts", heading),
        Line::from(""),
        help_line("  Tab        ", "Switch panel"),
        help_line("  Alt+n      ", "New invoice"),
        help_line("  Alt+r      ", "Reload invoices"),
        help_line("  Alt+q      ", "Quit"),
        Line::from(""),
        Line::styled("Edit view", heading),
        Line::from(""),
        help_line("  Alt+s      ", "Save"),
        help_line("  Alt+e      ", "Expand section"),
        help_line("  Alt+f      ", "Full screen"),
        help_line("  Alt+1..5   ", "Jump to section"),
        help_line("  Alt+a      ", "Action menu"),
        help_line("  Alt+d/u/p  ", "Delete / duplicate / payment"),
        Line::from(""),
        Line::styled(
            "Press Esc to close the help",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
