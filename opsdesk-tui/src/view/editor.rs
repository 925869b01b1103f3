//! Edit view pane: sticky header, scrolled form rows and the section rail

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use serde_json::Value;

use opsdesk_core::PendingOperation;

use crate::model::fields::{field_text, invoice_total};
use crate::model::geometry::{FormRow, EDITOR_HEADER_ROWS};
use crate::model::App;
use crate::util::text::truncate_to_width;
use crate::view::theme::{colors, Styles};

/// Width of the section rail shown in the two-column layout.
const RAIL_WIDTH: u16 = 20;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let border_style = if app.focus.is_editor() {
        Style::default().fg(c.border_focused)
    } else {
        Style::default().fg(c.border)
    };

    let block = Block::default()
        .title(format!(" {} ", app.editor.spec().display_name))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.editor.selected().is_none() {
        render_empty(frame, inner);
        return;
    }

    let body = if app.layout.is_two_column() && inner.width > RAIL_WIDTH * 2 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(RAIL_WIDTH)])
            .split(inner);
        render_rail(app, frame, columns[1]);
        columns[0]
    } else {
        inner
    };

    render_header(app, frame, body);

    let content = Rect::new(
        body.x,
        body.y + EDITOR_HEADER_ROWS,
        body.width,
        body.height.saturating_sub(EDITOR_HEADER_ROWS),
    );
    render_rows(app, frame, content);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let c = colors();
    let content = vec![
        Line::from(""),
        Line::styled("  No invoice open", Style::default().fg(c.fg)),
        Line::from(""),
        Line::styled(
            "  Enter: open the highlighted invoice",
            Style::default().fg(c.muted),
        ),
        Line::styled("  Alt+n: new invoice", Style::default().fg(c.muted)),
    ];
    frame.render_widget(Paragraph::new(content), area);
}

/// The two sticky rows above the scrolled content: heading and rule.
fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let heading = match app.editor.title() {
        Some(title) => format!("{} {title}", app.editor.spec().display_name),
        None => format!("New {}", app.editor.spec().display_name),
    };

    let mut spans = vec![Span::styled(
        format!("  {heading}"),
        Style::default().fg(c.fg).add_modifier(Modifier::BOLD),
    )];
    if app.editor.form().is_dirty() {
        spans.push(Span::styled(" *", Style::default().fg(c.warning)));
    }
    match app.editor.pending() {
        Some(PendingOperation::Delete) => {
            spans.push(Span::styled("  deleting...", Style::default().fg(c.muted)));
        }
        Some(_) => {
            spans.push(Span::styled("  saving...", Style::default().fg(c.muted)));
        }
        None => {}
    }
    if !app.editor.can_submit() && app.editor.form().is_dirty() {
        spans.push(Span::styled(
            "  (fix errors to save)",
            Style::default().fg(c.muted),
        ));
    }

    let rule = "─".repeat(usize::from(area.width));
    let lines = vec![
        Line::from(spans),
        Line::styled(rule, Style::default().fg(c.border)),
    ];
    let header_area = Rect::new(area.x, area.y, area.width, EDITOR_HEADER_ROWS.min(area.height));
    frame.render_widget(Paragraph::new(lines), header_area);
}

/// The scrolled window over the row plan.
fn render_rows(app: &App, frame: &mut Frame, area: Rect) {
    let start = usize::from(app.editor_scroll);
    let end = (start + usize::from(area.height)).min(app.plan.rows.len());
    if start >= end {
        return;
    }

    let lines: Vec<Line> = app.plan.rows[start..end]
        .iter()
        .map(|row| render_row(app, row, area.width))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_row<'a>(app: &'a App, row: &FormRow, width: u16) -> Line<'a> {
    let c = colors();
    let form = app.editor.form();

    match *row {
        FormRow::SectionHeader(index) => {
            let sections = app.sections.sections();
            let Some(section) = sections.get(index) else {
                return Line::from("");
            };
            let marker = if section.expandable {
                if app.sections.is_expanded(index) {
                    "▾ "
                } else {
                    "▸ "
                }
            } else {
                ""
            };
            let active = app.sections.active_index() == Some(index);
            let label_style = if active {
                Style::default()
                    .fg(c.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(c.fg).add_modifier(Modifier::BOLD)
            };

            let mut spans = vec![Span::styled(
                format!("{marker}{}", section.label),
                label_style,
            )];
            if let Some(count) = section_count(app, index) {
                spans.push(Span::styled(
                    format!(" ({count})"),
                    Style::default().fg(c.muted),
                ));
            }
            if let Some(ref adornment) = section.adornment {
                spans.push(Span::styled(
                    format!("  {adornment}"),
                    Style::default().fg(c.muted),
                ));
            }
            Line::from(spans)
        }
        FormRow::FieldLabel(index) => {
            let Some(field) = app.fields.get(index) else {
                return Line::from("");
            };
            let mut label = format!("  {}", field.label);
            if field.required {
                label.push_str(" *");
            }
            let mut spans = vec![Span::styled(label, Style::default().fg(c.muted))];
            if let Some(err) = form.field_error(field.path) {
                spans.push(Span::styled(
                    format!("  ⚠ {err}"),
                    Style::default().fg(c.error),
                ));
            }
            Line::from(spans)
        }
        FormRow::FieldValue(index) => {
            let Some(field) = app.fields.get(index) else {
                return Line::from("");
            };
            let focused = app.focus.is_editor()
                && app.editor.nested().is_none()
                && app.field_focus == index;
            let text = field_text(form, field.path);
            let display = if focused {
                format!("  {text}▎")
            } else {
                format!("  {text}")
            };
            let style = if focused {
                Style::default().fg(c.border_focused)
            } else {
                Style::default().fg(c.fg)
            };
            Line::styled(display, style)
        }
        FormRow::LineItem(index) => {
            let path = format!("lineItems.{index}");
            let Some(item) = form.value(&path) else {
                return Line::from("");
            };
            let description = item
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("(item)");
            let quantity = item.get("quantity").and_then(Value::as_f64).unwrap_or(0.0);
            let price = item.get("unitPrice").and_then(Value::as_f64).unwrap_or(0.0);
            let amount = quantity * price;
            let desc_width = usize::from(width).saturating_sub(28).max(8);
            Line::from(vec![
                Span::styled(
                    format!("  {:<desc_width$}", truncate_to_width(description, desc_width)),
                    Style::default().fg(c.fg),
                ),
                Span::styled(
                    format!(" {} × {price:.2}", trim_number(quantity)),
                    Style::default().fg(c.muted),
                ),
                Span::styled(format!(" = {amount:.2}"), Style::default().fg(c.fg)),
            ])
        }
        FormRow::Total => {
            let total = invoice_total(form.values());
            Line::styled(
                format!("  Total {total:.2}"),
                Style::default().fg(c.fg).add_modifier(Modifier::BOLD),
            )
        }
        FormRow::Payment(index) => {
            let path = format!("payments.{index}");
            let Some(payment) = form.value(&path) else {
                return Line::from("");
            };
            let amount = payment.get("amount").and_then(Value::as_f64).unwrap_or(0.0);
            let received = payment
                .get("receivedOn")
                .and_then(Value::as_str)
                .unwrap_or("");
            let method = payment.get("method").and_then(Value::as_str).unwrap_or("");
            Line::from(vec![
                Span::styled(format!("  {amount:>10.2}"), Style::default().fg(c.success)),
                Span::styled(format!("  {received}"), Style::default().fg(c.fg)),
                Span::styled(format!("  {method}"), Style::default().fg(c.muted)),
            ])
        }
        FormRow::Note(text) => Line::styled(format!("  {text}"), Style::default().fg(c.muted)),
        FormRow::History(attribute) => {
            let (label, path) = if attribute == 0 {
                ("Created ", "createdOn")
            } else {
                ("Modified", "modifiedOn")
            };
            let stamp = form
                .value(path)
                .and_then(Value::as_str)
                .map(format_timestamp)
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("  {label}  "), Style::default().fg(c.muted)),
                Span::styled(stamp, Style::default().fg(c.fg)),
            ])
        }
        FormRow::FormError => {
            let message = form.form_error().unwrap_or("");
            Line::styled(format!("  ⚠ {message}"), Style::default().fg(c.error))
        }
        FormRow::Blank => Line::from(""),
    }
}

/// Live item count for the expandable sections.
fn section_count(app: &App, index: usize) -> Option<usize> {
    let array = match index {
        1 => "lineItems",
        2 => "payments",
        _ => return None,
    };
    let count = app
        .editor
        .form()
        .value(array)
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    Some(count)
}

/// Section index on the right edge: number, expand marker and label,
/// with the active section highlighted.
fn render_rail(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let mut lines = vec![Line::from("")];
    for (index, section) in app.sections.sections().iter().enumerate() {
        let active = app.sections.active_index() == Some(index);
        let bar = if active { "▎" } else { " " };
        let marker = if section.expandable {
            if app.sections.is_expanded(index) {
                "▾ "
            } else {
                "▸ "
            }
        } else {
            "  "
        };
        let style = if active {
            Style::default()
                .fg(c.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(c.muted)
        };
        let label = truncate_to_width(&section.label, usize::from(area.width).saturating_sub(7));
        lines.push(Line::from(vec![
            Span::styled(bar, Style::default().fg(c.highlight)),
            Span::styled(format!("{} ", index + 1), Style::default().fg(c.muted)),
            Span::styled(format!("{marker}{label}"), style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!(" Alt+1..{} jump", app.sections.len()),
        Style::default().fg(c.muted),
    ));
    frame.render_widget(Paragraph::new(lines), area);
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// RFC 3339 stamp shortened to date and time.
fn format_timestamp(stamp: &str) -> String {
    stamp
        .get(..19)
        .map_or_else(|| stamp.to_string(), |s| s.replace('T', " "))
}
