//! Invoice list pane

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use serde_json::Value;

use opsdesk_core::Record;

use crate::model::fields::invoice_total;
use crate::model::App;
use crate::util::text::truncate_to_width;
use crate::view::theme::{colors, Styles};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let border_style = if app.focus.is_list() {
        Style::default().fg(c.border_focused)
    } else {
        Style::default().fg(c.border)
    };

    let block = Block::default()
        .title(" Invoices ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.invoices.loading {
        render_notice(frame, inner, "Loading invoices...", c.warning);
    } else if let Some(ref err) = app.invoices.error {
        render_notice(frame, inner, err, c.error);
    } else if app.invoices.records.is_empty() {
        render_empty(frame, inner);
    } else {
        render_list(app, frame, inner);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let content = vec![
        Line::from(""),
        Line::styled(format!("  {message}"), Style::default().fg(color)),
    ];
    frame.render_widget(Paragraph::new(content), area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let c = colors();
    let content = vec![
        Line::from(""),
        Line::styled("  No invoices yet", Style::default().fg(c.fg)),
        Line::from(""),
        Line::styled(
            "  Alt+n: new invoice",
            Style::default().fg(c.muted),
        ),
    ];
    frame.render_widget(Paragraph::new(content), area);
}

fn render_list(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    // Reserve the bottom line for the summary footer.
    let list_area = if area.height > 2 {
        Rect::new(area.x, area.y, area.width, area.height - 1)
    } else {
        area
    };
    let name_width = usize::from(area.width).saturating_sub(22).max(8);

    let items: Vec<ListItem> = app
        .invoices
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let is_selected = i == app.invoices.selected;
            let number = record
                .get("invoiceNumber")
                .map(|v| match v {
                    Value::Number(n) => n.to_string(),
                    Value::String(s) => s.clone(),
                    _ => String::new(),
                })
                .unwrap_or_default();
            let customer = record
                .get("customerName")
                .and_then(Value::as_str)
                .unwrap_or("(no customer)");
            let status = record
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("draft");

            let row_style = if is_selected {
                Styles::selected()
            } else {
                Style::default().fg(c.fg)
            };
            let badge_style = if is_selected {
                Style::default()
                    .bg(c.selected_bg)
                    .fg(status_color(status))
            } else {
                Style::default().fg(status_color(status))
            };

            let line = Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("#{number:<6}"), row_style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!(" {:<name_width$}", truncate_to_width(customer, name_width)),
                    row_style,
                ),
                Span::styled(format!(" [{status}]"), badge_style),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default());

    let mut state = ListState::default();
    state.select(Some(app.invoices.selected));

    frame.render_stateful_widget(list, list_area, &mut state);

    render_footer(app, frame, area);
}

/// One dim summary line pinned under the list: count and open total.
fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    if area.height < 3 {
        return;
    }
    let open_total: f64 = app
        .invoices
        .records
        .iter()
        .filter(|r| !is_settled(r))
        .map(invoice_total)
        .sum();
    let summary = format!(
        "  {} invoices, {:.2} outstanding",
        app.invoices.records.len(),
        open_total
    );
    let footer_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::styled(summary, Style::default().fg(colors().muted))),
        footer_area,
    );
}

fn is_settled(record: &Record) -> bool {
    matches!(
        record.get("status").and_then(Value::as_str),
        Some("paid" | "void")
    )
}

pub fn status_color(status: &str) -> Color {
    let c = colors();
    match status {
        "paid" => c.success,
        "sent" => c.highlight,
        "void" => c.error,
        _ => c.muted,
    }
}
