//! OpsDesk terminal client
//!
//! Elm-style structure:
//! - **Model**: application state (`model/`)
//! - **Message**: input events and task completions (`message/`)
//! - **Update**: the only place state changes (`update/`)
//! - **View**: rendering (`view/`)
//! - **Event**: raw input translation (`event/`)
//! - **Backend**: record and preference stores (`backend/`)
//!
//! Startup: resolve the theme and the optional deep link, open the
//! stores, seed demo data on first run, then hand control to the main
//! loop in `app.rs`. The terminal is restored on every exit path.

mod app;
mod backend;
mod event;
mod message;
mod model;
mod update;
mod util;
mod view;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use opsdesk_core::{take_expand_tab, PreferenceStore, Route, ScreenContext};

use backend::{default_data_dir, JsonPreferenceStore, JsonRecordService};
use message::{AppMessage, ListMessage};
use util::{init_terminal, restore_terminal};

fn main() -> Result<()> {
    apply_theme_from_env();

    let runtime = Runtime::new().context("failed to start the async runtime")?;

    // Optional deep link, e.g. `opsdesk-tui "/invoices/inv-0001?expandTab=2"`.
    let mut raw = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/invoices".to_string());
    if !raw.starts_with('/') {
        raw.insert(0, '/');
    }
    let mut route = Route::parse(&raw);

    let mut pending_expand_tab = None;
    if let Some((tab, stripped)) = take_expand_tab(&route) {
        pending_expand_tab = Some(tab);
        route = stripped;
    }
    let pending_open = route
        .path
        .strip_prefix("/invoices/")
        .filter(|rest| !rest.is_empty() && *rest != "new")
        .map(ToString::to_string);

    let backend = Arc::new(JsonRecordService::new());
    let preferences = Arc::new(JsonPreferenceStore::open(default_data_dir()));

    // First run gets a handful of demo invoices to explore.
    match runtime.block_on(backend.seed_if_empty()) {
        Ok(true) => log::info!("Seeded demo invoices"),
        Ok(false) => {}
        Err(err) => ScreenContext::log_failure("seed demo invoices", &err),
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = model::App::new(
        runtime.handle().clone(),
        tx,
        rx,
        backend,
        Arc::clone(&preferences) as Arc<dyn PreferenceStore>,
        route,
    );
    app.pending_open = pending_open;
    app.pending_expand_tab = pending_expand_tab;

    let root_entity = app.editor.spec().root_entity;
    if let Err(err) = app.sections.load_expanded(preferences.as_ref(), root_entity) {
        ScreenContext::log_failure("restore expanded sections", &err);
    }

    let mut terminal = init_terminal()?;
    let size = terminal.size()?;
    app.update_layout(size.width, size.height);

    update::update(&mut app, AppMessage::List(ListMessage::Reload));

    let result = app::run(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    result
}

/// Pick the color theme from `OPSDESK_THEME` before the first frame.
fn apply_theme_from_env() {
    if let Ok(value) = std::env::var("OPSDESK_THEME") {
        if value.eq_ignore_ascii_case("light") {
            view::theme::set_theme_index(1);
        }
    }
}
