//! Application state

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use opsdesk_core::{
    ActionItem, ActionMenu, ConfirmRequest, DeferredTask, EditorState, History, LayoutMode,
    PreferenceStore, RecordService, Route, ScreenContext, SectionList, TimerKey,
};

use crate::backend::JsonRecordService;
use crate::message::{AppMessage, MenuAction};
use crate::model::fields::{invoice_fields, payment_fields, FieldDef};
use crate::model::focus::FocusPanel;
use crate::model::geometry::{RowPlan, EDITOR_HEADER_ROWS};
use crate::model::invoices::{invoice_editor_spec, InvoicesState};

/// Terminal width below which the layout folds to a single column.
pub const TWO_COLUMN_MIN_WIDTH: u16 = 100;

/// An open confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub request: ConfirmRequest<AppMessage>,
    /// Which button has focus: `false` cancel, `true` confirm.
    pub confirm_focused: bool,
}

impl ConfirmState {
    /// Focus starts on the cancel button.
    pub fn new(request: ConfirmRequest<AppMessage>) -> Self {
        Self {
            request,
            confirm_focused: false,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.confirm_focused = !self.confirm_focused;
    }
}

/// Application state plus the async plumbing the update phase spawns onto.
pub struct App {
    /// Whether the main loop should exit.
    pub should_quit: bool,

    /// Which panel receives key routing.
    pub focus: FocusPanel,

    /// Current column layout, derived from the terminal width.
    pub layout: LayoutMode,

    /// Terminal size from the last resize event.
    pub terminal_cols: u16,
    pub terminal_rows: u16,

    /// Status bar message.
    pub status_message: Option<String>,

    // === Invoice screen state ===
    /// Invoice list panel.
    pub invoices: InvoicesState,
    /// The invoice edit view.
    pub editor: EditorState,
    /// Section list and scroll synchronizer of the edit view.
    pub sections: SectionList,
    /// Invoice editor fields, in focus order.
    pub fields: Vec<FieldDef>,
    /// Nested payment editor fields, in focus order.
    pub payment_fields: Vec<FieldDef>,
    /// Index of the focused invoice field.
    pub field_focus: usize,
    /// Index of the focused payment field while the nested editor is open.
    pub nested_field_focus: usize,
    /// Row plan of the editor content pane.
    pub plan: RowPlan,
    /// Rows scrolled past the top of the editor content.
    pub editor_scroll: u16,

    /// The speed-dial action menu.
    pub menu: ActionMenu<MenuAction>,
    /// Highlighted menu entry while the menu is open.
    pub menu_cursor: usize,

    /// Open confirmation dialog, shown above everything else.
    pub confirm: Option<ConfirmState>,

    /// Whether the keyboard shortcut overlay is open.
    pub show_help: bool,

    /// Visited routes; deep links are consumed with `replace`.
    pub history: History,
    /// Deep-linked record id waiting for the first list load.
    pub pending_open: Option<String>,
    /// Deep-linked section index waiting for the editor to open.
    pub pending_expand_tab: Option<usize>,

    /// Concrete record backend, also reachable through `ctx`.
    pub backend: Arc<JsonRecordService>,
    /// Collaborators handed to spawned tasks.
    pub ctx: ScreenContext,

    /// Window title applied on the last frame.
    pub applied_title: Option<String>,

    runtime: Handle,
    tx: UnboundedSender<AppMessage>,
    messages: UnboundedReceiver<AppMessage>,
    timers: HashMap<TimerKey, JoinHandle<()>>,
}

impl App {
    pub fn new(
        runtime: Handle,
        tx: UnboundedSender<AppMessage>,
        messages: UnboundedReceiver<AppMessage>,
        backend: Arc<JsonRecordService>,
        preferences: Arc<dyn PreferenceStore>,
        initial_route: Route,
    ) -> Self {
        let spec = invoice_editor_spec();
        let ctx = ScreenContext::new(
            Arc::clone(&backend) as Arc<dyn RecordService>,
            preferences,
            spec.clone(),
        );
        let sections = SectionList::new(spec.sections.clone(), EDITOR_HEADER_ROWS);

        Self {
            should_quit: false,
            focus: FocusPanel::List,
            layout: LayoutMode::TwoColumn,
            terminal_cols: 0,
            terminal_rows: 0,
            status_message: None,
            invoices: InvoicesState::new(),
            editor: EditorState::new(spec),
            sections,
            fields: invoice_fields(),
            payment_fields: payment_fields(),
            field_focus: 0,
            nested_field_focus: 0,
            plan: RowPlan::default(),
            editor_scroll: 0,
            menu: action_menu(),
            menu_cursor: 0,
            confirm: None,
            show_help: false,
            history: History::new(initial_route),
            pending_open: None,
            pending_expand_tab: None,
            backend,
            ctx,
            applied_title: None,
            runtime,
            tx,
            messages,
            timers: HashMap::new(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Sender for spawned tasks to report completions through.
    pub fn sender(&self) -> UnboundedSender<AppMessage> {
        self.tx.clone()
    }

    /// Next queued completion, if any.
    pub fn try_take_message(&mut self) -> Option<AppMessage> {
        self.messages.try_recv().ok()
    }

    /// Run async work on the runtime; results come back through the
    /// message channel.
    pub fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(future);
    }

    /// Arm a deferred task, replacing any timer already armed for its key.
    pub fn schedule(&mut self, task: DeferredTask<AppMessage>) {
        self.cancel_timer(task.key);
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(task.delay).await;
            let _ = tx.send(task.message);
        });
        self.timers.insert(task.key, handle);
    }

    pub fn cancel_timer(&mut self, key: TimerKey) {
        if let Some(handle) = self.timers.remove(&key) {
            handle.abort();
        }
    }

    /// Abort every armed timer. Runs on editor teardown so a late timer
    /// never acts on a disposed edit view.
    pub fn cancel_editor_timers(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    /// Recompute the layout after a resize.
    pub fn update_layout(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.layout = if cols >= TWO_COLUMN_MIN_WIDTH {
            LayoutMode::TwoColumn
        } else {
            LayoutMode::SingleColumn
        };
        self.sections.set_layout(self.layout);
    }

    /// Visible height of the editor's scrollable content: the terminal
    /// minus title bar, status bar, pane borders and the sticky header.
    pub fn editor_viewport(&self) -> u16 {
        self.terminal_rows
            .saturating_sub(2)
            .saturating_sub(2)
            .saturating_sub(EDITOR_HEADER_ROWS)
    }

    /// Fields of whichever editor currently receives input.
    pub fn active_fields(&self) -> &[FieldDef] {
        if self.editor.nested().is_some() {
            &self.payment_fields
        } else {
            &self.fields
        }
    }
}

/// The invoice speed dial: delete behind a confirmation, the rest direct.
fn action_menu() -> ActionMenu<MenuAction> {
    ActionMenu::new(vec![
        ActionItem::confirm(
            "✖",
            "Delete invoice",
            MenuAction::Delete,
            "Invoice will be deleted permanently",
            "DELETE",
        ),
        ActionItem::invoke("⧉", "Duplicate invoice", MenuAction::Duplicate),
        ActionItem::invoke("$", "Record payment", MenuAction::RecordPayment),
    ])
}
