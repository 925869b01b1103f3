//! Action menu (speed-dial) dispatcher
//!
//! A small fixed set of caller-declared actions behind an expandable
//! control. Each action either fires directly or routes through the same
//! confirmation collaborator the Dirty-State Guard uses. The control
//! collapses the moment an action is dispatched, before any async work
//! completes; nothing is ever queued.

use crate::guard::ConfirmRequest;

/// What selecting an action does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuBehaviour<M> {
    /// Dispatch immediately.
    Invoke(M),
    /// Ask first, dispatch on explicit confirmation.
    ConfirmThenInvoke {
        action: M,
        message: String,
        confirm_label: String,
    },
}

/// One declared action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem<M> {
    pub icon: &'static str,
    pub tooltip: String,
    pub disabled: bool,
    pub behaviour: MenuBehaviour<M>,
}

impl<M> ActionItem<M> {
    /// An action that fires without confirmation.
    #[must_use]
    pub fn invoke(icon: &'static str, tooltip: impl Into<String>, action: M) -> Self {
        Self {
            icon,
            tooltip: tooltip.into(),
            disabled: false,
            behaviour: MenuBehaviour::Invoke(action),
        }
    }

    /// An action gated behind a confirmation prompt.
    #[must_use]
    pub fn confirm(
        icon: &'static str,
        tooltip: impl Into<String>,
        action: M,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
    ) -> Self {
        Self {
            icon,
            tooltip: tooltip.into(),
            disabled: false,
            behaviour: MenuBehaviour::ConfirmThenInvoke {
                action,
                message: message.into(),
                confirm_label: confirm_label.into(),
            },
        }
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Dispatch outcome handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuDispatch<M> {
    /// Run the action now.
    Direct(M),
    /// Present this confirmation; run the action only on confirm.
    NeedsConfirm(ConfirmRequest<M>),
}

/// The expandable control itself.
///
/// State machine: closed to open on hover-enter or click; open to closed
/// on hover-leave, explicit close, or action dispatch.
#[derive(Debug, Clone)]
pub struct ActionMenu<M> {
    items: Vec<ActionItem<M>>,
    open: bool,
}

impl<M: Clone> ActionMenu<M> {
    #[must_use]
    pub fn new(items: Vec<ActionItem<M>>) -> Self {
        Self { items, open: false }
    }

    #[must_use]
    pub fn items(&self) -> &[ActionItem<M>] {
        &self.items
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hover-enter and click both expand the control.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hover-leave and explicit close both collapse it.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_item_disabled(&mut self, index: usize, disabled: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.disabled = disabled;
        }
    }

    /// Select the action at `index`.
    ///
    /// The menu collapses immediately on a successful dispatch. Disabled
    /// items, unknown indices, and a closed menu all dispatch nothing and
    /// leave the state alone.
    pub fn dispatch(&mut self, index: usize) -> Option<MenuDispatch<M>> {
        if !self.open {
            return None;
        }
        let item = self.items.get(index)?;
        if item.disabled {
            return None;
        }
        self.open = false;

        Some(match &item.behaviour {
            MenuBehaviour::Invoke(action) => MenuDispatch::Direct(action.clone()),
            MenuBehaviour::ConfirmThenInvoke {
                action,
                message,
                confirm_label,
            } => MenuDispatch::NeedsConfirm(ConfirmRequest {
                message: message.clone(),
                confirm_label: confirm_label.clone(),
                cancel_label: "Cancel".to_string(),
                reset_first: false,
                action: action.clone(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Msg {
        Delete,
        Duplicate,
    }

    fn menu() -> ActionMenu<Msg> {
        ActionMenu::new(vec![
            ActionItem::confirm(
                "🗑",
                "Delete record",
                Msg::Delete,
                "Record will be deleted permanently",
                "DELETE",
            ),
            ActionItem::invoke("⧉", "Duplicate record", Msg::Duplicate),
        ])
    }

    #[test]
    fn opens_on_enter_and_closes_on_leave() {
        let mut menu = menu();
        assert!(!menu.is_open());
        menu.open();
        assert!(menu.is_open());
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn direct_action_dispatches_and_collapses() {
        let mut menu = menu();
        menu.open();
        let dispatch = menu.dispatch(1);
        assert_eq!(dispatch, Some(MenuDispatch::Direct(Msg::Duplicate)));
        assert!(!menu.is_open());
    }

    #[test]
    fn confirmed_action_yields_a_request_and_collapses_before_confirmation() {
        let mut menu = menu();
        menu.open();
        let Some(MenuDispatch::NeedsConfirm(request)) = menu.dispatch(0) else {
            panic!("expected a confirmation request");
        };
        assert_eq!(request.action, Msg::Delete);
        assert_eq!(request.message, "Record will be deleted permanently");
        assert_eq!(request.confirm_label, "DELETE");
        assert!(!request.reset_first);
        // Collapsed already, even though nothing was confirmed yet.
        assert!(!menu.is_open());
    }

    #[test]
    fn disabled_items_dispatch_nothing() {
        let mut menu = menu();
        menu.set_item_disabled(1, true);
        menu.open();
        assert_eq!(menu.dispatch(1), None);
        assert!(menu.is_open());
    }

    #[test]
    fn closed_menu_and_unknown_indices_are_inert() {
        let mut menu = menu();
        assert_eq!(menu.dispatch(0), None);
        menu.open();
        assert_eq!(menu.dispatch(9), None);
        assert!(menu.is_open());
    }
}
