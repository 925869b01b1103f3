//! Selection/Scroll Synchronizer
//!
//! Keeps the sections of an edit view synchronized with the "currently
//! active" marker in the side index, under both scroll-driven and
//! click-driven stimuli, and remembers which sections are expanded across
//! process restarts (persisted per root entity through a
//! [`PreferenceStore`]).
//!
//! All operations are pure state transitions returning effect values; the
//! driver performs the actual scrolling and owns the deferred-expand timer.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::traits::PreferenceStore;
use crate::types::{LayoutMode, Section, SelectionState};

/// Storage key for the expanded-section map. A single key holds one JSON
/// object mapping root-entity name to a sorted index array.
pub const SECTION_EXPANDED_STORAGE_KEY: &str = "section-list-expanded";

/// Delay between an explicit selection and the expansion of the selected
/// section, leaving the scroll animation time to start.
pub const EXPAND_AFTER_SCROLL_DELAY: Duration = Duration::from_millis(300);

/// Scroll geometry of one section inside the content pane, in pane rows
/// relative to the top of the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    pub top: u16,
    pub height: u16,
}

/// Snapshot of the content pane's scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Rows scrolled past the top of the content.
    pub scroll_top: u16,
    /// Visible height of the pane.
    pub viewport_height: u16,
    /// Total height of the scrollable content.
    pub content_height: u16,
}

/// Effects requested by an explicit selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectEffects {
    /// Scroll the content pane so the section top sits below the header.
    pub scroll_to: Option<u16>,
    /// Expand this section after [`EXPAND_AFTER_SCROLL_DELAY`].
    pub deferred_expand: Option<usize>,
}

/// Scroll-tracking sub-state: the selection, the previous scroll offset
/// (for direction detection) and the fixed header offset.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    selection: SelectionState,
    prev_scroll_top: u16,
    header_offset: u16,
    layout: LayoutMode,
}

impl ScrollSpy {
    #[must_use]
    pub fn new(header_offset: u16) -> Self {
        Self {
            selection: SelectionState::default(),
            prev_scroll_top: 0,
            header_offset,
            layout: LayoutMode::TwoColumn,
        }
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }
}

/// The section list of one edit view plus its synchronizer state.
///
/// Section order is fixed at composition time. Geometry is registered by
/// the driver as it lays the content pane out and is dropped for indices
/// past the end whenever the list shrinks.
#[derive(Debug, Clone)]
pub struct SectionList {
    sections: Vec<Section>,
    bounds: Vec<Option<SectionBounds>>,
    spy: ScrollSpy,
}

impl SectionList {
    #[must_use]
    pub fn new(sections: Vec<Section>, header_offset: u16) -> Self {
        let bounds = vec![None; sections.len()];
        Self {
            sections,
            bounds,
            spy: ScrollSpy::new(header_offset),
        }
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn set_layout(&mut self, layout: LayoutMode) {
        self.spy.layout = layout;
    }

    #[must_use]
    pub fn active_label(&self) -> Option<&str> {
        self.spy.selection.active.as_deref()
    }

    /// Index of the active section, `None` when nothing is active or the
    /// active label no longer names a section.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        let active = self.spy.selection.active.as_deref()?;
        self.sections.iter().position(|s| s.label == active)
    }

    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.spy.selection.expanded.contains(&index)
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.spy.selection
    }

    /// Record the layout geometry of one section. Out-of-range indices are
    /// ignored.
    pub fn register_bounds(&mut self, index: usize, bounds: SectionBounds) {
        if let Some(slot) = self.bounds.get_mut(index) {
            *slot = Some(bounds);
        }
    }

    /// Activate the first section when nothing is active yet.
    pub fn ensure_default(&mut self) {
        if self.spy.selection.active.is_none() {
            if let Some(first) = self.sections.first() {
                self.spy.selection.active = Some(first.label.clone());
            }
        }
    }

    /// Explicit (click) selection of a section.
    ///
    /// Returns the scroll target aligning the section just below the header
    /// and, when the section is expandable and not yet expanded, the index
    /// to expand after [`EXPAND_AFTER_SCROLL_DELAY`]. Out-of-range indices
    /// produce no effects.
    pub fn select(&mut self, index: usize) -> SelectEffects {
        let Some(section) = self.sections.get(index) else {
            return SelectEffects::default();
        };
        self.spy.selection.active = Some(section.label.clone());

        let scroll_to = self
            .bounds
            .get(index)
            .copied()
            .flatten()
            .map(|b| b.top.saturating_sub(self.spy.header_offset));
        let deferred_expand = (section.expandable && !self.spy.selection.expanded.contains(&index))
            .then_some(index);

        SelectEffects {
            scroll_to,
            deferred_expand,
        }
    }

    /// Apply a deferred expansion scheduled by [`select`](Self::select).
    ///
    /// Returns `true` when the expanded set actually changed (the caller
    /// persists on change). Stale indices and non-expandable sections are
    /// no-ops.
    pub fn complete_deferred_expand(&mut self, index: usize) -> bool {
        if !self.sections.get(index).is_some_and(|s| s.expandable) {
            return false;
        }
        self.spy.selection.expanded.insert(index)
    }

    /// Collapse or expand a section from its own header control.
    ///
    /// Returns `true` when the expanded set changed.
    pub fn toggle_expanded(&mut self, index: usize) -> bool {
        if !self.sections.get(index).is_some_and(|s| s.expandable) {
            return false;
        }
        if !self.spy.selection.expanded.remove(&index) {
            self.spy.selection.expanded.insert(index);
        }
        true
    }

    /// Scroll-driven activation. Only runs in two-column layout.
    ///
    /// Policy, in order:
    /// - pane at maximum extent: the last section becomes active;
    /// - scrolling down past the bottom edge of the active section (minus
    ///   the header offset): advance to the next section;
    /// - scrolling up above the top edge of the active section (minus the
    ///   header offset): retreat to the previous section.
    ///
    /// Returns the newly active index when activation changed.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<usize> {
        if !self.spy.layout.is_two_column() {
            return None;
        }

        let scrolling_down = self.spy.prev_scroll_top < metrics.scroll_top;
        self.spy.prev_scroll_top = metrics.scroll_top;

        if metrics.scroll_top.saturating_add(metrics.viewport_height) == metrics.content_height {
            let last = self.sections.len().checked_sub(1)?;
            return self.activate(last);
        }

        let index = self.active_index()?;
        let bounds = self.bounds.get(index).copied().flatten()?;

        if scrolling_down {
            let bottom_edge = bounds
                .top
                .saturating_add(bounds.height)
                .saturating_sub(self.spy.header_offset);
            if metrics.scroll_top >= bottom_edge && index + 1 < self.sections.len() {
                return self.activate(index + 1);
            }
            return None;
        }

        let top_edge = bounds.top.saturating_sub(self.spy.header_offset);
        if metrics.scroll_top < top_edge {
            if let Some(prev) = index.checked_sub(1) {
                return self.activate(prev);
            }
        }
        None
    }

    /// Shrink the list to `len` sections.
    ///
    /// Geometry past the end is discarded, the expanded set is clamped to
    /// the new length, and an active label that no longer names a section
    /// is cleared (callers follow up with [`ensure_default`](Self::ensure_default)).
    pub fn truncate(&mut self, len: usize) {
        if len >= self.sections.len() {
            return;
        }
        self.sections.truncate(len);
        self.bounds.truncate(len);
        self.spy.selection.expanded.retain(|&i| i < len);
        if self.active_index().is_none() {
            self.spy.selection.active = None;
        }
    }

    /// Restore the expanded set persisted for `root_entity`.
    ///
    /// Indices outside the current list length are dropped on the way in.
    /// An absent key or an absent entry leaves the state untouched.
    pub fn load_expanded(
        &mut self,
        store: &dyn PreferenceStore,
        root_entity: &str,
    ) -> CoreResult<()> {
        let Some(raw) = store.get(SECTION_EXPANDED_STORAGE_KEY)? else {
            return Ok(());
        };
        let stored: BTreeMap<String, Vec<usize>> = serde_json::from_str(&raw)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        if let Some(indices) = stored.get(root_entity) {
            self.spy.selection.expanded = indices
                .iter()
                .copied()
                .filter(|&i| i < self.sections.len())
                .collect();
        }
        Ok(())
    }

    /// Persist the expanded set for `root_entity`.
    ///
    /// Read-merge-write over the single shared map so other root entities
    /// keep their entries. A stored map that no longer parses is replaced
    /// wholesale rather than failing the write.
    pub fn persist_expanded(
        &self,
        store: &dyn PreferenceStore,
        root_entity: &str,
    ) -> CoreResult<()> {
        let mut stored: BTreeMap<String, Vec<usize>> = match store.get(SECTION_EXPANDED_STORAGE_KEY)?
        {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable expanded-section map: {e}");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        stored.insert(
            root_entity.to_string(),
            self.spy.selection.expanded.iter().copied().collect(),
        );
        let raw = serde_json::to_string(&stored)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        store.set(SECTION_EXPANDED_STORAGE_KEY, &raw)
    }

    fn activate(&mut self, index: usize) -> Option<usize> {
        let label = &self.sections.get(index)?.label;
        if self.spy.selection.active.as_deref() == Some(label.as_str()) {
            return None;
        }
        self.spy.selection.active = Some(label.clone());
        Some(index)
    }
}
