//! Cancellable deferred work
//!
//! Deferred UI effects (expand-after-scroll, deep-link auto-expand) are
//! produced by the state machines as data. The driver owns the real
//! timers, keyed by [`TimerKey`], and aborts every timer belonging to an
//! editor when that editor is torn down, so a fired timer never acts on a
//! disposed instance.

use std::time::Duration;

use crate::route::DEEP_LINK_DELAY;
use crate::sections::EXPAND_AFTER_SCROLL_DELAY;

/// Identity of a deferred task. One timer per key; scheduling a key again
/// replaces the previous timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Expand the section at this index once its selection scroll started.
    ExpandSection(usize),
    /// Perform the click-equivalent work of a consumed deep link.
    DeepLink,
}

/// A message to deliver after `delay`, unless cancelled first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTask<M> {
    pub key: TimerKey,
    pub delay: Duration,
    pub message: M,
}

impl<M> DeferredTask<M> {
    /// The deferred expansion scheduled by an explicit section selection.
    #[must_use]
    pub fn expand_section(index: usize, message: M) -> Self {
        Self {
            key: TimerKey::ExpandSection(index),
            delay: EXPAND_AFTER_SCROLL_DELAY,
            message,
        }
    }

    /// The deferred click-equivalent of a deep link.
    #[must_use]
    pub fn deep_link(message: M) -> Self {
        Self {
            key: TimerKey::DeepLink,
            delay: DEEP_LINK_DELAY,
            message,
        }
    }
}
