//! Transition results.

/// Result of applying a transition to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The request did not apply (not allowed, out of scope, or no change).
    Ignored,
    /// The request changed state or was forwarded to the caller.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }

    pub(crate) fn from_changed(changed: bool) -> Self {
        if changed {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}
