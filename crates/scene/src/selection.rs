use dataset::ClusterId;
use serde::Serialize;
use tracing::debug;

/// The currently inspected cluster, by id. At most one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<ClusterId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ClusterId> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn is_selected(&self, id: &ClusterId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Returns `true` if the selection changed.
    pub fn select(&mut self, id: ClusterId) -> bool {
        if self.is_selected(&id) {
            return false;
        }
        self.current = Some(id);
        true
    }

    /// Returns `true` if something was selected. Clearing an empty selection
    /// is a no-op.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}

/// Identifies one summary request. Only the newest token can complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SummaryToken(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryState {
    Idle,
    Pending {
        token: SummaryToken,
        record_id: ClusterId,
    },
    Ready {
        record_id: ClusterId,
        text: String,
    },
}

impl SummaryState {
    pub fn label(&self) -> &'static str {
        match self {
            SummaryState::Idle => "idle",
            SummaryState::Pending { .. } => "pending",
            SummaryState::Ready { .. } => "ready",
        }
    }
}

/// On-demand summary with cancellation-by-staleness.
///
/// Every request gets a fresh token. A completion is applied only when its
/// token is the pending one and its record is still the selected one;
/// anything else is dropped.
#[derive(Debug, Clone)]
pub struct SummaryTask {
    state: SummaryState,
    next_token: u64,
}

impl Default for SummaryTask {
    fn default() -> Self {
        Self {
            state: SummaryState::Idle,
            next_token: 1,
        }
    }
}

impl SummaryTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    /// Moves to pending for `record_id`. A request while already pending is
    /// ignored and returns `None`.
    pub fn begin(&mut self, record_id: ClusterId) -> Option<SummaryToken> {
        if let SummaryState::Pending { token, .. } = &self.state {
            debug!(token = token.0, "summary already pending");
            return None;
        }
        let token = SummaryToken(self.next_token);
        self.next_token += 1;
        debug!(token = token.0, record_id = %record_id, "summary requested");
        self.state = SummaryState::Pending { token, record_id };
        Some(token)
    }

    /// Applies a finished summary. Returns `false` when the result is stale.
    pub fn complete(&mut self, token: SummaryToken, selected: Option<&ClusterId>, text: String) -> bool {
        let applies = matches!(
            &self.state,
            SummaryState::Pending { token: t, record_id } if *t == token && Some(record_id) == selected
        );
        if !applies {
            debug!(token = token.0, "stale summary discarded");
            return false;
        }
        if let SummaryState::Pending { record_id, .. } = std::mem::replace(&mut self.state, SummaryState::Idle) {
            self.state = SummaryState::Ready { record_id, text };
        }
        true
    }

    /// Back to idle. Any token in flight becomes stale.
    pub fn reset(&mut self) {
        self.state = SummaryState::Idle;
    }

    pub fn pending_token(&self) -> Option<SummaryToken> {
        match &self.state {
            SummaryState::Pending { token, .. } => Some(*token),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Selection, SummaryState, SummaryTask, SummaryToken};
    use dataset::ClusterId;

    fn id(s: &str) -> ClusterId {
        ClusterId::new(s)
    }

    #[test]
    fn selection_holds_at_most_one() {
        let mut s = Selection::new();
        assert!(s.select(id("a")));
        assert!(!s.select(id("a")));
        assert!(s.select(id("b")));
        assert_eq!(s.current(), Some(&id("b")));
        assert!(s.clear());
        assert!(s.is_empty());
    }

    #[test]
    fn clear_on_empty_is_noop() {
        let mut s = Selection::new();
        assert!(!s.clear());
        assert!(!s.clear());
        assert_eq!(s, Selection::default());
    }

    #[test]
    fn summary_goes_idle_pending_ready() {
        let mut t = SummaryTask::new();
        assert_eq!(t.state(), &SummaryState::Idle);
        let tok = t.begin(id("a")).unwrap();
        assert_eq!(t.state().label(), "pending");
        assert!(t.begin(id("a")).is_none());
        assert!(t.complete(tok, Some(&id("a")), "done".into()));
        assert_eq!(
            t.state(),
            &SummaryState::Ready {
                record_id: id("a"),
                text: "done".into()
            }
        );
    }

    #[test]
    fn stale_completions_are_dropped() {
        let mut t = SummaryTask::new();
        let old = t.begin(id("a")).unwrap();
        // Selection moved on to b before completion.
        assert!(!t.complete(old, Some(&id("b")), "a text".into()));
        assert_eq!(t.state().label(), "pending");

        t.reset();
        let new = t.begin(id("b")).unwrap();
        assert_ne!(old, new);
        assert!(!t.complete(old, Some(&id("b")), "a text".into()));
        assert!(!t.complete(SummaryToken(999), Some(&id("b")), "x".into()));
        assert!(t.complete(new, Some(&id("b")), "b text".into()));
    }

    #[test]
    fn reset_invalidates_pending_token() {
        let mut t = SummaryTask::new();
        let tok = t.begin(id("a")).unwrap();
        t.reset();
        assert!(!t.complete(tok, Some(&id("a")), "late".into()));
        assert_eq!(t.state(), &SummaryState::Idle);
        assert!(t.pending_token().is_none());
    }
}
