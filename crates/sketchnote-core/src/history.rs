//! Undo/redo history of immutable canvas snapshots.

use crate::drawable::Drawable;
use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// An immutable, cheaply clonable collection of drawables.
///
/// Insertion order is z-order: later entries render on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot(Arc<[Drawable]>);

impl Snapshot {
    /// The empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A new snapshot with `drawable` appended on top.
    pub fn with_appended(&self, drawable: Drawable) -> Self {
        self.iter().cloned().chain(std::iter::once(drawable)).collect()
    }

    pub fn as_slice(&self) -> &[Drawable] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Drawable> {
        self.0.to_vec()
    }

    /// Whether two snapshots share the same allocation.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Snapshot {
    type Target = [Drawable];

    fn deref(&self) -> &[Drawable] {
        &self.0
    }
}

impl From<Vec<Drawable>> for Snapshot {
    fn from(drawables: Vec<Drawable>) -> Self {
        Self(drawables.into())
    }
}

impl FromIterator<Drawable> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Drawable>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Past, present and future snapshots.
///
/// `past` never holds more than `limit` entries; pushing beyond it drops the
/// oldest. Any push clears `future`.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    present: Snapshot,
    future: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}

impl History {
    /// Create a history with the default limit.
    pub fn new(present: Snapshot) -> Self {
        Self::with_limit(present, MAX_UNDO_HISTORY)
    }

    pub fn with_limit(present: Snapshot, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit,
        }
    }

    pub fn present(&self) -> &Snapshot {
        &self.present
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Make `snapshot` the present. The old present moves to `past` and the
    /// redo stack is discarded.
    pub fn push(&mut self, snapshot: Snapshot) {
        let previous = std::mem::replace(&mut self.present, snapshot);
        self.push_past(previous);
        self.future.clear();
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        true
    }

    /// Push an empty snapshot. Undoable.
    pub fn clear(&mut self) {
        self.push(Snapshot::empty());
    }

    /// Overwrite the present without recording history. For bookkeeping
    /// such as applying the initial load, never for user edits.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.present = snapshot;
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
            log::debug!("History limit {} reached, dropped oldest state", self.limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::{DrawableKind, DrawableStyle, StrokeMode};

    fn stroke(n: f64) -> Drawable {
        Drawable::new(
            DrawableStyle::default(),
            DrawableKind::FreehandStroke {
                points: vec![n, n, n + 1.0, n + 1.0],
                mode: StrokeMode::Ink,
            },
        )
    }

    fn push_n(history: &mut History, n: usize) {
        for i in 0..n {
            let next = history.present().with_appended(stroke(i as f64));
            history.push(next);
        }
    }

    #[test]
    fn test_initial_state() {
        let history = History::default();
        assert!(history.present().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_and_undo() {
        let mut history = History::default();
        push_n(&mut history, 2);
        assert_eq!(history.present().len(), 2);
        assert!(history.undo());
        assert_eq!(history.present().len(), 1);
        assert!(history.can_redo());
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history = History::default();
        let before = history.present().clone();
        assert!(!history.undo());
        assert!(history.present().ptr_eq(&before));
    }

    #[test]
    fn test_redo_empty_is_noop() {
        let mut history = History::default();
        push_n(&mut history, 1);
        assert!(!history.redo());
        assert_eq!(history.present().len(), 1);
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::default();
        push_n(&mut history, 3);
        let before = history.present().clone();
        history.undo();
        history.redo();
        assert!(history.present().ptr_eq(&before));
        assert_eq!(history.past_len(), 3);
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn test_push_clears_future() {
        let mut history = History::default();
        push_n(&mut history, 3);
        history.undo();
        history.undo();
        assert_eq!(history.future_len(), 2);
        push_n(&mut history, 1);
        assert!(!history.can_redo());
        assert!(!history.redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::default();
        push_n(&mut history, MAX_UNDO_HISTORY + 25);
        assert_eq!(history.past_len(), MAX_UNDO_HISTORY);

        let mut undone = 0;
        while history.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_HISTORY);
        // The oldest reachable state holds the 25 strokes pushed before trimming began.
        assert_eq!(history.present().len(), 25);
    }

    #[test]
    fn test_redo_respects_limit() {
        let mut history = History::with_limit(Snapshot::empty(), 3);
        push_n(&mut history, 5);
        assert_eq!(history.past_len(), 3);
        history.undo();
        assert_eq!(history.past_len(), 2);
        history.redo();
        assert_eq!(history.past_len(), 3);
        assert_eq!(history.present().len(), 5);
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut history = History::default();
        push_n(&mut history, 2);
        history.clear();
        assert!(history.present().is_empty());
        assert!(history.undo());
        assert_eq!(history.present().len(), 2);
    }

    #[test]
    fn test_replace_does_not_touch_stacks() {
        let mut history = History::default();
        push_n(&mut history, 2);
        history.undo();
        history.replace(Snapshot::from(vec![stroke(9.0)]));
        assert_eq!(history.past_len(), 1);
        assert_eq!(history.future_len(), 1);
        assert_eq!(history.present().len(), 1);
    }

    #[test]
    fn test_with_appended_keeps_original() {
        let base = Snapshot::from(vec![stroke(0.0)]);
        let next = base.with_appended(stroke(1.0));
        assert_eq!(base.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0], base[0]);
    }
}
