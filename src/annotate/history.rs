//! Snapshot history for undo/redo.
//!
//! Every commit records a full copy of the shape sequence. The current
//! snapshot is `snapshots[index]`; pushing after an undo truncates the
//! forward history, so there are never redo branches.

use super::model::Annotation;

/// Linear snapshot stack with a depth cap.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Annotation>>,
    index: usize,
    max_depth: usize,
}

impl History {
    /// A history holding a single empty snapshot.
    pub fn new(max_depth: usize) -> Self {
        Self {
            snapshots: vec![Vec::new()],
            index: 0,
            // The initial snapshot plus at least one commit.
            max_depth: max_depth.max(2),
        }
    }

    /// Record `shapes` as the new current snapshot.
    pub fn push(&mut self, shapes: &[Annotation]) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(shapes.to_vec());

        // Trim history if it exceeds max size
        while self.snapshots.len() > self.max_depth {
            self.snapshots.remove(0);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&[Annotation]> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one snapshot. `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&[Annotation]> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// The snapshot the session currently reflects.
    pub fn current(&self) -> &[Annotation] {
        &self.snapshots[self.index]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::IVec2;

    use super::*;
    use crate::annotate::model::{Rgba, Shape, StrokeStyle};

    fn rect(x: i32) -> Annotation {
        Annotation::new(
            Shape::Rect {
                p1: IVec2::new(x, 0),
                p2: IVec2::new(x + 10, 10),
            },
            StrokeStyle {
                color: Rgba::rgb(255, 0, 0),
                thickness: 2,
            },
        )
    }

    #[test]
    fn test_new_history_has_one_empty_snapshot() {
        let history = History::new(100);
        assert_eq!(history.len(), 1);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_walks_snapshots() {
        let mut history = History::new(100);
        history.push(&[rect(0)]);
        history.push(&[rect(0), rect(20)]);

        assert_eq!(history.undo().map(<[_]>::len), Some(1));
        assert_eq!(history.undo().map(<[_]>::len), Some(0));
        assert!(history.undo().is_none());
        assert_eq!(history.redo().map(<[_]>::len), Some(1));
        assert_eq!(history.redo().map(<[_]>::len), Some(2));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_after_undo_truncates_redo() {
        let mut history = History::new(100);
        history.push(&[rect(0)]);
        history.push(&[rect(0), rect(20)]);
        history.undo();
        assert!(history.can_redo());

        history.push(&[rect(0), rect(40)]);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current()[1], rect(40));
    }

    #[test]
    fn test_history_max_depth() {
        let mut history = History::new(100);

        // Push more than max size
        for i in 0..150 {
            history.push(&[rect(i)]);
        }

        // Should be trimmed to max size, dropping the oldest snapshots
        assert_eq!(history.len(), 100);
        assert_eq!(history.index(), 99);
        assert_eq!(history.current()[0], rect(149));
    }
}
