use std::collections::BTreeSet;

use crate::core::models::{ColumnId, TaskId};

#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging { task_id: TaskId },
}

/// A drop that should be committed to the board.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRequest {
    pub task_id: TaskId,
    pub target: ColumnId,
}

/// State of the single drag gesture in flight.
///
/// Drop and drag-end may arrive in either order, or only one of them; both
/// reset the controller to [`DragPhase::Idle`] with no highlighted columns.
#[derive(Debug)]
pub struct DragDropController {
    phase: DragPhase,
    highlighted: BTreeSet<ColumnId>,
}

impl Default for DragDropController {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            highlighted: BTreeSet::new(),
        }
    }
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn dragged(&self) -> Option<&TaskId> {
        match &self.phase {
            DragPhase::Dragging { task_id } => Some(task_id),
            DragPhase::Idle => None,
        }
    }

    pub fn is_dragging(&self, id: &TaskId) -> bool {
        self.dragged() == Some(id)
    }

    pub fn is_highlighted(&self, column: ColumnId) -> bool {
        self.highlighted.contains(&column)
    }

    pub fn has_highlights(&self) -> bool {
        !self.highlighted.is_empty()
    }

    pub fn drag_start(&mut self, task_id: TaskId) {
        if let DragPhase::Dragging { task_id: previous } = &self.phase {
            log::warn!("Drag of {} started while {} was still in flight", task_id, previous);
        }
        self.highlighted.clear();
        self.phase = DragPhase::Dragging { task_id };
    }

    /// Pointer over a column's drop zone. Returns whether a drop is possible.
    pub fn drag_over(&mut self, column: ColumnId) -> bool {
        if self.dragged().is_none() {
            return false;
        }
        self.highlighted.insert(column);
        true
    }

    pub fn drag_leave(&mut self, column: ColumnId) {
        self.highlighted.remove(&column);
    }

    /// Ends the gesture on `target`, handing back what to commit.
    pub fn drop_on(&mut self, target: ColumnId) -> Option<DropRequest> {
        let request = self.dragged().cloned().map(|task_id| DropRequest { task_id, target });
        self.reset();
        request
    }

    /// Ends the gesture without a drop. Returns the card that was in motion.
    pub fn drag_end(&mut self) -> Option<TaskId> {
        let dragged = self.dragged().cloned();
        self.reset();
        dragged
    }

    fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.highlighted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> TaskId {
        TaskId::from(raw)
    }

    #[test]
    fn starts_idle() {
        let controller = DragDropController::new();
        assert_eq!(controller.phase(), &DragPhase::Idle);
        assert!(!controller.has_highlights());
    }

    #[test]
    fn highlight_follows_enter_and_leave() {
        let mut controller = DragDropController::new();
        controller.drag_start(id("t1"));

        assert!(controller.drag_over(ColumnId::Todo));
        assert!(controller.drag_over(ColumnId::Done));
        controller.drag_leave(ColumnId::Todo);

        assert!(!controller.is_highlighted(ColumnId::Todo));
        assert!(controller.is_highlighted(ColumnId::Done));
    }

    #[test]
    fn drag_over_without_gesture_is_ignored() {
        let mut controller = DragDropController::new();
        assert!(!controller.drag_over(ColumnId::Done));
        assert!(!controller.has_highlights());
    }

    #[test]
    fn drop_returns_request_and_resets() {
        let mut controller = DragDropController::new();
        controller.drag_start(id("t1"));
        controller.drag_over(ColumnId::Done);

        let request = controller.drop_on(ColumnId::Done);

        assert_eq!(
            request,
            Some(DropRequest {
                task_id: id("t1"),
                target: ColumnId::Done
            })
        );
        assert_eq!(controller.phase(), &DragPhase::Idle);
        assert!(!controller.has_highlights());
    }

    #[test]
    fn drag_end_after_drop_is_harmless() {
        let mut controller = DragDropController::new();
        controller.drag_start(id("t1"));
        controller.drop_on(ColumnId::Todo);

        assert_eq!(controller.drag_end(), None);
        assert_eq!(controller.phase(), &DragPhase::Idle);
    }

    #[test]
    fn drag_end_without_drop_clears_everything() {
        let mut controller = DragDropController::new();
        controller.drag_start(id("t1"));
        controller.drag_over(ColumnId::Todo);
        controller.drag_over(ColumnId::Done);

        assert_eq!(controller.drag_end(), Some(id("t1")));
        assert!(!controller.has_highlights());
        assert!(controller.drop_on(ColumnId::Done).is_none());
    }
}
