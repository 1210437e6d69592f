use std::cell::RefCell;
use std::rc::Rc;

use crate::config::BoardConfig;
use crate::core::models::{ColumnId, TaskId};
use crate::core::services::{RandomSource, Scheduler, StorageBackend};
use crate::error::BoardError;
use crate::features::celebration::{CelebrationEngine, OverlaySurface, Viewport};

use super::{CardRenderer, CardView, DragDropController, DropRequest, TaskStore};

/// Result of a drop event on a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No drag gesture was in flight.
    NothingDragged,
    Moved {
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
        celebrated: bool,
    },
}

/// Browser capabilities the board runs on.
pub struct BoardServices {
    pub storage: Box<dyn StorageBackend>,
    pub scheduler: Rc<dyn Scheduler>,
    pub surface: Rc<dyn OverlaySurface>,
    pub rng: Box<dyn RandomSource>,
    /// Called after every change the view should pick up.
    pub notify: Rc<dyn Fn()>,
}

/// The board's event handlers: task store, cards, drag gesture and
/// celebration wired together.
#[derive(Clone)]
pub struct KanbanBoard {
    store: Rc<RefCell<TaskStore>>,
    cards: CardRenderer,
    drag: Rc<RefCell<DragDropController>>,
    celebration: CelebrationEngine,
    scheduler: Rc<dyn Scheduler>,
    notify: Rc<dyn Fn()>,
}

impl KanbanBoard {
    /// Builds an empty board; call [`KanbanBoard::reload`] to show the
    /// persisted tasks.
    pub fn new(config: &BoardConfig, services: BoardServices) -> Self {
        let BoardServices {
            storage,
            scheduler,
            surface,
            rng,
            notify,
        } = services;

        let store = TaskStore::new(storage, config);
        let cards = CardRenderer::new(scheduler.clone(), notify.clone(), config.entrance_ms);
        let celebration =
            CelebrationEngine::new(config.celebration.clone(), scheduler.clone(), surface, rng);

        Self {
            store: Rc::new(RefCell::new(store)),
            cards,
            drag: Rc::new(RefCell::new(DragDropController::new())),
            celebration,
            scheduler,
            notify,
        }
    }

    /// Re-reads the persisted slot and rebuilds every column. The columns
    /// are rebuilt from whatever the store holds even when loading fails.
    pub fn reload(&self) -> Result<(), BoardError> {
        let loaded = self.store.borrow_mut().load();

        for column in ColumnId::all() {
            self.cards.clear_column(column);
        }
        let tasks = self.store.borrow().tasks_in_creation_order();
        for task in &tasks {
            self.cards.render_card(task);
        }
        for column in ColumnId::all() {
            self.cards.refresh_empty_state(column);
        }

        loaded
    }

    pub fn add_task(&self, text: &str) -> Result<TaskId, BoardError> {
        let task = {
            let mut store = self.store.borrow_mut();
            let id = store.add_task(text)?;
            store
                .get(&id)
                .cloned()
                .ok_or_else(|| BoardError::UnknownTask(id.clone()))?
        };

        self.cards.render_card(&task);
        self.cards.refresh_empty_state(task.column);
        Ok(task.id)
    }

    pub fn drag_start(&self, id: TaskId) {
        self.drag.borrow_mut().drag_start(id.clone());

        // Marked on the next tick so the browser's drag image keeps the
        // normal card look.
        let drag = self.drag.clone();
        let cards = self.cards.clone();
        self.scheduler
            .after(
                0,
                Box::new(move || {
                    if drag.borrow().is_dragging(&id) {
                        cards.set_dragging(&id, true);
                    }
                }),
            )
            .detach();
        (self.notify)();
    }

    /// Pointer over a column. Returns whether the column accepts the drop.
    pub fn drag_over(&self, column: ColumnId) -> bool {
        let (accepted, changed) = {
            let mut drag = self.drag.borrow_mut();
            let was_highlighted = drag.is_highlighted(column);
            let accepted = drag.drag_over(column);
            (accepted, accepted && !was_highlighted)
        };
        if changed {
            (self.notify)();
        }
        accepted
    }

    pub fn drag_leave(&self, column: ColumnId) {
        let changed = {
            let mut drag = self.drag.borrow_mut();
            let was_highlighted = drag.is_highlighted(column);
            drag.drag_leave(column);
            was_highlighted
        };
        if changed {
            (self.notify)();
        }
    }

    pub fn drop_on(&self, target: ColumnId) -> Result<DropOutcome, BoardError> {
        let request = self.drag.borrow_mut().drop_on(target);
        self.cards.clear_drag_marks();
        (self.notify)();

        match request {
            Some(request) => self.commit(request),
            None => Ok(DropOutcome::NothingDragged),
        }
    }

    /// Gesture finished, with or without a drop before it.
    pub fn drag_end(&self) {
        self.drag.borrow_mut().drag_end();
        self.cards.clear_drag_marks();
        (self.notify)();
    }

    fn commit(&self, request: DropRequest) -> Result<DropOutcome, BoardError> {
        let DropRequest { task_id, target } = request;

        let from = self.store.borrow().get(&task_id).map(|task| task.column);
        let Some(from) = from else {
            log::error!("Could not find task data for ID: {}", task_id);
            return Err(BoardError::UnknownTask(task_id));
        };

        if self.cards.move_card(&task_id, target).is_none() {
            log::warn!("Task {} had no card on the board", task_id);
        }
        let moved = self.store.borrow_mut().move_task(&task_id, target);

        self.cards.refresh_empty_state(from);
        self.cards.refresh_empty_state(target);
        moved?;

        let celebrated = if target.is_terminal() {
            let started = self.celebration.trigger();
            self.cards.flash(&task_id);
            started
        } else {
            false
        };

        Ok(DropOutcome::Moved {
            task_id,
            from,
            to: target,
            celebrated,
        })
    }

    pub fn resize(&self, viewport: Viewport) {
        self.celebration.resize(viewport);
    }

    /// Matches the overlay to the current window size.
    pub fn fit_overlay(&self) {
        self.celebration.fit_to_surface();
    }

    pub fn column_cards(&self, column: ColumnId) -> Vec<CardView> {
        self.cards.column_cards(column)
    }

    pub fn card(&self, id: &TaskId) -> Option<CardView> {
        self.cards.card(id)
    }

    pub fn card_count(&self, column: ColumnId) -> usize {
        self.cards.card_count(column)
    }

    pub fn empty_state_visible(&self, column: ColumnId) -> bool {
        self.cards.empty_state_visible(column)
    }

    pub fn is_highlighted(&self, column: ColumnId) -> bool {
        self.drag.borrow().is_highlighted(column)
    }

    pub fn task_count(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn task_column(&self, id: &TaskId) -> Option<ColumnId> {
        self.store.borrow().get(id).map(|task| task.column)
    }

    pub fn celebration(&self) -> &CelebrationEngine {
        &self.celebration
    }
}
