use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::core::models::{ColumnId, Task, TaskId};
use crate::core::services::Scheduler;

/// What a card looks like right now.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: TaskId,
    pub text: String,
    /// Short entrance highlight (`new-task`).
    pub entering: bool,
    /// Marked as the card in motion (`dragging`).
    pub dragging: bool,
}

/// Handle to a rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardHandle {
    pub id: TaskId,
    pub column: ColumnId,
}

#[derive(Default)]
struct ColumnCards {
    cards: Vec<CardView>,
    empty_state_visible: bool,
}

#[derive(Default)]
struct CardLayout {
    columns: BTreeMap<ColumnId, ColumnCards>,
}

impl CardLayout {
    fn new() -> Self {
        let columns = ColumnId::all()
            .into_iter()
            .map(|column| {
                let cards = ColumnCards {
                    cards: Vec::new(),
                    empty_state_visible: true,
                };
                (column, cards)
            })
            .collect();
        Self { columns }
    }

    fn column_mut(&mut self, column: ColumnId) -> &mut ColumnCards {
        self.columns.entry(column).or_default()
    }

    fn card_mut(&mut self, id: &TaskId) -> Option<&mut CardView> {
        self.columns
            .values_mut()
            .flat_map(|c| c.cards.iter_mut())
            .find(|card| &card.id == id)
    }

    fn card(&self, id: &TaskId) -> Option<&CardView> {
        self.columns
            .values()
            .flat_map(|c| c.cards.iter())
            .find(|card| &card.id == id)
    }

    fn column_of(&self, id: &TaskId) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|(_, c)| c.cards.iter().any(|card| &card.id == id))
            .map(|(column, _)| *column)
    }
}

/// Visual cards per column. Each mutation calls `notify` so the view can
/// re-read the layout.
#[derive(Clone)]
pub struct CardRenderer {
    layout: Rc<RefCell<CardLayout>>,
    scheduler: Rc<dyn Scheduler>,
    notify: Rc<dyn Fn()>,
    entrance_ms: u32,
}

impl CardRenderer {
    pub fn new(scheduler: Rc<dyn Scheduler>, notify: Rc<dyn Fn()>, entrance_ms: u32) -> Self {
        Self {
            layout: Rc::new(RefCell::new(CardLayout::new())),
            scheduler,
            notify,
            entrance_ms,
        }
    }

    /// Appends a card for `task` to its column with the entrance highlight.
    pub fn render_card(&self, task: &Task) -> CardHandle {
        {
            let mut layout = self.layout.borrow_mut();
            layout.column_mut(task.column).cards.push(CardView {
                id: task.id.clone(),
                text: task.text.clone(),
                entering: true,
                dragging: false,
            });
        }
        self.schedule_entrance_clear(&task.id);
        (self.notify)();

        CardHandle {
            id: task.id.clone(),
            column: task.column,
        }
    }

    /// Replays the entrance highlight on an existing card.
    pub fn flash(&self, id: &TaskId) {
        let found = match self.layout.borrow_mut().card_mut(id) {
            Some(card) => {
                card.entering = true;
                true
            }
            None => false,
        };
        if found {
            self.schedule_entrance_clear(id);
            (self.notify)();
        }
    }

    fn schedule_entrance_clear(&self, id: &TaskId) {
        let layout = self.layout.clone();
        let notify = self.notify.clone();
        let id = id.clone();
        self.scheduler
            .after(
                self.entrance_ms,
                Box::new(move || {
                    if let Some(card) = layout.borrow_mut().card_mut(&id) {
                        card.entering = false;
                    }
                    notify();
                }),
            )
            .detach();
    }

    /// Drops every card of `column`; the task store is left alone.
    pub fn clear_column(&self, column: ColumnId) {
        self.layout.borrow_mut().column_mut(column).cards.clear();
        (self.notify)();
    }

    pub fn refresh_empty_state(&self, column: ColumnId) {
        {
            let mut layout = self.layout.borrow_mut();
            let cards = layout.column_mut(column);
            cards.empty_state_visible = cards.cards.is_empty();
        }
        (self.notify)();
    }

    /// Moves the card to the end of `target`; returns the column it left.
    pub fn move_card(&self, id: &TaskId, target: ColumnId) -> Option<ColumnId> {
        let source = {
            let mut layout = self.layout.borrow_mut();
            let source = layout.column_of(id)?;
            let cards = &mut layout.column_mut(source).cards;
            let index = cards.iter().position(|card| &card.id == id)?;
            let card = cards.remove(index);
            layout.column_mut(target).cards.push(card);
            source
        };
        (self.notify)();
        Some(source)
    }

    pub fn set_dragging(&self, id: &TaskId, dragging: bool) {
        let changed = match self.layout.borrow_mut().card_mut(id) {
            Some(card) if card.dragging != dragging => {
                card.dragging = dragging;
                true
            }
            _ => false,
        };
        if changed {
            (self.notify)();
        }
    }

    /// Removes the `dragging` mark from every card.
    pub fn clear_drag_marks(&self) {
        let mut changed = false;
        for card in self
            .layout
            .borrow_mut()
            .columns
            .values_mut()
            .flat_map(|c| c.cards.iter_mut())
        {
            changed |= card.dragging;
            card.dragging = false;
        }
        if changed {
            (self.notify)();
        }
    }

    pub fn column_cards(&self, column: ColumnId) -> Vec<CardView> {
        self.layout
            .borrow()
            .columns
            .get(&column)
            .map(|c| c.cards.clone())
            .unwrap_or_default()
    }

    pub fn card_count(&self, column: ColumnId) -> usize {
        self.layout
            .borrow()
            .columns
            .get(&column)
            .map_or(0, |c| c.cards.len())
    }

    pub fn empty_state_visible(&self, column: ColumnId) -> bool {
        self.layout
            .borrow()
            .columns
            .get(&column)
            .map_or(true, |c| c.empty_state_visible)
    }

    pub fn card(&self, id: &TaskId) -> Option<CardView> {
        self.layout.borrow().card(id).cloned()
    }
}
