use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;

use crate::config::BoardConfig;
use crate::core::services::{open_browser_storage, BrowserScheduler, JsRandom};
use crate::features::celebration::CanvasSurface;
use crate::features::kanban::services::{BoardServices, KanbanBoard};

/// Copyable handle the board's components share.
///
/// The board itself lives in a local stored value since it holds `Rc`
/// state; `revision` ticks on every change so views can track it.
#[derive(Clone, Copy)]
pub struct BoardHandle {
    board: StoredValue<KanbanBoard, LocalStorage>,
    pub revision: RwSignal<u64>,
    pub canvas_ref: NodeRef<Canvas>,
}

impl BoardHandle {
    /// Untracked access for event handlers.
    pub fn board(&self) -> KanbanBoard {
        self.board.get_value()
    }

    /// Tracked read; the calling view re-runs after the next change.
    pub fn read<T>(&self, f: impl FnOnce(&KanbanBoard) -> T) -> T {
        self.revision.track();
        self.board.with_value(f)
    }
}

pub fn use_board(config: &BoardConfig) -> BoardHandle {
    let revision = RwSignal::new(0u64);
    let canvas_ref = NodeRef::<Canvas>::new();

    let board = KanbanBoard::new(
        config,
        BoardServices {
            storage: open_browser_storage(),
            scheduler: Rc::new(BrowserScheduler),
            surface: Rc::new(CanvasSurface::new(canvas_ref)),
            rng: Box::new(JsRandom),
            notify: Rc::new(move || revision.update(|r| *r = r.wrapping_add(1))),
        },
    );

    // Load tasks on mount
    match board.reload() {
        Ok(()) => log::info!("Loaded {} tasks", board.task_count()),
        Err(e) => log::error!("Failed to load tasks: {}", e),
    }

    BoardHandle {
        board: StoredValue::new_local(board),
        revision,
        canvas_ref,
    }
}
