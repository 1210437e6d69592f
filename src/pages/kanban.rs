use leptos::ev;
use leptos::prelude::*;

use crate::config::BoardConfig;
use crate::core::models::ColumnId;
use crate::features::celebration::ConfettiOverlay;
use crate::features::kanban::components::{KanbanColumn, KanbanHeader};
use crate::features::kanban::hooks::use_board;

#[component]
pub fn Kanban() -> impl IntoView {
    let config = use_context::<BoardConfig>().unwrap_or_default();
    let handle = use_board(&config);

    // Size the overlay once the canvas is in the document, then on every
    // window resize
    Effect::new(move |_| {
        if handle.canvas_ref.get().is_some() {
            handle.board().fit_overlay();
        }
    });
    let resize = window_event_listener(ev::resize, move |_| handle.board().fit_overlay());
    on_cleanup(move || resize.remove());

    view! {
        <div class="kanban-container">
            <KanbanHeader handle=handle />
            <div class="kanban-board">
                {ColumnId::all()
                    .into_iter()
                    .map(|column| view! { <KanbanColumn column=column handle=handle /> })
                    .collect::<Vec<_>>()}
            </div>
            <ConfettiOverlay canvas_ref=handle.canvas_ref />
        </div>
    }
}
