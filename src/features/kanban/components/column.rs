use leptos::prelude::*;
use web_sys::DragEvent;

use crate::core::models::ColumnId;
use crate::features::kanban::components::TaskCard;
use crate::features::kanban::hooks::BoardHandle;
use crate::features::kanban::services::{CardView, DropOutcome};

#[component]
pub fn KanbanColumn(column: ColumnId, handle: BoardHandle) -> impl IntoView {
    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if handle.board().drag_over(column) {
            if let Some(data) = ev.data_transfer() {
                data.set_drop_effect("move");
            }
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        match handle.board().drop_on(column) {
            Ok(DropOutcome::Moved { task_id, from, to, .. }) => {
                log::debug!("Moved task {} from {} to {}", task_id, from, to);
            }
            Ok(DropOutcome::NothingDragged) => {}
            Err(e) => log::error!("Failed to move task: {}", e),
        }
    };

    view! {
        <div
            class="kanban-column"
            class:drag-over=move || handle.read(|b| b.is_highlighted(column))
            on:dragover=on_dragover
            on:dragleave=move |_| handle.board().drag_leave(column)
            on:drop=on_drop
        >
            <div class="column-header">
                <h3>{column.as_str()}</h3>
                <span class="task-count">
                    {move || handle.read(|b| b.card_count(column))}
                </span>
            </div>
            <div class="column-content" id=column.key()>
                <div
                    class="empty-state"
                    style:display=move || {
                        if handle.read(|b| b.empty_state_visible(column)) { "block" } else { "none" }
                    }
                >
                    {column.empty_message()}
                </div>
                <For
                    each=move || handle.read(|b| b.column_cards(column))
                    key=|card: &CardView| card.id.clone()
                    children=move |card: CardView| {
                        view! { <TaskCard id=card.id text=card.text handle=handle /> }
                    }
                />
            </div>
        </div>
    }
}
