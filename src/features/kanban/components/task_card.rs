use leptos::prelude::*;
use web_sys::DragEvent;

use crate::core::models::TaskId;
use crate::features::kanban::hooks::BoardHandle;

// One draggable card; its highlight classes follow the board state
#[component]
pub fn TaskCard(id: TaskId, text: String, handle: BoardHandle) -> impl IntoView {
    let entering = {
        let id = id.clone();
        move || handle.read(|b| b.card(&id).is_some_and(|card| card.entering))
    };
    let dragging = {
        let id = id.clone();
        move || handle.read(|b| b.card(&id).is_some_and(|card| card.dragging))
    };

    let on_dragstart = {
        let id = id.clone();
        move |ev: DragEvent| {
            if let Some(data) = ev.data_transfer() {
                if let Err(e) = data.set_data("text/plain", id.as_str()) {
                    log::warn!("Could not attach drag data: {:?}", e);
                }
                data.set_effect_allowed("move");
            }
            handle.board().drag_start(id.clone());
        }
    };

    view! {
        <div
            class="task-card"
            class:new-task=entering
            class:dragging=dragging
            draggable="true"
            data-task-id=id.to_string()
            on:dragstart=on_dragstart
            on:dragend=move |_| handle.board().drag_end()
        >
            {text}
        </div>
    }
}
