use leptos::prelude::*;
use web_sys::KeyboardEvent;

use crate::error::BoardError;
use crate::features::kanban::hooks::BoardHandle;

const EMPTY_TASK_MESSAGE: &str = "Please enter a task.";

#[component]
pub fn KanbanHeader(handle: BoardHandle) -> impl IntoView {
    let (draft, set_draft) = signal(String::new());
    let (show_error, set_show_error) = signal(false);

    // Input is kept as typed when the task is rejected
    let submit = move || {
        let text = draft.get_untracked();
        match handle.board().add_task(&text) {
            Ok(id) => {
                log::debug!("Added task {}", id);
                set_draft.set(String::new());
                set_show_error.set(false);
            }
            Err(BoardError::EmptyTask) => set_show_error.set(true),
            Err(e) => log::error!("Failed to add task: {}", e),
        }
    };

    view! {
        <header class="kanban-header">
            <h1>"Kanban Board"</h1>
            <div class="add-task">
                <input
                    type="text"
                    id="new-task-input"
                    placeholder="Enter a new task..."
                    prop:value=draft
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:keypress=move |ev: KeyboardEvent| {
                        if ev.key() == "Enter" {
                            submit();
                        }
                    }
                />
                <button id="add-task-button" class="btn-primary" on:click=move |_| submit()>
                    "Add Task"
                </button>
            </div>
            <p id="task-error" class="task-error" class:hidden=move || !show_error.get()>
                {EMPTY_TASK_MESSAGE}
            </p>
        </header>
    }
}
