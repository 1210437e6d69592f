use leptos::html::Canvas;
use leptos::prelude::*;

/// Full-viewport canvas the confetti is drawn on. Hidden until a run starts.
#[component]
pub fn ConfettiOverlay(canvas_ref: NodeRef<Canvas>) -> impl IntoView {
    view! {
        <canvas
            id="confetti-canvas"
            class="confetti-canvas"
            node_ref=canvas_ref
            style="display: none;"
        ></canvas>
    }
}
