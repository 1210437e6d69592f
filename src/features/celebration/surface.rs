use std::f64::consts::PI;

use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::particle::{Particle, Shape, Viewport};

const FADE_TINT: &str = "rgba(245, 247, 250, 0.1)";

/// Full-viewport drawing surface the celebration renders onto.
pub trait OverlaySurface {
    /// Current size of the browser viewport.
    fn viewport(&self) -> Viewport;
    fn show(&self);
    fn hide(&self);
    fn resize(&self, viewport: Viewport);
    fn clear(&self);
    fn draw(&self, particles: &[Particle]);
    /// Low-opacity tint over the whole surface.
    fn wash(&self);
}

/// The `<canvas>` overlay. Missing canvas or context turns every call into
/// a no-op.
#[derive(Clone, Copy)]
pub struct CanvasSurface {
    canvas: NodeRef<Canvas>,
}

impl CanvasSurface {
    pub fn new(canvas: NodeRef<Canvas>) -> Self {
        Self { canvas }
    }

    fn element(&self) -> Option<HtmlCanvasElement> {
        self.canvas.get_untracked()
    }

    fn context(&self) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas = self.element()?;
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some((canvas, context))
    }

    fn set_display(&self, value: &str) {
        if let Some(canvas) = self.element() {
            let style = web_sys::HtmlElement::style(&canvas);
            if let Err(e) = style.set_property("display", value) {
                log::error!("Failed to set overlay display: {:?}", e);
            }
        }
    }
}

impl OverlaySurface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::new(0.0, 0.0);
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(width, height)
    }

    fn show(&self) {
        self.set_display("block");
    }

    fn hide(&self) {
        self.set_display("none");
    }

    fn resize(&self, viewport: Viewport) {
        if let Some(canvas) = self.element() {
            canvas.set_width(viewport.width as u32);
            canvas.set_height(viewport.height as u32);
        }
    }

    fn clear(&self) {
        if let Some((canvas, ctx)) = self.context() {
            ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }

    fn draw(&self, particles: &[Particle]) {
        let Some((_, ctx)) = self.context() else {
            return;
        };
        for p in particles {
            let half = p.size / 2.0;
            ctx.save();
            if let Err(e) = draw_particle(&ctx, p, half) {
                log::debug!("Skipped a confetti particle: {:?}", e);
            }
            ctx.restore();
        }
    }

    fn wash(&self) {
        if let Some((canvas, ctx)) = self.context() {
            ctx.set_fill_style_str(FADE_TINT);
            ctx.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }
}

fn draw_particle(
    ctx: &CanvasRenderingContext2d,
    p: &Particle,
    half: f64,
) -> Result<(), wasm_bindgen::JsValue> {
    ctx.translate(p.x + half, p.y + half)?;
    ctx.rotate(p.angle * PI / 180.0)?;
    ctx.set_fill_style_str(&p.color);
    match p.shape {
        Shape::Rect => ctx.fill_rect(-half, -half, p.size, p.size),
        Shape::Circle => {
            ctx.begin_path();
            ctx.arc(0.0, 0.0, half, 0.0, PI * 2.0)?;
            ctx.fill();
        }
    }
    Ok(())
}
