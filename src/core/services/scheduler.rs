use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Deferred work on the UI thread: one-shot delays, repeating intervals and
/// per-frame callbacks.
pub trait Scheduler {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;
    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle;
    fn next_frame(&self, callback: Box<dyn FnOnce()>);
}

/// A pending timer as seen by its owner.
pub trait Timer {
    fn cancel(self: Box<Self>);
    /// Stop owning the timer and let it run its course.
    fn detach(self: Box<Self>);
}

/// Owned timer. Dropping the handle cancels the timer; call
/// [`TimerHandle::detach`] for fire-and-forget work.
pub struct TimerHandle {
    timer: Option<Box<dyn Timer>>,
}

impl TimerHandle {
    pub fn new(timer: impl Timer + 'static) -> Self {
        Self {
            timer: Some(Box::new(timer)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn detach(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.detach();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl Timer for Timeout {
    fn cancel(self: Box<Self>) {
        let _ = (*self).cancel();
    }

    fn detach(self: Box<Self>) {
        let _ = (*self).forget();
    }
}

impl Timer for Interval {
    fn cancel(self: Box<Self>) {
        let _ = (*self).cancel();
    }

    fn detach(self: Box<Self>) {
        let _ = (*self).forget();
    }
}

/// `setTimeout`/`setInterval` through gloo, frames through
/// `requestAnimationFrame`.
#[derive(Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(Timeout::new(delay_ms, callback))
    }

    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        TimerHandle::new(Interval::new(period_ms, callback))
    }

    fn next_frame(&self, callback: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window to schedule an animation frame on");
            return;
        };
        let frame = Closure::once_into_js(move |_timestamp: f64| callback());
        if let Err(e) = window.request_animation_frame(frame.unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }
}
