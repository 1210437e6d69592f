//! Deterministic stand-ins for browser timers and randomness.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::random::RandomSource;
use super::scheduler::{Scheduler, Timer, TimerHandle};

/// Length of one simulated display frame.
pub const FRAME_MS: u64 = 16;

enum Callback {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>),
}

struct PendingTimer {
    due: u64,
    period: Option<u64>,
    seq: u64,
    callback: Callback,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct Clock {
    now: u64,
    seq: u64,
    timers: Vec<PendingTimer>,
    frames: Vec<Box<dyn FnOnce()>>,
}

struct ManualTimer {
    cancelled: Rc<Cell<bool>>,
}

impl Timer for ManualTimer {
    fn cancel(self: Box<Self>) {
        self.cancelled.set(true);
    }

    fn detach(self: Box<Self>) {}
}

/// Virtual clock. Nothing runs until [`ManualScheduler::advance`]; frames
/// fire on every multiple of [`FRAME_MS`], timers at their exact due time.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.clock.borrow().now
    }

    pub fn pending_frames(&self) -> usize {
        self.clock.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.clock
            .borrow()
            .timers
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    fn push_timer(&self, delay: u64, period: Option<u64>, callback: Callback) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut clock = self.clock.borrow_mut();
        clock.seq += 1;
        let timer = PendingTimer {
            due: clock.now + delay,
            period,
            seq: clock.seq,
            callback,
            cancelled: cancelled.clone(),
        };
        clock.timers.push(timer);
        TimerHandle::new(ManualTimer { cancelled })
    }

    fn take_due_timer(&self, now: u64) -> Option<PendingTimer> {
        let mut clock = self.clock.borrow_mut();
        clock.timers.retain(|t| !t.cancelled.get());
        let index = clock
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        Some(clock.timers.remove(index))
    }

    fn next_timer_due(&self) -> Option<u64> {
        self.clock
            .borrow()
            .timers
            .iter()
            .filter(|t| !t.cancelled.get())
            .map(|t| t.due)
            .min()
    }

    /// Moves the clock forward by `ms`, running frames and timers in order.
    /// Callbacks run with no internal borrow held, so they may schedule more.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let now = self.now();
            let next_frame_tick = (now / FRAME_MS + 1) * FRAME_MS;
            let mut next = next_frame_tick.min(target);
            if let Some(due) = self.next_timer_due() {
                next = next.min(due.max(now));
            }
            self.clock.borrow_mut().now = next;

            if next == next_frame_tick {
                let frames = std::mem::take(&mut self.clock.borrow_mut().frames);
                for frame in frames {
                    frame();
                }
            }

            while let Some(timer) = self.take_due_timer(next) {
                match timer.callback {
                    Callback::Once(callback) => callback(),
                    Callback::Repeat(mut callback) => {
                        callback();
                        if !timer.cancelled.get() {
                            let mut clock = self.clock.borrow_mut();
                            clock.seq += 1;
                            let seq = clock.seq;
                            clock.timers.push(PendingTimer {
                                due: timer.due + timer.period.unwrap_or(FRAME_MS).max(1),
                                seq,
                                callback: Callback::Repeat(callback),
                                ..timer
                            });
                        }
                    }
                }
            }

            if next >= target {
                break;
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        self.push_timer(delay_ms as u64, None, Callback::Once(callback))
    }

    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        self.push_timer(period_ms as u64, Some(period_ms as u64), Callback::Repeat(callback))
    }

    fn next_frame(&self, callback: Box<dyn FnOnce()>) {
        self.clock.borrow_mut().frames.push(callback);
    }
}

/// xorshift64*; good enough for reproducible test runs.
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        let bits = self.state.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (bits >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed sequence, cycling when exhausted.
pub struct ScriptedRandom {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_at_due_time() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(0u64));
        let seen = fired.clone();
        let clock = scheduler.clone();
        scheduler
            .after(500, Box::new(move || seen.set(clock.now())))
            .detach();

        scheduler.advance(499);
        assert_eq!(fired.get(), 0);
        scheduler.advance(1);
        assert_eq!(fired.get(), 500);
    }

    #[test]
    fn dropping_handle_cancels() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let seen = fired.clone();
        drop(scheduler.after(10, Box::new(move || seen.set(true))));
        scheduler.advance(100);
        assert!(!fired.get());
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let scheduler = ManualScheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let seen = ticks.clone();
        let handle = scheduler.every(50, Box::new(move || seen.set(seen.get() + 1)));
        scheduler.advance(200);
        assert_eq!(ticks.get(), 4);
        handle.cancel();
        scheduler.advance(200);
        assert_eq!(ticks.get(), 4);
    }

    #[test]
    fn frames_run_once_per_tick() {
        let scheduler = ManualScheduler::new();
        let runs = Rc::new(Cell::new(0));
        let seen = runs.clone();
        scheduler.next_frame(Box::new(move || seen.set(seen.get() + 1)));
        scheduler.advance(FRAME_MS * 3);
        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn seeded_random_stays_in_unit_range() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
        assert!(rng.index(15) < 15);
    }
}
