//! Time-bounded confetti run.
//!
//! A run shows the overlay, spawns the particles and animates them one step
//! per display frame. After `duration_ms` the run goes inactive and a fade
//! loop washes the overlay until every particle has left the screen; a hard
//! stop at `duration_ms + safety_margin_ms` hides the overlay regardless.
//!
//! Each run owns its timers. Starting a new run cancels the previous run's
//! fade and hard stop, and frame callbacks from an older run exit on their
//! own because the run counter moved on.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CelebrationConfig;
use crate::core::services::{RandomSource, Scheduler, TimerHandle};

use super::particle::{all_settled, Particle, Viewport};
use super::surface::OverlaySurface;

/// Frames advanced per animation callback.
const FRAME_STEP: f64 = 1.0;

#[derive(Default)]
struct RunTimers {
    duration: Option<TimerHandle>,
    fade: Option<TimerHandle>,
    safety: Option<TimerHandle>,
}

struct EngineState {
    run: u64,
    active: bool,
    visible: bool,
    viewport: Viewport,
    particles: Vec<Particle>,
    timers: RunTimers,
    rng: Box<dyn RandomSource>,
}

#[derive(Clone)]
pub struct CelebrationEngine {
    state: Rc<RefCell<EngineState>>,
    config: Rc<CelebrationConfig>,
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn OverlaySurface>,
}

impl CelebrationEngine {
    pub fn new(
        config: CelebrationConfig,
        scheduler: Rc<dyn Scheduler>,
        surface: Rc<dyn OverlaySurface>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let state = EngineState {
            run: 0,
            active: false,
            visible: false,
            viewport: surface.viewport(),
            particles: Vec::new(),
            timers: RunTimers::default(),
            rng,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            config: Rc::new(config),
            scheduler,
            surface,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn particle_count(&self) -> usize {
        self.state.borrow().particles.len()
    }

    pub fn particles(&self) -> Vec<Particle> {
        self.state.borrow().particles.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    /// Starts a run unless one is already active. Returns whether it started.
    pub fn trigger(&self) -> bool {
        let viewport = self.surface.viewport();
        let run = {
            let mut state = self.state.borrow_mut();
            if state.active {
                log::debug!("Celebration already running, ignoring trigger");
                return false;
            }
            // Drops the previous run's pending fade and hard stop.
            state.timers = RunTimers::default();
            state.run += 1;
            state.active = true;
            state.visible = true;
            state.viewport = viewport;

            let EngineState { particles, rng, .. } = &mut *state;
            *particles = (0..self.config.particle_count)
                .map(|_| Particle::spawn(viewport, &self.config.palette, rng.as_mut()))
                .collect();
            state.run
        };

        self.surface.show();
        self.surface.resize(viewport);

        let duration = {
            let engine = self.clone();
            self.scheduler.after(
                self.config.duration_ms,
                Box::new(move || engine.finish_active(run)),
            )
        };
        let safety = {
            let engine = self.clone();
            self.scheduler.after(
                self.config.safety_timeout_ms(),
                Box::new(move || engine.force_hide(run)),
            )
        };
        {
            let mut state = self.state.borrow_mut();
            state.timers.duration = Some(duration);
            state.timers.safety = Some(safety);
        }

        log::info!("Celebration run {} started", run);
        self.schedule_frame(run);
        true
    }

    /// Resizes the overlay; particle positions are left as they are.
    pub fn resize(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
        self.surface.resize(viewport);
    }

    /// Resizes the overlay to whatever the surface reports as the viewport.
    pub fn fit_to_surface(&self) {
        self.resize(self.surface.viewport());
    }

    fn schedule_frame(&self, run: u64) {
        let engine = self.clone();
        self.scheduler.next_frame(Box::new(move || engine.frame(run)));
    }

    fn frame(&self, run: u64) {
        let mut state = self.state.borrow_mut();
        if state.run != run || !state.visible {
            return;
        }
        let viewport = state.viewport;
        if !state.active && all_settled(&state.particles, viewport) {
            self.surface.clear();
            return;
        }

        let EngineState { particles, rng, .. } = &mut *state;
        for particle in particles.iter_mut() {
            *particle = particle.step(viewport, FRAME_STEP, rng.as_mut());
        }
        self.surface.clear();
        self.surface.draw(particles);
        drop(state);

        self.schedule_frame(run);
    }

    fn finish_active(&self, run: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.run != run {
                return;
            }
            state.active = false;
            state.timers.duration = None;
        }

        let engine = self.clone();
        let fade = self.scheduler.every(
            self.config.fade_interval_ms,
            Box::new(move || engine.fade_tick(run)),
        );
        let mut state = self.state.borrow_mut();
        if state.run == run && state.visible {
            state.timers.fade = Some(fade);
        }
    }

    fn fade_tick(&self, run: u64) {
        let settled = {
            let state = self.state.borrow();
            if state.run != run {
                return;
            }
            !state.active && all_settled(&state.particles, state.viewport)
        };
        self.surface.wash();
        if settled {
            log::debug!("Celebration run {} settled", run);
            self.hide(run);
        }
    }

    fn force_hide(&self, run: u64) {
        if self.state.borrow().run == run {
            log::debug!("Celebration run {} hit its hard stop", run);
            self.hide(run);
        }
    }

    fn hide(&self, run: u64) {
        let timers = {
            let mut state = self.state.borrow_mut();
            if state.run != run {
                return;
            }
            state.active = false;
            state.visible = false;
            std::mem::take(&mut state.timers)
        };
        // Cancels outside the borrow; a timer may be the caller itself.
        drop(timers);
        self.surface.clear();
        self.surface.hide();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::services::testing::{ManualScheduler, SeededRandom, FRAME_MS};
    use std::cell::Cell;

    /// Records what the engine asked of the overlay.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub viewport: Cell<(f64, f64)>,
        pub visible: Cell<bool>,
        pub size: Cell<(f64, f64)>,
        pub draws: Cell<usize>,
        pub washes: Cell<usize>,
    }

    impl RecordingSurface {
        pub(crate) fn new(width: f64, height: f64) -> Self {
            let surface = Self::default();
            surface.viewport.set((width, height));
            surface
        }
    }

    impl OverlaySurface for RecordingSurface {
        fn viewport(&self) -> Viewport {
            let (w, h) = self.viewport.get();
            Viewport::new(w, h)
        }
        fn show(&self) {
            self.visible.set(true);
        }
        fn hide(&self) {
            self.visible.set(false);
        }
        fn resize(&self, viewport: Viewport) {
            self.size.set((viewport.width, viewport.height));
        }
        fn clear(&self) {}
        fn draw(&self, _particles: &[Particle]) {
            self.draws.set(self.draws.get() + 1);
        }
        fn wash(&self) {
            self.washes.set(self.washes.get() + 1);
        }
    }

    fn engine() -> (CelebrationEngine, ManualScheduler, Rc<RecordingSurface>) {
        let scheduler = ManualScheduler::new();
        let surface = Rc::new(RecordingSurface::new(800.0, 600.0));
        let engine = CelebrationEngine::new(
            CelebrationConfig::default(),
            Rc::new(scheduler.clone()),
            surface.clone(),
            Box::new(SeededRandom::new(1)),
        );
        (engine, scheduler, surface)
    }

    #[test]
    fn trigger_spawns_full_run() {
        let (engine, _, surface) = engine();

        assert!(engine.trigger());

        assert_eq!(engine.particle_count(), 150);
        assert!(engine.is_active());
        assert!(engine.is_visible());
        assert!(surface.visible.get());
        assert_eq!(surface.size.get(), (800.0, 600.0));
    }

    #[test]
    fn retrigger_while_active_is_ignored() {
        let (engine, scheduler, _) = engine();
        engine.trigger();
        scheduler.advance(FRAME_MS * 10);
        let before = engine.particles();

        assert!(!engine.trigger());
        assert_eq!(engine.particles(), before);
    }

    #[test]
    fn frames_animate_particles() {
        let (engine, scheduler, surface) = engine();
        engine.trigger();
        let start = engine.particles();

        scheduler.advance(FRAME_MS * 5);

        assert_eq!(surface.draws.get(), 5);
        assert_ne!(engine.particles(), start);
    }

    #[test]
    fn goes_inactive_after_duration_and_fades() {
        let (engine, scheduler, surface) = engine();
        engine.trigger();

        scheduler.advance(2999);
        assert!(engine.is_active());
        scheduler.advance(1);
        assert!(!engine.is_active());
        assert!(engine.is_visible());

        scheduler.advance(200);
        assert_eq!(surface.washes.get(), 4);
        assert!(engine.is_visible());
    }

    #[test]
    fn overlay_hidden_by_hard_stop() {
        let (engine, scheduler, surface) = engine();
        engine.trigger();

        scheduler.advance(3999);
        assert!(surface.visible.get());
        scheduler.advance(1);

        assert!(!engine.is_visible());
        assert!(!surface.visible.get());
        assert_eq!(scheduler.pending_timers(), 0);

        let washes = surface.washes.get();
        let draws = surface.draws.get();
        scheduler.advance(1000);
        assert_eq!(surface.washes.get(), washes);
        assert_eq!(surface.draws.get(), draws);
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn fade_hides_once_particles_have_settled() {
        let (engine, scheduler, surface) = engine();
        engine.trigger();
        scheduler.advance(3000);

        // Every particle below the bottom edge before the next frame runs.
        engine.state.borrow_mut().particles.iter_mut().for_each(|p| p.y = 10_000.0);
        scheduler.advance(50);

        assert!(!engine.is_visible());
        assert!(!surface.visible.get());
        assert!(scheduler.now() < 4000);
    }

    #[test]
    fn wrap_keeps_particles_cycling_after_inactive() {
        let (engine, scheduler, _) = engine();
        engine.trigger();
        scheduler.advance(3500);

        assert!(!engine.is_active());
        let viewport = engine.viewport();
        assert!(engine.particles().iter().all(|p| p.y <= viewport.height));
    }

    #[test]
    fn new_run_owns_its_timers() {
        let (engine, scheduler, surface) = engine();
        engine.trigger();
        scheduler.advance(3500);
        assert!(!engine.is_active());

        // Second run starts while the first is still fading.
        assert!(engine.trigger());
        scheduler.advance(600);
        assert!(engine.is_visible());
        assert!(surface.visible.get());
        assert!(engine.is_active());

        scheduler.advance(3400);
        assert!(!engine.is_visible());
    }

    #[test]
    fn resize_keeps_particles() {
        let (engine, _, surface) = engine();
        engine.trigger();
        let before = engine.particles();

        engine.resize(Viewport::new(1024.0, 768.0));

        assert_eq!(engine.particles(), before);
        assert_eq!(surface.size.get(), (1024.0, 768.0));
        assert_eq!(engine.viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn fit_to_surface_follows_viewport() {
        let (engine, _, surface) = engine();
        surface.viewport.set((1280.0, 720.0));

        engine.fit_to_surface();

        assert_eq!(surface.size.get(), (1280.0, 720.0));
        assert_eq!(engine.viewport(), Viewport::new(1280.0, 720.0));
    }

    #[test]
    fn can_run_again_after_hiding() {
        let (engine, scheduler, _) = engine();
        engine.trigger();
        scheduler.advance(4000);
        assert!(!engine.is_visible());

        assert!(engine.trigger());
        assert_eq!(engine.particle_count(), 150);
    }
}
