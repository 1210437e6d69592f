use crate::core::services::RandomSource;

const FALL_SCALE: f64 = 5.0;
const DRIFT_FREQUENCY: f64 = 0.05;
const DRIFT_AMPLITUDE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rect,
    Circle,
}

/// One piece of confetti.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Fall speed factor, 0.1..0.5.
    pub weight: f64,
    /// Degrees.
    pub angle: f64,
    /// Degrees per frame.
    pub rotation_speed: f64,
    pub color: String,
    pub shape: Shape,
}

impl Particle {
    /// Somewhere within one viewport height above the top edge.
    pub fn spawn(viewport: Viewport, palette: &[String], rng: &mut dyn RandomSource) -> Self {
        let x = rng.next_f64() * viewport.width;
        let y = rng.next_f64() * viewport.height - viewport.height;
        let size = rng.range(5.0, 10.0);
        let weight = rng.range(0.1, 0.4);
        let angle = rng.next_f64() * 360.0;
        let rotation_speed = rng.range(-2.0, 4.0);
        let color = palette[rng.index(palette.len())].clone();
        let shape = if rng.next_f64() > 0.5 {
            Shape::Rect
        } else {
            Shape::Circle
        };
        Self {
            x,
            y,
            size,
            weight,
            angle,
            rotation_speed,
            color,
            shape,
        }
    }

    /// Motion for `dt` frames: linear fall, sinusoidal drift, spin.
    pub fn advance(&self, dt: f64) -> Self {
        let y = self.y + self.weight * FALL_SCALE * dt;
        let x = self.x + (y * DRIFT_FREQUENCY).sin() * DRIFT_AMPLITUDE * dt;
        Self {
            x,
            y,
            angle: self.angle + self.rotation_speed * dt,
            ..self.clone()
        }
    }

    pub fn is_below(&self, viewport: Viewport) -> bool {
        self.y > viewport.height
    }

    /// Puts a particle that fell past the bottom edge back above the top.
    pub fn wrapped(self, viewport: Viewport, rng: &mut dyn RandomSource) -> Self {
        if !self.is_below(viewport) {
            return self;
        }
        Self {
            y: -self.size,
            x: rng.next_f64() * viewport.width,
            ..self
        }
    }

    pub fn step(&self, viewport: Viewport, dt: f64, rng: &mut dyn RandomSource) -> Self {
        self.advance(dt).wrapped(viewport, rng)
    }
}

/// Every particle has fallen past the bottom edge.
pub fn all_settled(particles: &[Particle], viewport: Viewport) -> bool {
    particles.iter().all(|p| p.is_below(viewport))
}
