pub mod components;
pub mod engine;
pub mod particle;
pub mod surface;

pub use components::ConfettiOverlay;
pub use engine::CelebrationEngine;
pub use particle::{Particle, Shape, Viewport};
pub use surface::{CanvasSurface, OverlaySurface};
