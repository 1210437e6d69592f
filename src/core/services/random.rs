/// Uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform float in `[low, low + span)`.
    fn range(&mut self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }

    /// Uniform index below `len`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// `Math.random()`.
#[derive(Clone, Copy, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}
