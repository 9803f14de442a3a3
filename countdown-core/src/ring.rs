//! Circular progress geometry for an SVG ring in a 100x100 viewBox.

use std::f64::consts::PI;

use crate::constants::RING_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRing {
    value: u64,
    max: u32,
}

impl ProgressRing {
    #[must_use]
    pub const fn new(value: u64, max: u32) -> Self {
        Self { value, max }
    }

    #[must_use]
    pub fn circumference() -> f64 {
        2.0 * PI * RING_RADIUS
    }

    /// `value / max` clamped to `[0, 1]`; a zero `max` draws nothing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (self.value as f64 / f64::from(self.max)).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// `stroke-dashoffset` leaving `fraction` of the ring drawn.
    #[must_use]
    pub fn dash_offset(&self) -> f64 {
        let circumference = Self::circumference();
        circumference - circumference * self.fraction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn full_and_empty_rings() {
        let full = ProgressRing::new(60, 60);
        assert!(close(full.dash_offset(), 0.0));
        let empty = ProgressRing::new(0, 60);
        assert!(close(empty.dash_offset(), ProgressRing::circumference()));
    }

    #[test]
    fn quarter_hours() {
        let ring = ProgressRing::new(6, 24);
        assert!(close(ring.fraction(), 0.25));
        assert!(close(ring.percent(), 25.0));
        assert!(close(
            ring.dash_offset(),
            ProgressRing::circumference() * 0.75
        ));
    }

    #[test]
    fn overfull_and_degenerate_inputs_clamp() {
        assert!(close(ProgressRing::new(800, 365).fraction(), 1.0));
        assert!(close(ProgressRing::new(5, 0).fraction(), 0.0));
    }

    #[test]
    fn circumference_matches_radius() {
        assert!(close(ProgressRing::circumference(), 2.0 * PI * 45.0));
    }
}
