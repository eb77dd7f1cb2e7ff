//! User-controlled zoom of a panel's inner content.
//!
//! Independent from the canvas camera: panning or zooming the graph never
//! touches this value.

/// Lower bound of the content zoom.
pub const MIN_CONTENT_SCALE: f32 = 0.1;
/// Upper bound of the content zoom.
pub const MAX_CONTENT_SCALE: f32 = 5.0;
/// Increment used by the +/- controls.
pub const CONTENT_SCALE_STEP: f32 = 0.1;

/// Clamped zoom factor for a panel's content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentScale(f32);

impl Default for ContentScale {
    fn default() -> Self {
        Self(1.0)
    }
}

impl ContentScale {
    pub fn factor(&self) -> f32 {
        self.0
    }

    /// Apply a delta, clamping to the valid range.
    pub fn apply_delta(&mut self, delta: f32) {
        self.0 = (self.0 + delta).clamp(MIN_CONTENT_SCALE, MAX_CONTENT_SCALE);
    }

    pub fn step_in(&mut self) {
        self.apply_delta(CONTENT_SCALE_STEP);
    }

    pub fn step_out(&mut self) {
        self.apply_delta(-CONTENT_SCALE_STEP);
    }

    /// Restore the default zoom exactly.
    pub fn reset(&mut self) {
        self.0 = 1.0;
    }

    /// Label for the header control, e.g. "130%".
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.0 * 100.0).round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_at_lower_bound() {
        let mut scale = ContentScale::default();
        scale.apply_delta(-1.0);
        assert_eq!(scale.factor(), MIN_CONTENT_SCALE);
    }

    #[test]
    fn clamps_at_upper_bound() {
        let mut scale = ContentScale::default();
        scale.apply_delta(10.0);
        assert_eq!(scale.factor(), MAX_CONTENT_SCALE);
    }

    #[test]
    fn reset_restores_exactly_one() {
        let mut scale = ContentScale::default();
        scale.apply_delta(0.3);
        scale.reset();
        assert_eq!(scale.factor(), 1.0);
    }

    #[test]
    fn steps_accumulate() {
        let mut scale = ContentScale::default();
        scale.step_in();
        scale.step_in();
        scale.step_out();
        assert!((scale.factor() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn percent_label_rounds() {
        let mut scale = ContentScale::default();
        assert_eq!(scale.percent_label(), "100%");
        scale.step_out();
        assert_eq!(scale.percent_label(), "90%");
    }
}
