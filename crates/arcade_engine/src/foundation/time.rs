//! Frame time stepping
//!
//! The motion and collision code never reads a clock. The frame driver
//! measures its own delta and feeds it through [`FrameStep`], which clamps
//! long frames (to avoid tunneling) and applies the time scale.

/// Converts raw frame deltas into the elapsed time handed to the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    max_elapsed: f32,
    time_scale: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameStep {
    fn default() -> Self {
        Self::new(1.0 / 30.0, 1.0)
    }
}

impl FrameStep {
    /// Create a stepper with the given clamp and scale
    pub fn new(max_elapsed: f32, time_scale: f32) -> Self {
        Self {
            max_elapsed,
            time_scale,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Turn a raw delta (seconds) into this frame's simulation step
    ///
    /// Negative deltas are treated as zero.
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        let elapsed = raw_delta.clamp(0.0, self.max_elapsed) * self.time_scale;
        self.total_time += elapsed;
        self.frame_count += 1;
        elapsed
    }

    /// Largest raw delta accepted before clamping
    pub fn max_elapsed(&self) -> f32 {
        self.max_elapsed
    }

    /// Multiplier applied after clamping
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Total simulated time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_frames_are_clamped() {
        let mut step = FrameStep::new(0.05, 1.0);
        assert_eq!(step.advance(0.5), 0.05);
        assert_eq!(step.advance(0.01), 0.01);
        assert_eq!(step.frame_count(), 2);
    }

    #[test]
    fn test_time_scale_applies_after_clamp() {
        let mut step = FrameStep::new(0.1, 0.5);
        assert_eq!(step.advance(1.0), 0.05);
        assert_eq!(step.advance(-1.0), 0.0);
    }
}
