//! Ramped brake command sequence.

use std::time::Duration;

pub const FULL_BRAKE: u8 = 255;
/// Brake steps per second.
pub const STEP_RATE: f64 = 10.0;

/// Seconds to ramp the brake from `velocity`, scaled so full speed takes
/// `full_secs`.
pub fn brake_duration(velocity: u8, full_secs: f64) -> f64 {
    f64::from(velocity) / 255.0 * full_secs
}

/// Evenly spaced brake values from 0 to `FULL_BRAKE`, both ends included.
#[derive(Debug, Clone)]
pub struct BrakeRamp {
    steps: usize,
    next: usize,
}

impl BrakeRamp {
    pub fn with_steps(steps: usize) -> Self {
        Self { steps, next: 0 }
    }

    pub fn for_velocity(velocity: u8, full_secs: f64) -> Self {
        let delay = brake_duration(velocity, full_secs);
        Self::with_steps((delay * STEP_RATE) as usize)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.steps as f64 / STEP_RATE)
    }

    fn value_at(&self, i: usize) -> u8 {
        if self.steps > 1 && i == self.steps - 1 {
            return FULL_BRAKE;
        }
        let div = self.steps.saturating_sub(1).max(1) as f64;
        (i as f64 * (f64::from(FULL_BRAKE) / div)) as u8
    }
}

impl Iterator for BrakeRamp {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.next >= self.steps {
            return None;
        }
        let value = self.value_at(self.next);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.steps - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BrakeRamp {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_speed_takes_three_seconds() {
        assert_eq!(brake_duration(255, 3.0), 3.0);
        let ramp = BrakeRamp::for_velocity(255, 3.0);
        assert_eq!(ramp.steps(), 30);
        assert_eq!(ramp.duration(), Duration::from_secs(3));
    }

    #[test]
    fn full_speed_ramp_is_even_and_inclusive() {
        let values: Vec<u8> = BrakeRamp::for_velocity(255, 3.0).collect();
        assert_eq!(values.len(), 30);
        assert_eq!(values[0], 0);
        assert_eq!(values[29], 255);
        let step = 255.0 / 29.0;
        for (i, v) in values.iter().enumerate() {
            assert!((f64::from(*v) - i as f64 * step).abs() < 1.0, "step {i}: {v}");
        }
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn stopped_cart_has_no_steps() {
        let mut ramp = BrakeRamp::for_velocity(0, 3.0);
        assert_eq!(ramp.len(), 0);
        assert_eq!(ramp.next(), None);
    }

    #[test]
    fn low_speed_truncates_step_count() {
        // 15 / 255 * 3 = 0.176s -> 1 step
        assert_eq!(BrakeRamp::for_velocity(15, 3.0).collect::<Vec<_>>(), vec![0]);
        // 45 / 255 * 3 = 0.529s -> 5 steps
        assert_eq!(BrakeRamp::for_velocity(45, 3.0).collect::<Vec<_>>(), vec![0, 63, 127, 191, 255]);
    }
}
