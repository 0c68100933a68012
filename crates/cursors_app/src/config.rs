//! Simulation configuration

use crate::error::{AppError, Result};
use cursors_animation::{MotionConfig, SpawnConfig, TargetConfig};

/// Everything that shapes one run of the animation
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of cursors, including the one bound to the real pointer
    pub cursor_count: usize,
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub spawn: SpawnConfig,
    pub targets: TargetConfig,
    pub motion: MotionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cursor_count: 10,
            seed: None,
            spawn: SpawnConfig::default(),
            targets: TargetConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_cursor_count(mut self, count: usize) -> Self {
        self.cursor_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the tick cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.cursor_count == 0 {
            return Err(AppError::Config("cursor_count must be > 0".to_string()));
        }

        let ratios = [
            ("ring_radius_ratio", self.spawn.ring_radius_ratio),
            ("max_rotation_speed", self.spawn.max_rotation_speed),
            ("max_velocity", self.targets.max_velocity),
            ("spawn_inset_ratio", self.targets.spawn_inset_ratio),
            ("real_smoothing", self.motion.real_smoothing),
            ("synthetic_smoothing", self.motion.synthetic_smoothing),
            ("offset_base_ratio", self.motion.offset_base_ratio),
            ("offset_step", self.motion.offset_step),
            ("margin_ratio", self.motion.margin_ratio),
        ];
        if let Some((name, value)) = ratios.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AppError::Config(format!("{name} must be finite, got {value}")));
        }

        // Angles are wrapped by a single turn per frame
        let speed = self.spawn.max_rotation_speed.abs();
        if speed >= 360.0 {
            return Err(AppError::Config(format!(
                "max_rotation_speed must be below 360 degrees per frame, got {}",
                self.spawn.max_rotation_speed
            )));
        }

        for (name, value) in [
            ("real_smoothing", self.motion.real_smoothing),
            ("synthetic_smoothing", self.motion.synthetic_smoothing),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.cursor_count, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_cursors() {
        let err = SimulationConfig::default()
            .with_cursor_count(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("cursor_count"));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut config = SimulationConfig::default();
        config.motion.margin_ratio = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.targets.max_velocity = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_rotation_speed_beyond_one_turn() {
        let mut config = SimulationConfig::default();
        config.spawn.max_rotation_speed = 900.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_rotation_speed"));

        config.spawn.max_rotation_speed = -360.0;
        assert!(config.validate().is_err());

        config.spawn.max_rotation_speed = 359.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_smoothing_out_of_range() {
        let mut config = SimulationConfig::default();
        config.motion.synthetic_smoothing = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("synthetic_smoothing"));
    }
}
