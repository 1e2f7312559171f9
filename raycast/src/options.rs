use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::ConfigurationError;

/// Distance from the camera at which a query starts.
pub const MIN_HIT_DISTANCE: f64 = 50.0;
/// Distance from the camera at which a query ends.
pub const MAX_HIT_DISTANCE: f64 = 1000.0;
/// Number of additional queries around the primary direction when averaging.
pub const AUX_RAYCAST_COUNT: usize = 8;
/// Maximum number of missed queries that still produce an averaged hit.
pub const AUX_RAYCAST_MISS_TOLERANCE: usize = 2;
/// Upper bound for [`Tuning::aux_count`].
pub const MAX_AUX_RAYCAST_COUNT: usize = 64;
/// How far auxiliary directions are offset from the primary direction.
pub const AUX_RAYCAST_OFFSET_MULTIPLIER: f64 = 0.02;
/// Delay before a missed cast is retried. Zero means the next scheduler tick.
pub const RETRY_DELAY: Duration = Duration::ZERO;
pub const DEFAULT_LOOP_DELAY: Duration = Duration::from_millis(500);

/// Per-engine behavior switches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CastOptions {
    /// Cast auxiliary rays around the primary direction and average the hits.
    pub average_multiple_samples: bool,
    /// Reschedule a cast that missed instead of reporting the miss.
    pub retry_on_miss: bool,
    /// Flatten forward and random directions to the horizontal plane.
    pub ignore_vertical_tilt: bool,
    /// Schedule the next cast after each completed one.
    pub is_looping: bool,
    /// Delay between looped casts. Zero loops as fast as the scheduler ticks.
    pub loop_delay_seconds: f64,
}

impl Default for CastOptions {
    fn default() -> Self {
        Self {
            average_multiple_samples: true,
            retry_on_miss: true,
            ignore_vertical_tilt: true,
            is_looping: false,
            loop_delay_seconds: DEFAULT_LOOP_DELAY.as_secs_f64(),
        }
    }
}

impl CastOptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !is_valid_seconds(self.loop_delay_seconds) {
            return Err(ConfigurationError::InvalidLoopDelay {
                seconds: self.loop_delay_seconds,
            });
        }
        Ok(())
    }

    /// The loop delay. Invalid values fall back to zero.
    pub fn loop_delay(&self) -> Duration {
        to_duration(self.loop_delay_seconds, "loop delay")
    }

    pub fn set_loop_delay(&mut self, delay: Duration) {
        self.loop_delay_seconds = delay.as_secs_f64();
    }
}

/// Range of the random offsets applied along the camera's right and up vectors.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomRange {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for RandomRange {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 0.5,
        }
    }
}

/// The constants of the cast algorithm.
///
/// The defaults are what the engine was tuned with on device. They are only exposed so that
/// hosts with different world scales can adjust them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub min_distance: f64,
    pub max_distance: f64,
    pub aux_count: usize,
    pub aux_miss_tolerance: usize,
    pub aux_offset: f64,
    pub random_range: RandomRange,
    pub retry_delay_seconds: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_distance: MIN_HIT_DISTANCE,
            max_distance: MAX_HIT_DISTANCE,
            aux_count: AUX_RAYCAST_COUNT,
            aux_miss_tolerance: AUX_RAYCAST_MISS_TOLERANCE,
            aux_offset: AUX_RAYCAST_OFFSET_MULTIPLIER,
            random_range: RandomRange::default(),
            retry_delay_seconds: RETRY_DELAY.as_secs_f64(),
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| {
            Err(ConfigurationError::InvalidTuning {
                reason: reason.into(),
            })
        };

        if !(self.min_distance.is_finite() && self.max_distance.is_finite()) {
            return invalid("hit distances must be finite");
        }
        if self.min_distance < 0.0 || self.min_distance >= self.max_distance {
            return invalid("min_distance must be non-negative and less than max_distance");
        }
        if self.aux_count > MAX_AUX_RAYCAST_COUNT {
            return invalid("aux_count must not exceed 64");
        }
        if self.aux_miss_tolerance > self.aux_count {
            return invalid("aux_miss_tolerance must not exceed aux_count");
        }
        if !(self.aux_offset.is_finite() && self.aux_offset >= 0.0) {
            return invalid("aux_offset must be a non-negative number");
        }
        let RandomRange {
            horizontal,
            vertical,
        } = self.random_range;
        if !(horizontal.is_finite() && vertical.is_finite() && horizontal >= 0.0 && vertical >= 0.0)
        {
            return invalid("random_range must be non-negative");
        }
        if !is_valid_seconds(self.retry_delay_seconds) {
            return invalid("retry_delay_seconds must be a non-negative number");
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        to_duration(self.retry_delay_seconds, "retry delay")
    }
}

/// Configuration of an engine as read from a TOML file.
///
/// ```toml
/// debug = true
///
/// [options]
/// retry_on_miss = true
/// is_looping = true
/// loop_delay_seconds = 0.1
///
/// [tuning]
/// max_distance = 500.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaycastConfig {
    /// Forward diagnostics lines to the host's sink.
    pub debug: bool,
    pub options: CastOptions,
    pub tuning: Tuning,
}

impl RaycastConfig {
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: RaycastConfig =
            toml::from_str(toml).context("Failed to parse raycast configuration")?;
        config
            .options
            .validate()
            .context("Invalid raycast options")?;
        config.tuning.validate().context("Invalid raycast tuning")?;
        Ok(config)
    }
}

fn is_valid_seconds(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

fn to_duration(seconds: f64, what: &str) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| {
        warn!("Invalid {what} of {seconds} seconds, using zero");
        Duration::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = RaycastConfig::from_toml("").unwrap();
        assert_eq!(config, RaycastConfig::default());
        assert!(config.options.average_multiple_samples);
        assert!(config.options.retry_on_miss);
        assert!(config.options.ignore_vertical_tilt);
        assert!(!config.options.is_looping);
        assert_eq!(config.options.loop_delay(), Duration::from_millis(500));
        assert_eq!(config.tuning.aux_count, 8);
        assert_eq!(config.tuning.retry_delay(), Duration::ZERO);
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let config = RaycastConfig::from_toml(
            r#"
            debug = true

            [options]
            ignore_vertical_tilt = false
            is_looping = true
            loop_delay_seconds = 0.1

            [tuning]
            max_distance = 500.0
            random_range = { horizontal = 0.5, vertical = 0.25 }
            "#,
        )
        .unwrap();

        assert!(config.debug);
        assert!(!config.options.ignore_vertical_tilt);
        assert!(config.options.is_looping);
        assert!(config.options.average_multiple_samples);
        assert_eq!(config.options.loop_delay(), Duration::from_millis(100));
        assert_eq!(config.tuning.max_distance, 500.0);
        assert_eq!(config.tuning.min_distance, MIN_HIT_DISTANCE);
        assert_eq!(config.tuning.random_range.vertical, 0.25);
    }

    #[test]
    fn negative_loop_delay_is_rejected() {
        let error = RaycastConfig::from_toml("[options]\nloop_delay_seconds = -1.0").unwrap_err();
        assert_eq!(
            error.downcast_ref::<ConfigurationError>(),
            Some(&ConfigurationError::InvalidLoopDelay { seconds: -1.0 })
        );
    }

    #[test]
    fn inverted_distances_are_rejected() {
        let tuning = Tuning {
            min_distance: 100.0,
            max_distance: 10.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigurationError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn oversized_aux_counts_are_rejected() {
        let error = RaycastConfig::from_toml("[tuning]\naux_count = 9223372036854775807")
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::InvalidTuning { .. })
        ));

        let at_limit = Tuning {
            aux_count: MAX_AUX_RAYCAST_COUNT,
            ..Tuning::default()
        };
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn miss_tolerance_above_aux_count_is_rejected() {
        let tuning = Tuning {
            aux_count: 2,
            aux_miss_tolerance: 3,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigurationError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(RaycastConfig::from_toml("[options]\naverage_raycasts = true").is_err());
    }

    #[test]
    fn invalid_loop_delay_falls_back_to_zero() {
        let options = CastOptions {
            loop_delay_seconds: f64::NAN,
            ..CastOptions::default()
        };
        assert_eq!(options.loop_delay(), Duration::ZERO);
    }
}
