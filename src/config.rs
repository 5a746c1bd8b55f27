//! Planner configuration.
//!
//! Loaded from TOML at runtime. Every field has a default, so an empty
//! document yields [`PlannerConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlannerError, Result};

/// Top-level planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum gap between bookings of a stage or person (minutes).
    pub buffer_minutes: i32,
    /// Placement grid (minutes). Drop positions snap to multiples of this.
    pub snap_minutes: i32,
    /// First hour of the festival day (inclusive).
    pub day_start_hour: i32,
    /// Last hour of the festival day (exclusive end of the timeline).
    pub day_end_hour: i32,
    /// Mic limit assumed for stages without `max_mics` in production checks.
    pub default_max_mics: u32,
    /// Slot width for peak equipment usage (minutes).
    pub production_slot_minutes: i32,
    /// Duration assumed for sessions without a positive duration (minutes).
    pub default_duration_minutes: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: 0,
            snap_minutes: 5,
            day_start_hour: 9,
            day_end_hour: 22,
            default_max_mics: 4,
            production_slot_minutes: 15,
            default_duration_minutes: 60,
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Sets the buffer.
    pub fn with_buffer(mut self, minutes: i32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    /// Sets the festival day range.
    pub fn with_day(mut self, start_hour: i32, end_hour: i32) -> Self {
        self.day_start_hour = start_hour;
        self.day_end_hour = end_hour;
        self
    }

    /// Festival day start in minutes since midnight.
    pub fn day_start_minutes(&self) -> i32 {
        self.day_start_hour * 60
    }

    /// Festival day end in minutes since midnight.
    pub fn day_end_minutes(&self) -> i32 {
        self.day_end_hour * 60
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_minutes < 0 {
            return Err(PlannerError::Config(format!(
                "buffer_minutes must be >= 0, got {}",
                self.buffer_minutes
            )));
        }
        if self.snap_minutes <= 0 || self.production_slot_minutes <= 0 {
            return Err(PlannerError::Config(
                "snap_minutes and production_slot_minutes must be positive".into(),
            ));
        }
        if !(0..=24).contains(&self.day_start_hour)
            || !(0..=24).contains(&self.day_end_hour)
            || self.day_start_hour >= self.day_end_hour
        {
            return Err(PlannerError::Config(format!(
                "invalid day range {}..{}",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.default_duration_minutes <= 0 {
            return Err(PlannerError::Config(
                "default_duration_minutes must be positive".into(),
            ));
        }
        Ok(())
    }
}
