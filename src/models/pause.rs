//! Break model.

use serde::{Deserialize, Serialize};

use crate::time::{ClockTime, Interval};

/// A break in the program (lunch, changeover).
///
/// Applies to every stage unless `stage_id` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Break {
    /// Unique break identifier.
    pub id: String,
    /// Start time.
    pub start: ClockTime,
    /// Length in minutes.
    pub duration: i32,
    /// Display label.
    pub label: String,
    /// Restricts the break to a single stage.
    pub stage_id: Option<String>,
}

impl Break {
    /// Creates a break on all stages.
    pub fn new(id: impl Into<String>, start: ClockTime, duration: i32) -> Self {
        Self {
            id: id.into(),
            start,
            duration,
            label: String::new(),
            stage_id: None,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Restricts the break to one stage.
    pub fn on_stage(mut self, stage_id: impl Into<String>) -> Self {
        self.stage_id = Some(stage_id.into());
        self
    }

    /// Occupied interval.
    pub fn interval(&self) -> Interval {
        Interval::from_start(self.start, self.duration)
    }

    /// Whether the break blocks the given stage.
    pub fn applies_to(&self, stage_id: &str) -> bool {
        match &self.stage_id {
            None => true,
            Some(id) => id == stage_id,
        }
    }
}
