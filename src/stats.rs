//! Program statistics.
//!
//! Computes headline figures for a program from its placed sessions.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placed / Inbox | Sessions with / without stage and start |
//! | Booked minutes | Sum of session minutes on a stage within the day |
//! | Utilization | Booked minutes / festival day length |
//! | Avg Utilization | Mean over visible stages |
//! | People booked | Distinct speakers and moderators in placed sessions |

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::PlannerConfig;
use crate::models::{normalize_name, Program};
use crate::time::Interval;

/// Program performance indicators.
///
/// Time values are in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramStats {
    /// Sessions on a stage with a start time.
    pub placed_count: usize,
    /// Sessions in the inbox.
    pub inbox_count: usize,
    /// Session count per status label.
    pub by_status: HashMap<String, usize>,
    /// Booked minutes per stage (placed, non-rejected sessions).
    pub booked_minutes_by_stage: HashMap<String, i32>,
    /// Booked minutes / day length per stage (0.0..1.0).
    pub utilization_by_stage: HashMap<String, f64>,
    /// Mean utilization over visible stages.
    pub avg_utilization: f64,
    /// Distinct people appearing in placed sessions.
    pub people_booked: usize,
}

impl ProgramStats {
    /// Computes statistics for a program.
    ///
    /// Only the part of a session inside the festival day counts as
    /// booked, so utilization stays within 0.0..1.0 unless sessions
    /// overlap.
    pub fn calculate(program: &Program, config: &PlannerConfig) -> Self {
        let day = Interval::new(config.day_start_minutes(), config.day_end_minutes());
        let day_len = day.duration();

        let mut by_status: HashMap<String, usize> = HashMap::new();
        for s in &program.sessions {
            *by_status.entry(s.status.label().to_string()).or_insert(0) += 1;
        }

        let mut booked: HashMap<String, i32> = program
            .stages
            .iter()
            .map(|st| (st.id.clone(), 0))
            .collect();
        let mut people = HashSet::new();
        let mut placed_count = 0;

        for s in program.placed_sessions() {
            placed_count += 1;
            if s.is_rejected() {
                continue;
            }
            people.extend(s.people().map(normalize_name).filter(|n| !n.is_empty()));

            if let (Some(stage_id), Some(interval)) =
                (&s.stage_id, s.interval(config.default_duration_minutes))
            {
                if let Some(minutes) = booked.get_mut(stage_id) {
                    *minutes += interval.overlap_minutes(&day);
                }
            }
        }

        let utilization_by_stage: HashMap<String, f64> = booked
            .iter()
            .map(|(id, &minutes)| {
                let util = if day_len > 0 {
                    minutes as f64 / day_len as f64
                } else {
                    0.0
                };
                (id.clone(), util)
            })
            .collect();

        let visible: Vec<f64> = program
            .visible_stages()
            .filter_map(|st| utilization_by_stage.get(&st.id).copied())
            .collect();
        let avg_utilization = if visible.is_empty() {
            0.0
        } else {
            visible.iter().sum::<f64>() / visible.len() as f64
        };

        Self {
            placed_count,
            inbox_count: program.sessions.len() - placed_count,
            by_status,
            booked_minutes_by_stage: booked,
            utilization_by_stage,
            avg_utilization,
            people_booked: people.len(),
        }
    }

    /// Fraction of sessions that are placed (1.0 for an empty program).
    pub fn placement_rate(&self) -> f64 {
        let total = self.placed_count + self.inbox_count;
        if total == 0 {
            1.0
        } else {
            self.placed_count as f64 / total as f64
        }
    }
}
