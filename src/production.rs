//! Production (tech rider) planning.
//!
//! Joins per-session equipment records onto the program and checks
//! whether overlapping sessions on one stage together need more
//! microphones than the stage has. Also computes the festival-wide
//! equipment summary with peak concurrent usage.
//!
//! # Peak Usage
//! The day is cut into fixed slots (`production_slot_minutes`). A session
//! counts towards every slot it touches; the peak is the maximum slot sum.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::config::PlannerConfig;
use crate::models::{Program, Session};
use crate::time::{ClockTime, Interval};

/// Equipment requirements of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// Session this record belongs to.
    pub session_id: String,
    /// Handheld wireless microphones.
    pub wireless_mics: u32,
    /// Headset microphones.
    pub headset_mics: u32,
    /// DI boxes.
    pub di_boxes: u32,
    /// Audio feeds (free text).
    pub audio_feeds: String,
    /// Visuals (free text).
    pub visuals: String,
    /// Anything else.
    pub special_requirements: String,
    /// Production status (confirmed / pending / canceled).
    pub status: ProductionStatus,
    /// Setup start, if earlier than the session.
    pub setup_start: Option<ClockTime>,
}

/// Production status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionStatus {
    /// Rider agreed with the technical crew.
    Confirmed,
    /// Rider not yet agreed.
    #[default]
    Pending,
    /// Production dropped; ignored by mic checks.
    Canceled,
    /// Any other value, kept verbatim.
    Other(String),
}

/// A session joined with its production record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedSession<'a> {
    /// The program session.
    pub session: &'a Session,
    /// Equipment; defaults (all zero, pending) when no record exists.
    pub production: ProductionRecord,
}

/// Two sessions on one stage that together exceed its microphones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicOverbooking {
    /// Stage id.
    pub stage_id: String,
    /// Stage display name.
    pub stage_name: String,
    /// First session title.
    pub session_a: String,
    /// Second session title.
    pub session_b: String,
    /// Summed wireless + headset mics.
    pub total_mics: u32,
    /// Stage limit.
    pub max_mics: u32,
    /// Overlapping span, formatted `HH:MM–HH:MM`.
    pub time_range: String,
}

/// Festival-wide equipment figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    /// Sum of wireless mics over all placed sessions.
    pub total_wireless: u32,
    /// Sum of headset mics over all placed sessions.
    pub total_headset: u32,
    /// Sum of DI boxes over all placed sessions.
    pub total_di_boxes: u32,
    /// Maximum wireless mics in use in any slot.
    pub peak_wireless: u32,
    /// Maximum headset mics in use in any slot.
    pub peak_headset: u32,
    /// Placed sessions counted.
    pub session_count: usize,
    /// Placed sessions with confirmed production.
    pub confirmed_count: usize,
}

impl ProductionRecord {
    /// Creates an empty record.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    /// Sets microphone counts.
    pub fn with_mics(mut self, wireless: u32, headset: u32) -> Self {
        self.wireless_mics = wireless;
        self.headset_mics = headset;
        self
    }

    /// Sets the DI box count.
    pub fn with_di_boxes(mut self, count: u32) -> Self {
        self.di_boxes = count;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ProductionStatus) -> Self {
        self.status = status;
        self
    }

    /// Wireless plus headset.
    pub fn total_mics(&self) -> u32 {
        self.wireless_mics + self.headset_mics
    }
}

impl ProductionStatus {
    /// Parses an English or German status value.
    pub fn parse(value: &str) -> Self {
        let raw = value.trim();
        match raw.to_lowercase().as_str() {
            "confirmed" | "bestätigt" => Self::Confirmed,
            "" | "pending" | "offen" => Self::Pending,
            "canceled" | "cancelled" | "abgesagt" => Self::Canceled,
            _ => Self::Other(raw.to_string()),
        }
    }
}

/// Joins production records onto sessions by session id.
///
/// Sessions without a record get an empty one. Records for unknown
/// sessions are ignored. Output order follows `sessions`.
pub fn merge_production<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    records: &[ProductionRecord],
) -> Vec<ProducedSession<'a>> {
    let by_id: HashMap<&str, &ProductionRecord> = records
        .iter()
        .filter(|r| !r.session_id.is_empty())
        .map(|r| (r.session_id.as_str(), r))
        .collect();

    sessions
        .into_iter()
        .map(|session| ProducedSession {
            session,
            production: by_id
                .get(session.id.as_str())
                .map(|r| (*r).clone())
                .unwrap_or_else(|| ProductionRecord::new(session.id.clone())),
        })
        .collect()
}

/// Finds overlapping session pairs per stage whose mics exceed the stage.
///
/// Stages without `max_mics` use `config.default_max_mics`. Hidden
/// stages are included; canceled productions are not.
pub fn mic_overbooking(
    program: &Program,
    records: &[ProductionRecord],
    config: &PlannerConfig,
) -> Vec<MicOverbooking> {
    let mut warnings = Vec::new();

    for stage in &program.stages {
        let on_stage = merge_production(program.sessions_on_stage(&stage.id), records);
        let active: Vec<&ProducedSession> = on_stage
            .iter()
            .filter(|p| p.production.status != ProductionStatus::Canceled)
            .collect();
        let max_mics = stage.mic_limit_or(config.default_max_mics);

        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                let (Some(ia), Some(ib)) = (
                    a.session.interval(config.default_duration_minutes),
                    b.session.interval(config.default_duration_minutes),
                ) else {
                    continue;
                };
                if !ia.overlaps(&ib) {
                    continue;
                }
                let total_mics = a.production.total_mics() + b.production.total_mics();
                if total_mics > max_mics {
                    let span = Interval::new(ia.start.min(ib.start), ia.end.max(ib.end));
                    warnings.push(MicOverbooking {
                        stage_id: stage.id.clone(),
                        stage_name: stage.name.clone(),
                        session_a: a.session.title.clone(),
                        session_b: b.session.title.clone(),
                        total_mics,
                        max_mics,
                        time_range: span.to_string(),
                    });
                }
            }
        }
    }

    if !warnings.is_empty() {
        warn!(count = warnings.len(), "microphone overbooking detected");
    }
    warnings
}

/// Computes totals and peak concurrent usage over the festival day.
pub fn equipment_summary(
    program: &Program,
    records: &[ProductionRecord],
    config: &PlannerConfig,
) -> EquipmentSummary {
    let placed = merge_production(program.placed_sessions(), records);
    let mut summary = EquipmentSummary {
        session_count: placed.len(),
        confirmed_count: placed
            .iter()
            .filter(|p| p.production.status == ProductionStatus::Confirmed)
            .count(),
        ..Default::default()
    };

    let day_start = config.day_start_minutes();
    let day_end = config.day_end_minutes();
    let step = config.production_slot_minutes.max(1);
    let slot_count = ((day_end - day_start).max(0) + step - 1) / step;
    let mut slots = vec![(0u32, 0u32); slot_count as usize];

    for p in &placed {
        summary.total_wireless += p.production.wireless_mics;
        summary.total_headset += p.production.headset_mics;
        summary.total_di_boxes += p.production.di_boxes;

        let Some(interval) = p.session.interval(config.default_duration_minutes) else {
            continue;
        };
        for (idx, slot) in slots.iter_mut().enumerate() {
            let from = day_start + idx as i32 * step;
            if interval.overlaps(&Interval::new(from, from + step)) {
                slot.0 += p.production.wireless_mics;
                slot.1 += p.production.headset_mics;
            }
        }
    }

    summary.peak_wireless = slots.iter().map(|s| s.0).max().unwrap_or(0);
    summary.peak_headset = slots.iter().map(|s| s.1).max().unwrap_or(0);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;

    fn sample_program() -> Program {
        Program::new()
            .with_stage(Stage::new("main").with_name("Main").with_max_mics(4))
            .with_stage(Stage::new("tent").with_name("Tent"))
            .with_session(Session::new("S1", "Panel").placed("main", ClockTime::hm(10, 0)))
            .with_session(Session::new("S2", "Quiz").placed("main", ClockTime::hm(10, 30)))
            .with_session(Session::new("S3", "Reading").placed("tent", ClockTime::hm(10, 0)))
            .with_session(Session::new("S4", "Inbox"))
    }

    fn sample_records() -> Vec<ProductionRecord> {
        vec![
            ProductionRecord::new("S1")
                .with_mics(2, 1)
                .with_di_boxes(2)
                .with_status(ProductionStatus::Confirmed),
            ProductionRecord::new("S2").with_mics(2, 0),
            ProductionRecord::new("S3").with_mics(1, 1),
            ProductionRecord::new("S4").with_mics(9, 9),
            ProductionRecord::new("ghost").with_mics(5, 5),
        ]
    }

    #[test]
    fn test_merge_production() {
        let program = sample_program();
        let merged = merge_production(&program.sessions, &sample_records()[..1]);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0].production.total_mics(), 3);
        assert_eq!(merged[1].production, ProductionRecord::new("S2"));
    }

    #[test]
    fn test_mic_overbooking() {
        let program = sample_program();
        let warnings = mic_overbooking(&program, &sample_records(), &PlannerConfig::default());
        assert_eq!(warnings.len(), 1);
        let w = &warnings[0];
        assert_eq!(w.stage_name, "Main");
        assert_eq!(w.session_a, "Panel");
        assert_eq!(w.session_b, "Quiz");
        assert_eq!(w.total_mics, 5);
        assert_eq!(w.max_mics, 4);
        assert_eq!(w.time_range, "10:00–11:30");
    }

    #[test]
    fn test_mic_overbooking_skips_canceled() {
        let program = sample_program();
        let mut records = sample_records();
        records[1].status = ProductionStatus::Canceled;
        assert!(mic_overbooking(&program, &records, &PlannerConfig::default()).is_empty());
    }

    #[test]
    fn test_default_mic_limit() {
        let program = Program::new()
            .with_stage(Stage::new("tent"))
            .with_session(Session::new("A", "A").placed("tent", ClockTime::hm(10, 0)))
            .with_session(Session::new("B", "B").placed("tent", ClockTime::hm(10, 0)));
        let records = vec![
            ProductionRecord::new("A").with_mics(2, 0),
            ProductionRecord::new("B").with_mics(2, 1),
        ];
        let warnings = mic_overbooking(&program, &records, &PlannerConfig::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].max_mics, 4);
    }

    #[test]
    fn test_equipment_summary() {
        let program = sample_program();
        let summary = equipment_summary(&program, &sample_records(), &PlannerConfig::default());
        // S4 sits in the inbox and is not counted
        assert_eq!(summary.session_count, 3);
        assert_eq!(summary.confirmed_count, 1);
        assert_eq!(summary.total_wireless, 5);
        assert_eq!(summary.total_headset, 2);
        assert_eq!(summary.total_di_boxes, 2);
        // 10:30-11:00: S1 + S2 + S3 all running
        assert_eq!(summary.peak_wireless, 5);
        assert_eq!(summary.peak_headset, 2);
    }

    #[test]
    fn test_equipment_summary_empty() {
        let summary = equipment_summary(&Program::new(), &[], &PlannerConfig::default());
        assert_eq!(summary, EquipmentSummary::default());
    }

    #[test]
    fn test_production_status_parse() {
        assert_eq!(ProductionStatus::parse("Bestätigt"), ProductionStatus::Confirmed);
        assert_eq!(ProductionStatus::parse("offen"), ProductionStatus::Pending);
        assert_eq!(ProductionStatus::parse("cancelled"), ProductionStatus::Canceled);
        assert_eq!(ProductionStatus::parse(""), ProductionStatus::Pending);
        assert_eq!(
            ProductionStatus::parse("tbd"),
            ProductionStatus::Other("tbd".into())
        );
    }
}
