//! Conflict detection over a whole program.
//!
//! A fixed sequence of pairwise interval checks over placed sessions.
//! Rejected sessions take no part. Each check is also exposed on its own
//! so placement validation can run it for a single candidate.
//!
//! # Checks (in report order)
//! 1. Stage overlap (same stage, within buffer)
//! 2. Person double-booking (any stage, within buffer)
//! 3. Break overlap (within buffer; `Pause` sessions exempt)
//! 4. Microphone limit (speakers + moderators vs. `max_mics`)
//! 5. Speaker limit (speakers vs. `max_speakers`)
//! 6. Hidden stage
//! 7. Unknown stage
//!
//! # Complexity
//! O(n²) pairs for checks 1–2, O(n·b) for breaks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::models::{normalize_name, Break, Program, Session, Stage};
use crate::time::Interval;

/// A rule violation found in the program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Which rule was broken.
    pub conflict_type: ConflictType,
    /// Sessions involved (one or two).
    pub session_ids: Vec<String>,
    /// Stage involved, if any.
    pub stage_id: Option<String>,
    /// Person involved (double-booking only).
    pub person: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictType {
    /// Two sessions overlap on one stage.
    StageOverlap,
    /// A person is booked into overlapping sessions.
    PersonDoubleBooked,
    /// A session overlaps a break.
    BreakOverlap,
    /// More people than microphones.
    MicLimitExceeded,
    /// More speakers than the podium allows.
    SpeakerLimitExceeded,
    /// Session placed on a hidden stage.
    HiddenStage,
    /// Session references a stage that does not exist.
    UnknownStage,
    /// Drop position outside the festival day.
    OutsideDay,
    /// Session is locked in place.
    Locked,
}

impl Conflict {
    fn new(conflict_type: ConflictType, session_ids: Vec<String>, message: String) -> Self {
        let severity = conflict_type.severity();
        Self {
            conflict_type,
            session_ids,
            stage_id: None,
            person: None,
            message,
            severity,
        }
    }

    fn on_stage(mut self, stage_id: impl Into<String>) -> Self {
        self.stage_id = Some(stage_id.into());
        self
    }

    /// Creates a stage overlap conflict.
    pub fn stage_overlap(a: &Session, b: &Session, stage_id: &str) -> Self {
        Self::new(
            ConflictType::StageOverlap,
            vec![a.id.clone(), b.id.clone()],
            format!(
                "'{}' and '{}' overlap on stage '{}'",
                a.title, b.title, stage_id
            ),
        )
        .on_stage(stage_id)
    }

    /// Creates a person double-booking conflict.
    pub fn person_double_booked(a: &Session, b: &Session, person: &str) -> Self {
        let mut c = Self::new(
            ConflictType::PersonDoubleBooked,
            vec![a.id.clone(), b.id.clone()],
            format!(
                "{} is booked in '{}' and '{}' at the same time",
                person, a.title, b.title
            ),
        );
        c.person = Some(person.to_string());
        c
    }

    /// Creates a break overlap conflict.
    pub fn break_overlap(session: &Session, pause: &Break) -> Self {
        let label = if pause.label.is_empty() {
            pause.id.as_str()
        } else {
            pause.label.as_str()
        };
        let c = Self::new(
            ConflictType::BreakOverlap,
            vec![session.id.clone()],
            format!(
                "'{}' overlaps break '{}' ({})",
                session.title,
                label,
                pause.interval()
            ),
        );
        match &session.stage_id {
            Some(stage) => c.on_stage(stage.clone()),
            None => c,
        }
    }

    /// Creates a microphone limit conflict.
    pub fn mic_limit(session: &Session, stage: &Stage, max: u32) -> Self {
        Self::new(
            ConflictType::MicLimitExceeded,
            vec![session.id.clone()],
            format!(
                "'{}' needs {} mics, stage '{}' has {}",
                session.title,
                session.mic_demand(),
                stage.name,
                max
            ),
        )
        .on_stage(stage.id.clone())
    }

    /// Creates a speaker limit conflict.
    pub fn speaker_limit(session: &Session, stage: &Stage, max: u32) -> Self {
        Self::new(
            ConflictType::SpeakerLimitExceeded,
            vec![session.id.clone()],
            format!(
                "Too many speakers for '{}': {} (max {} on '{}')",
                session.title,
                session.speakers.len(),
                max,
                stage.name
            ),
        )
        .on_stage(stage.id.clone())
    }

    /// Creates a hidden stage conflict.
    pub fn hidden_stage(session: &Session, stage: &Stage) -> Self {
        Self::new(
            ConflictType::HiddenStage,
            vec![session.id.clone()],
            format!("'{}' is placed on hidden stage '{}'", session.title, stage.name),
        )
        .on_stage(stage.id.clone())
    }

    /// Creates an unknown stage conflict.
    pub fn unknown_stage(session: &Session, stage_id: &str) -> Self {
        Self::new(
            ConflictType::UnknownStage,
            vec![session.id.clone()],
            format!("'{}' references unknown stage '{}'", session.title, stage_id),
        )
        .on_stage(stage_id)
    }

    /// Creates an outside-the-day conflict.
    pub fn outside_day(session: &Session, slot: Interval, day: Interval) -> Self {
        Self::new(
            ConflictType::OutsideDay,
            vec![session.id.clone()],
            format!(
                "'{}' at {} does not fit the festival day {}",
                session.title, slot, day
            ),
        )
    }

    /// Creates a locked session conflict.
    pub fn locked(session: &Session) -> Self {
        Self::new(
            ConflictType::Locked,
            vec![session.id.clone()],
            format!("'{}' is fixed and cannot be moved", session.title),
        )
    }

    /// Whether a session is involved.
    pub fn involves(&self, session_id: &str) -> bool {
        self.session_ids.iter().any(|id| id == session_id)
    }
}

impl ConflictType {
    /// Default severity for this type.
    pub fn severity(self) -> i32 {
        match self {
            Self::Locked => 100,
            Self::StageOverlap => 95,
            Self::PersonDoubleBooked => 90,
            Self::UnknownStage => 85,
            Self::OutsideDay => 80,
            Self::BreakOverlap => 70,
            Self::MicLimitExceeded => 60,
            Self::SpeakerLimitExceeded => 50,
            Self::HiddenStage => 40,
        }
    }
}

/// Checks two sessions for a stage overlap.
///
/// `None` unless both are placed on the same stage and come closer than
/// the buffer.
pub fn check_stage_overlap(a: &Session, b: &Session, config: &PlannerConfig) -> Option<Conflict> {
    let stage_a = a.stage_id.as_deref()?;
    let stage_b = b.stage_id.as_deref()?;
    if stage_a != stage_b {
        return None;
    }
    let ia = a.interval(config.default_duration_minutes)?;
    let ib = b.interval(config.default_duration_minutes)?;
    ia.overlaps_with_buffer(&ib, config.buffer_minutes)
        .then(|| Conflict::stage_overlap(a, b, stage_a))
}

/// Checks two sessions for people booked into both.
///
/// One conflict per shared person, in `a`'s listing order.
pub fn check_person_overlap(a: &Session, b: &Session, config: &PlannerConfig) -> Vec<Conflict> {
    let (Some(ia), Some(ib)) = (
        a.interval(config.default_duration_minutes),
        b.interval(config.default_duration_minutes),
    ) else {
        return Vec::new();
    };
    if !ia.overlaps_with_buffer(&ib, config.buffer_minutes) {
        return Vec::new();
    }

    let in_b: HashSet<String> = b.people().map(normalize_name).collect();
    let mut seen = HashSet::new();
    a.people()
        .filter(|name| {
            let key = normalize_name(name);
            !key.is_empty() && in_b.contains(&key) && seen.insert(key)
        })
        .map(|name| Conflict::person_double_booked(a, b, name.trim()))
        .collect()
}

/// Checks a session against a break.
pub fn check_break_overlap(
    session: &Session,
    pause: &Break,
    config: &PlannerConfig,
) -> Option<Conflict> {
    if session.is_pause() {
        return None;
    }
    let stage_id = session.stage_id.as_deref()?;
    if !pause.applies_to(stage_id) {
        return None;
    }
    let interval = session.interval(config.default_duration_minutes)?;
    interval
        .overlaps_with_buffer(&pause.interval(), config.buffer_minutes)
        .then(|| Conflict::break_overlap(session, pause))
}

/// Checks microphone and speaker limits of a stage.
pub fn check_stage_limits(session: &Session, stage: &Stage) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    if let Some(max) = stage.max_mics {
        if session.mic_demand() > max as usize {
            conflicts.push(Conflict::mic_limit(session, stage, max));
        }
    }
    if let Some(max) = stage.max_speakers {
        if session.speakers.len() > max as usize {
            conflicts.push(Conflict::speaker_limit(session, stage, max));
        }
    }
    conflicts
}

/// Runs every check over the program.
///
/// # Returns
/// All conflicts, grouped by check in the order listed in the module docs.
pub fn detect_conflicts(program: &Program, config: &PlannerConfig) -> Vec<Conflict> {
    let active: Vec<&Session> = program
        .placed_sessions()
        .filter(|s| !s.is_rejected())
        .collect();

    let mut stage_overlaps = Vec::new();
    let mut double_bookings = Vec::new();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if let Some(c) = check_stage_overlap(a, b, config) {
                stage_overlaps.push(c);
            }
            double_bookings.extend(check_person_overlap(a, b, config));
        }
    }

    let mut break_overlaps = Vec::new();
    for session in &active {
        for pause in &program.breaks {
            if let Some(c) = check_break_overlap(session, pause, config) {
                break_overlaps.push(c);
            }
        }
    }

    let mut limits = Vec::new();
    let mut hidden = Vec::new();
    let mut unknown = Vec::new();
    for session in &active {
        let Some(stage_id) = session.stage_id.as_deref() else {
            continue;
        };
        match program.stage(stage_id) {
            Some(stage) => {
                limits.extend(check_stage_limits(session, stage));
                if stage.hidden {
                    hidden.push(Conflict::hidden_stage(session, stage));
                }
            }
            None => unknown.push(Conflict::unknown_stage(session, stage_id)),
        }
    }
    // Mic conflicts before speaker conflicts across all sessions.
    limits.sort_by_key(|c| c.conflict_type != ConflictType::MicLimitExceeded);

    let mut conflicts = stage_overlaps;
    conflicts.append(&mut double_bookings);
    conflicts.append(&mut break_overlaps);
    conflicts.append(&mut limits);
    conflicts.append(&mut hidden);
    conflicts.append(&mut unknown);

    debug!(
        sessions = active.len(),
        conflicts = conflicts.len(),
        "conflict scan finished"
    );
    conflicts
}

/// Conflicts that involve a given session.
pub fn conflicts_for_session<'a>(
    conflicts: &'a [Conflict],
    session_id: &str,
) -> Vec<&'a Conflict> {
    conflicts.iter().filter(|c| c.involves(session_id)).collect()
}
