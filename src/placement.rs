//! Drag-and-drop placement validation.
//!
//! A drop moves one session either back to the inbox or onto a stage at
//! a start time. The move is checked against the rest of the program in
//! a fixed order:
//!
//! 1. Session must exist (error)
//! 2. Locked sessions do not move (blocking)
//! 3. Inbox target: always allowed, nothing else is checked
//! 4. Stage must exist (blocking, stops here) and be visible (blocking)
//! 5. Snapped slot must fit the festival day (blocking)
//! 6. No overlap with another session on the stage (blocking)
//! 7. No overlap with a break (blocking; `Pause` sessions exempt)
//! 8. No person double-booking (warning)
//! 9. Microphone and speaker limits (warning)
//!
//! This is validation only. Nothing searches for a better slot except
//! [`find_free_slots`], which simply tries every grid position.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::conflicts::{
    check_break_overlap, check_person_overlap, check_stage_limits, check_stage_overlap, Conflict,
};
use crate::error::{PlannerError, Result};
use crate::models::{Program, Session};
use crate::time::{ClockTime, Interval};

/// Where a session is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementTarget {
    /// Back to the unplaced list.
    Inbox,
    /// Onto a stage at a start time.
    Slot {
        /// Target stage.
        stage_id: String,
        /// Requested start (snapped during validation).
        start: ClockTime,
    },
}

/// A requested move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Session being moved.
    pub session_id: String,
    /// Drop target.
    pub target: PlacementTarget,
}

/// Outcome of validating a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDecision {
    /// Session being moved.
    pub session_id: String,
    /// Target with the start already snapped.
    pub target: PlacementTarget,
    /// Conflicts that forbid the move.
    pub blocking: Vec<Conflict>,
    /// Conflicts that are shown but do not forbid the move.
    pub warnings: Vec<Conflict>,
}

impl PlacementRequest {
    /// Move to the inbox.
    pub fn to_inbox(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            target: PlacementTarget::Inbox,
        }
    }

    /// Move onto a stage.
    pub fn to_slot(
        session_id: impl Into<String>,
        stage_id: impl Into<String>,
        start: ClockTime,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            target: PlacementTarget::Slot {
                stage_id: stage_id.into(),
                start,
            },
        }
    }
}

impl PlacementDecision {
    fn new(session_id: &str, target: PlacementTarget) -> Self {
        Self {
            session_id: session_id.to_string(),
            target,
            blocking: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Whether the move may be applied.
    pub fn is_allowed(&self) -> bool {
        self.blocking.is_empty()
    }

    /// Snapped start time, if the target is a slot.
    pub fn snapped_start(&self) -> Option<ClockTime> {
        match &self.target {
            PlacementTarget::Slot { start, .. } => Some(*start),
            PlacementTarget::Inbox => None,
        }
    }

    /// Applies the target to a session copy.
    fn moved(&self, session: &Session) -> Session {
        let mut moved = session.clone();
        match &self.target {
            PlacementTarget::Inbox => {
                moved.stage_id = None;
                moved.start = None;
            }
            PlacementTarget::Slot { stage_id, start } => {
                moved.stage_id = Some(stage_id.clone());
                moved.start = Some(*start);
            }
        }
        moved
    }
}

/// Validates a move without changing the program.
///
/// # Errors
/// `PlannerError::UnknownSession` if the session id does not resolve.
pub fn validate_placement(
    program: &Program,
    request: &PlacementRequest,
    config: &PlannerConfig,
) -> Result<PlacementDecision> {
    let session = program
        .session(&request.session_id)
        .ok_or_else(|| PlannerError::UnknownSession(request.session_id.clone()))?;

    let target = match &request.target {
        PlacementTarget::Inbox => PlacementTarget::Inbox,
        PlacementTarget::Slot { stage_id, start } => PlacementTarget::Slot {
            stage_id: stage_id.clone(),
            start: start.snapped(config.snap_minutes),
        },
    };
    let mut decision = PlacementDecision::new(&session.id, target);

    if session.is_locked() {
        decision.blocking.push(Conflict::locked(session));
        return Ok(decision);
    }

    let PlacementTarget::Slot { stage_id, .. } = &decision.target else {
        return Ok(decision);
    };

    let Some(stage) = program.stage(stage_id) else {
        decision
            .blocking
            .push(Conflict::unknown_stage(session, stage_id));
        return Ok(decision);
    };
    if stage.hidden {
        decision.blocking.push(Conflict::hidden_stage(session, stage));
    }

    let candidate = decision.moved(session);
    if let Some(slot) = candidate.interval(config.default_duration_minutes) {
        let day = Interval::new(config.day_start_minutes(), config.day_end_minutes());
        if !day.covers(&slot) {
            decision
                .blocking
                .push(Conflict::outside_day(&candidate, slot, day));
        }
    }

    let others: Vec<&Session> = program
        .placed_sessions()
        .filter(|s| s.id != candidate.id && !s.is_rejected())
        .collect();

    for other in &others {
        if let Some(c) = check_stage_overlap(&candidate, other, config) {
            decision.blocking.push(c);
        }
    }
    for pause in &program.breaks {
        if let Some(c) = check_break_overlap(&candidate, pause, config) {
            decision.blocking.push(c);
        }
    }
    for other in &others {
        decision
            .warnings
            .extend(check_person_overlap(&candidate, other, config));
    }
    decision.warnings.extend(check_stage_limits(&candidate, stage));

    debug!(
        session = %candidate.id,
        stage = %stage.id,
        blocking = decision.blocking.len(),
        warnings = decision.warnings.len(),
        "placement validated"
    );
    Ok(decision)
}

/// Validates a move and, if allowed, writes it into the program.
///
/// # Errors
/// - `PlannerError::UnknownSession` if the session id does not resolve.
/// - `PlannerError::PlacementRejected` if any blocking conflict was found;
///   the program is left unchanged.
pub fn apply_placement(
    program: &mut Program,
    request: &PlacementRequest,
    config: &PlannerConfig,
) -> Result<PlacementDecision> {
    let decision = validate_placement(program, request, config)?;
    if let Some(first) = decision.blocking.first() {
        info!(session = %request.session_id, reason = %first.message, "placement rejected");
        return Err(PlannerError::PlacementRejected {
            session_id: request.session_id.clone(),
            reason: first.message.clone(),
        });
    }

    let session = program
        .session(&request.session_id)
        .ok_or_else(|| PlannerError::UnknownSession(request.session_id.clone()))?;
    let moved = decision.moved(session);
    program.replace_session(moved)?;
    info!(
        session = %request.session_id,
        warnings = decision.warnings.len(),
        "placement applied"
    );
    Ok(decision)
}

/// Grid start times on a stage where the session could be dropped
/// without blocking conflicts.
///
/// Tries every multiple of `snap_minutes` from day start until the
/// session would run past day end.
pub fn find_free_slots(
    program: &Program,
    session_id: &str,
    stage_id: &str,
    config: &PlannerConfig,
) -> Result<Vec<ClockTime>> {
    let session = program
        .session(session_id)
        .ok_or_else(|| PlannerError::UnknownSession(session_id.to_string()))?;
    if program.stage(stage_id).is_none() {
        return Err(PlannerError::UnknownStage(stage_id.to_string()));
    }

    let duration = session.effective_duration(config.default_duration_minutes);
    let step = config.snap_minutes.max(1);
    let mut free = Vec::new();
    let mut minute = config.day_start_minutes();
    while minute + duration <= config.day_end_minutes() {
        let start = ClockTime::from_minutes(minute);
        let request = PlacementRequest::to_slot(session_id, stage_id, start);
        if validate_placement(program, &request, config)?.is_allowed() {
            free.push(start);
        }
        minute += step;
    }
    Ok(free)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::ConflictType;
    use crate::models::{Break, SessionFormat, SessionStatus, Stage};

    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    fn sample_program() -> Program {
        Program::new()
            .with_stage(Stage::new("main").with_max_mics(2))
            .with_stage(Stage::new("tent"))
            .with_stage(Stage::new("archive").hidden())
            .with_break(Break::new("lunch", ClockTime::hm(13, 0), 60))
            .with_session(
                Session::new("S1", "Keynote")
                    .with_speaker("Ada")
                    .placed("main", ClockTime::hm(10, 0)),
            )
            .with_session(
                Session::new("S2", "Panel")
                    .with_speaker("Ada")
                    .with_speaker("Bob")
                    .with_moderator("Cy"),
            )
            .with_session(
                Session::new("S3", "Pinned")
                    .locked()
                    .placed("tent", ClockTime::hm(10, 0)),
            )
    }

    fn drop_at(
        program: &Program,
        session_id: &str,
        stage_id: &str,
        start: ClockTime,
        config: &PlannerConfig,
    ) -> PlacementDecision {
        let request = PlacementRequest::to_slot(session_id, stage_id, start);
        validate_placement(program, &request, config).unwrap()
    }

    fn types(conflicts: &[Conflict]) -> Vec<ConflictType> {
        conflicts.iter().map(|c| c.conflict_type).collect()
    }

    #[test]
    fn test_free_slot_allowed() {
        let p = sample_program();
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(14, 0), &config());
        assert!(d.is_allowed());
        assert!(d.warnings.is_empty());
        assert_eq!(d.snapped_start(), Some(ClockTime::hm(14, 0)));
    }

    #[test]
    fn test_start_is_snapped() {
        let p = sample_program();
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(14, 3), &config());
        assert_eq!(d.snapped_start(), Some(ClockTime::hm(14, 5)));
    }

    #[test]
    fn test_stage_overlap_blocks() {
        let p = sample_program();
        let d = drop_at(&p, "S2", "main", ClockTime::hm(10, 30), &config());
        assert!(!d.is_allowed());
        assert_eq!(d.blocking[0].conflict_type, ConflictType::StageOverlap);
    }

    #[test]
    fn test_moving_within_own_slot_is_not_self_overlap() {
        let p = sample_program();
        let d = drop_at(&p, "S1", "main", ClockTime::hm(10, 15), &config());
        assert!(d.is_allowed());
    }

    #[test]
    fn test_break_blocks_but_pause_exempt() {
        let mut p = sample_program();
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(12, 30), &config());
        assert_eq!(types(&d.blocking), vec![ConflictType::BreakOverlap]);

        p.upsert_session(Session::new("P1", "Lunch").with_format(SessionFormat::Pause));
        let d = drop_at(&p, "P1", "tent", ClockTime::hm(13, 0), &config());
        assert!(d.is_allowed());
    }

    #[test]
    fn test_buffer_blocks_adjacent_drops() {
        let p = sample_program();
        let buffered = config().with_buffer(10);

        // right after S1 on main
        let d = drop_at(&p, "S2", "main", ClockTime::hm(11, 0), &config());
        assert!(d.is_allowed());
        let d = drop_at(&p, "S2", "main", ClockTime::hm(11, 0), &buffered);
        assert_eq!(types(&d.blocking), vec![ConflictType::StageOverlap]);

        // ends exactly when lunch starts
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(12, 0), &config());
        assert!(d.is_allowed());
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(12, 0), &buffered);
        assert_eq!(types(&d.blocking), vec![ConflictType::BreakOverlap]);
    }

    #[test]
    fn test_buffer_turns_adjacent_person_into_warning() {
        let p = sample_program().with_stage(Stage::new("lawn"));
        let d = drop_at(&p, "S2", "lawn", ClockTime::hm(11, 0), &config());
        assert!(d.warnings.is_empty());

        let d = drop_at(&p, "S2", "lawn", ClockTime::hm(11, 0), &config().with_buffer(10));
        assert!(d.is_allowed());
        assert_eq!(types(&d.warnings), vec![ConflictType::PersonDoubleBooked]);
    }

    #[test]
    fn test_person_and_mic_are_warnings() {
        let p = sample_program();
        // Ada is in S1 on main 10:00-11:00; S2 needs 3 mics, main has 2.
        // tent is busy with the pinned S3 10:00-11:00
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(10, 30), &config());
        assert_eq!(d.blocking.len(), 1);

        let d = drop_at(&p, "S2", "main", ClockTime::hm(11, 0), &config());
        assert!(d.is_allowed());
        assert_eq!(types(&d.warnings), vec![ConflictType::MicLimitExceeded]);

        let mut p2 = sample_program().with_stage(Stage::new("lawn"));
        p2.upsert_session(Session::new("S4", "Solo").with_speaker("Ada"));
        let d = drop_at(&p2, "S4", "lawn", ClockTime::hm(10, 30), &config());
        assert!(d.is_allowed());
        assert_eq!(types(&d.warnings), vec![ConflictType::PersonDoubleBooked]);
    }

    #[test]
    fn test_locked_session_cannot_move() {
        let p = sample_program();
        let d = validate_placement(&p, &PlacementRequest::to_inbox("S3"), &config()).unwrap();
        assert!(!d.is_allowed());
        assert_eq!(d.blocking[0].conflict_type, ConflictType::Locked);

        let mut p2 = sample_program();
        p2.upsert_session(Session::new("S5", "Fixed").with_status(SessionStatus::Fixed));
        let d = drop_at(&p2, "S5", "main", ClockTime::hm(15, 0), &config());
        assert_eq!(d.blocking[0].conflict_type, ConflictType::Locked);
    }

    #[test]
    fn test_inbox_always_allowed() {
        let p = sample_program();
        let d = validate_placement(&p, &PlacementRequest::to_inbox("S1"), &config()).unwrap();
        assert!(d.is_allowed());
        assert_eq!(d.snapped_start(), None);
    }

    #[test]
    fn test_unknown_and_hidden_stage() {
        let p = sample_program();
        let d = drop_at(&p, "S2", "ghost", ClockTime::hm(15, 0), &config());
        assert_eq!(types(&d.blocking), vec![ConflictType::UnknownStage]);

        let d = drop_at(&p, "S2", "archive", ClockTime::hm(15, 0), &config());
        assert_eq!(d.blocking[0].conflict_type, ConflictType::HiddenStage);
    }

    #[test]
    fn test_outside_day() {
        let p = sample_program();
        let d = drop_at(&p, "S2", "tent", ClockTime::hm(21, 30), &config());
        assert_eq!(d.blocking[0].conflict_type, ConflictType::OutsideDay);

        let d = drop_at(&p, "S2", "tent", ClockTime::hm(8, 0), &config());
        assert_eq!(d.blocking[0].conflict_type, ConflictType::OutsideDay);
    }

    #[test]
    fn test_unknown_session_is_error() {
        let p = sample_program();
        assert!(matches!(
            validate_placement(&p, &PlacementRequest::to_inbox("nope"), &config()),
            Err(PlannerError::UnknownSession(_))
        ));
    }

    #[test]
    fn test_apply_placement() {
        let mut p = sample_program();
        let request = PlacementRequest::to_slot("S2", "tent", ClockTime::hm(14, 2));
        apply_placement(&mut p, &request, &config()).unwrap();
        let s2 = p.session("S2").unwrap();
        assert_eq!(s2.stage_id.as_deref(), Some("tent"));
        assert_eq!(s2.start, Some(ClockTime::hm(14, 0)));

        apply_placement(&mut p, &PlacementRequest::to_inbox("S2"), &config()).unwrap();
        assert!(!p.session("S2").unwrap().is_placed());
    }

    #[test]
    fn test_apply_rejected_leaves_program() {
        let mut p = sample_program();
        let before = p.clone();
        let request = PlacementRequest::to_slot("S2", "main", ClockTime::hm(10, 0));
        let err = apply_placement(&mut p, &request, &config()).unwrap_err();
        assert!(matches!(err, PlannerError::PlacementRejected { .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn test_find_free_slots() {
        let p = Program::new()
            .with_stage(Stage::new("main"))
            .with_session(Session::new("A", "Busy").placed("main", ClockTime::hm(10, 0)))
            .with_session(Session::new("B", "Mover").with_duration(60));
        let cfg = config().with_day(9, 12);
        let free = find_free_slots(&p, "B", "main", &cfg).unwrap();
        // 09:00 fits before A, 11:00 is the last start that ends by noon
        assert_eq!(free, vec![ClockTime::hm(9, 0), ClockTime::hm(11, 0)]);

        assert!(matches!(
            find_free_slots(&p, "B", "ghost", &cfg),
            Err(PlannerError::UnknownStage(_))
        ));
    }

    #[test]
    fn test_find_free_slots_with_buffer() {
        let p = Program::new()
            .with_stage(Stage::new("main"))
            .with_session(Session::new("A", "Busy").placed("main", ClockTime::hm(10, 0)))
            .with_session(Session::new("B", "Mover").with_duration(60));
        let cfg = config().with_day(9, 13).with_buffer(15);
        let free = find_free_slots(&p, "B", "main", &cfg).unwrap();
        // 09:00 would end 15 minutes too close to A; 11:15..=12:00 remain
        assert_eq!(free.first(), Some(&ClockTime::hm(11, 15)));
        assert_eq!(free.last(), Some(&ClockTime::hm(12, 0)));
        assert_eq!(free.len(), 10);
    }
}
