//! Input validation for loaded programs.
//!
//! Checks structural integrity of sessions, stages and breaks after they
//! come out of the sheet and before conflict detection. Detects:
//! - Duplicate IDs
//! - Non-positive or longer-than-a-day durations
//! - Missing stage references
//! - Half-placed sessions (stage without start or start without stage)
//! - Unknown speaker / moderator names
//!
//! Time conflicts are not reported here; see [`crate::conflicts`].

use crate::models::{normalize_name, Program, MAX_DURATION_MINUTES};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A session or break has no positive duration, or lasts over a day.
    InvalidDuration,
    /// A session or break references a stage that doesn't exist.
    InvalidStageReference,
    /// A session has a stage but no start, or a start but no stage.
    IncompletePlacement,
    /// A speaker or moderator name is not in the people list.
    UnknownPerson,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a program.
///
/// Checks:
/// 1. No duplicate stage IDs
/// 2. No duplicate session IDs
/// 3. No duplicate break IDs
/// 4. All sessions and breaks last between 1 minute and one day
/// 5. All stage references point to existing stages
/// 6. Stage and start are set together
/// 7. All speaker/moderator names exist (skipped when no people are loaded)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_program(program: &Program) -> ValidationResult {
    let mut errors = Vec::new();

    let mut stage_ids = HashSet::new();
    for stage in &program.stages {
        if !stage_ids.insert(stage.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate stage ID: {}", stage.id),
            ));
        }
    }

    let mut session_ids = HashSet::new();
    for session in &program.sessions {
        if !session_ids.insert(session.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate session ID: {}", session.id),
            ));
        }
    }

    let mut break_ids = HashSet::new();
    for pause in &program.breaks {
        if !break_ids.insert(pause.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate break ID: {}", pause.id),
            ));
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&pause.duration) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Break '{}' has duration {}", pause.id, pause.duration),
            ));
        }
        if let Some(stage_id) = &pause.stage_id {
            if !stage_ids.contains(stage_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidStageReference,
                    format!("Break '{}' references unknown stage '{}'", pause.id, stage_id),
                ));
            }
        }
    }

    for session in &program.sessions {
        if !(1..=MAX_DURATION_MINUTES).contains(&session.duration) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Session '{}' has duration {}", session.id, session.duration),
            ));
        }

        match (&session.stage_id, session.start) {
            (Some(stage_id), _) if !stage_ids.contains(stage_id.as_str()) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidStageReference,
                    format!(
                        "Session '{}' references unknown stage '{}'",
                        session.id, stage_id
                    ),
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::IncompletePlacement,
                    format!("Session '{}' has only one of stage and start", session.id),
                ));
            }
            _ => {}
        }
    }

    // Check person references
    if !program.people.is_empty() {
        let known: HashSet<String> = program
            .people
            .iter()
            .map(|p| normalize_name(&p.full_name))
            .collect();
        for session in &program.sessions {
            for name in session.people() {
                if !known.contains(&normalize_name(name)) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownPerson,
                        format!("Session '{}' references unknown person '{}'", session.id, name),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Break, Person, Session, Stage};
    use crate::time::ClockTime;

    fn sample_program() -> Program {
        Program::new()
            .with_stage(Stage::new("main"))
            .with_stage(Stage::new("tent"))
            .with_person(Person::speaker("sp-0", "Ada Lovelace"))
            .with_person(Person::moderator("mod-0", "Grace Hopper"))
            .with_break(Break::new("lunch", ClockTime::hm(12, 0), 60))
            .with_session(
                Session::new("S1", "Talk")
                    .with_speaker("Ada Lovelace")
                    .with_moderator("grace hopper")
                    .placed("main", ClockTime::hm(10, 0)),
            )
            .with_session(Session::new("S2", "Inbox"))
    }

    #[test]
    fn test_valid_program() {
        assert!(validate_program(&sample_program()).is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let p = sample_program()
            .with_stage(Stage::new("main"))
            .with_session(Session::new("S2", "Copy"));

        let errors = validate_program(&p).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::DuplicateId)
                .count(),
            2
        );
        assert!(errors.iter().any(|e| e.message.contains("stage")));
    }

    #[test]
    fn test_invalid_duration() {
        let p = sample_program()
            .with_session(Session::new("S3", "Zero").with_duration(0))
            .with_session(Session::new("S4", "Forever").with_duration(i32::MAX))
            .with_break(Break::new("bad", ClockTime::hm(15, 0), -5));

        let errors = validate_program(&p).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidDuration)
                .count(),
            3
        );
    }

    #[test]
    fn test_invalid_stage_reference() {
        let p = sample_program()
            .with_session(Session::new("S3", "Lost").placed("ghost", ClockTime::hm(10, 0)))
            .with_break(Break::new("b2", ClockTime::hm(16, 0), 10).on_stage("ghost"));

        let errors = validate_program(&p).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidStageReference)
                .count(),
            2
        );
    }

    #[test]
    fn test_incomplete_placement() {
        let mut half = Session::new("S3", "Half");
        half.start = Some(ClockTime::hm(10, 0));
        let p = sample_program().with_session(half);

        let errors = validate_program(&p).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::IncompletePlacement));
    }

    #[test]
    fn test_unknown_person() {
        let p = sample_program().with_session(Session::new("S3", "Guest").with_speaker("Nobody"));

        let errors = validate_program(&p).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownPerson);
    }

    #[test]
    fn test_person_check_skipped_without_people() {
        let p = Program::new().with_session(Session::new("S1", "Guest").with_speaker("Anyone"));
        assert!(validate_program(&p).is_ok());
    }
}
