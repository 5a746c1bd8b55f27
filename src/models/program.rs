//! Program (the whole planning state).
//!
//! Holds sessions, stages, breaks and people as plain vectors. Updates
//! replace whole records; there is no partial mutation API.

use serde::{Deserialize, Serialize};

use super::{normalize_name, Break, Person, PersonRole, Session, Stage};
use crate::error::{PlannerError, Result};

/// A festival program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// All sessions, placed or in the inbox.
    pub sessions: Vec<Session>,
    /// Stages in display order.
    pub stages: Vec<Stage>,
    /// Breaks.
    pub breaks: Vec<Break>,
    /// Speakers and moderators.
    pub people: Vec<Person>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.sessions.push(session);
        self
    }

    /// Adds a stage.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Adds a break.
    pub fn with_break(mut self, pause: Break) -> Self {
        self.breaks.push(pause);
        self
    }

    /// Adds a person.
    pub fn with_person(mut self, person: Person) -> Self {
        self.people.push(person);
        self
    }

    /// Finds a session by id.
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Finds a stage by id.
    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Finds a person by (normalized) name.
    pub fn person(&self, name: &str) -> Option<&Person> {
        let key = normalize_name(name);
        self.people
            .iter()
            .find(|p| normalize_name(&p.full_name) == key)
    }

    /// Stages that are not hidden.
    pub fn visible_stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter().filter(|s| !s.hidden)
    }

    /// People with the given role.
    pub fn people_with_role(&self, role: PersonRole) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(move |p| p.role == role)
    }

    /// Sessions with a stage and a start time.
    pub fn placed_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| s.is_placed())
    }

    /// Sessions without a stage or start time.
    pub fn inbox(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| !s.is_placed())
    }

    /// Placed sessions on a stage, sorted by start.
    pub fn sessions_on_stage(&self, stage_id: &str) -> Vec<&Session> {
        let mut on_stage: Vec<&Session> = self
            .placed_sessions()
            .filter(|s| s.is_on_stage(stage_id))
            .collect();
        on_stage.sort_by_key(|s| s.start);
        on_stage
    }

    /// Sessions a person appears in (as speaker or moderator).
    pub fn sessions_for_person(&self, name: &str) -> Vec<&Session> {
        let key = normalize_name(name);
        self.sessions
            .iter()
            .filter(|s| s.people().any(|p| normalize_name(p) == key))
            .collect()
    }

    /// Replaces the session with the same id.
    pub fn replace_session(&mut self, session: Session) -> Result<()> {
        let slot = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or_else(|| PlannerError::UnknownSession(session.id.clone()))?;
        *slot = session;
        Ok(())
    }

    /// Inserts a session or replaces the one with the same id.
    pub fn upsert_session(&mut self, session: Session) {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(slot) => *slot = session,
            None => self.sessions.push(session),
        }
    }

    /// Removes a session, returning it.
    pub fn remove_session(&mut self, id: &str) -> Result<Session> {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PlannerError::UnknownSession(id.to_string()))?;
        Ok(self.sessions.remove(idx))
    }

    /// Number of sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
