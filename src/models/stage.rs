//! Stage model.
//!
//! A stage is a column in the timeline. Limits are optional; an unset
//! limit is never checked.

use serde::{Deserialize, Serialize};

/// A stage (room, tent, open-air area).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique stage identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Audience seats.
    pub capacity: Option<u32>,
    /// Microphones available at the same time.
    pub max_mics: Option<u32>,
    /// Speakers that fit on the podium.
    pub max_speakers: Option<u32>,
    /// Hidden stages are not shown and accept no placements.
    pub hidden: bool,
}

impl Stage {
    /// Creates a visible stage without limits.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity: None,
            max_mics: None,
            max_speakers: None,
            hidden: false,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the audience capacity.
    pub fn with_capacity(mut self, seats: u32) -> Self {
        self.capacity = Some(seats);
        self
    }

    /// Sets the microphone limit.
    pub fn with_max_mics(mut self, mics: u32) -> Self {
        self.max_mics = Some(mics);
        self
    }

    /// Sets the speaker limit.
    pub fn with_max_speakers(mut self, speakers: u32) -> Self {
        self.max_speakers = Some(speakers);
        self
    }

    /// Hides the stage.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mic limit, or `default` when unset.
    pub fn mic_limit_or(&self, default: u32) -> u32 {
        self.max_mics.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_builder() {
        let s = Stage::new("main")
            .with_name("Main Stage")
            .with_capacity(800)
            .with_max_mics(6)
            .with_max_speakers(5);

        assert_eq!(s.id, "main");
        assert_eq!(s.name, "Main Stage");
        assert_eq!(s.capacity, Some(800));
        assert_eq!(s.mic_limit_or(4), 6);
        assert_eq!(s.max_speakers, Some(5));
        assert!(!s.hidden);
    }

    #[test]
    fn test_stage_defaults() {
        let s = Stage::new("tent").hidden();
        assert_eq!(s.name, "tent");
        assert!(s.hidden);
        assert_eq!(s.mic_limit_or(4), 4);
    }
}
