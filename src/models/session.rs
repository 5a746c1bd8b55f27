//! Session model.
//!
//! A session is one program item: a talk, panel, workshop or similar.
//! It is *placed* when it has both a stage and a start time; otherwise it
//! sits in the inbox.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::{ClockTime, Interval};

/// Duration assumed when a session has none (minutes).
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Longest session accepted from sheet data (one day, minutes).
pub const MAX_DURATION_MINUTES: i32 = 24 * 60;

/// A program session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Title shown on the card.
    pub title: String,
    /// Format (Talk, Panel, ...).
    pub format: SessionFormat,
    /// Length in minutes.
    pub duration: i32,
    /// Speaker names.
    pub speakers: Vec<String>,
    /// Moderator names.
    pub moderators: Vec<String>,
    /// Assigned stage. `None` = inbox.
    pub stage_id: Option<String>,
    /// Start time. `None` = unscheduled.
    pub start: Option<ClockTime>,
    /// Curation / booking status.
    pub status: SessionStatus,
    /// Boolean markers.
    pub flags: SessionFlags,
    /// Festival day label (e.g. "20.09.").
    pub day: String,
    /// Language code.
    pub language: String,
    /// Partner organisation.
    pub partner: String,
    /// Internal notes.
    pub notes: String,
    /// Program area ("Bereich").
    pub area: String,
    /// Topic ("Thema").
    pub topic: String,
    /// Teaser text.
    pub short_description: String,
    /// Full description.
    pub description: String,
}

/// Boolean markers on a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    /// Pinned in place; drag-and-drop must not move it.
    pub locked: bool,
    /// Visible in the public program.
    pub published: bool,
}

/// Session status.
///
/// Sheet values may carry a sort prefix (`5_Vorschlag`, `1_Zusage`);
/// the prefix is ignored when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Submitted, not yet decided.
    #[default]
    Proposed,
    /// Speakers have been invited.
    Invited,
    /// Confirmed.
    Accepted,
    /// Declined; ignored by conflict checks.
    Rejected,
    /// Confirmed and pinned to its slot.
    Fixed,
    /// Any other sheet value, kept verbatim.
    Other(String),
}

/// Session format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionFormat {
    /// No format set.
    #[default]
    Unspecified,
    /// Talk (English program).
    Talk,
    /// Talk (German program).
    Vortrag,
    /// Panel discussion.
    Panel,
    /// Hands-on workshop.
    Workshop,
    /// Short talk, usually in a series.
    LightningTalk,
    /// A break rendered as a session card.
    Pause,
    /// Headline talk.
    Keynote,
    /// Any other sheet value, kept verbatim.
    Other(String),
}

impl Session {
    /// Creates an unplaced session with default duration.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            format: SessionFormat::default(),
            duration: DEFAULT_DURATION_MINUTES,
            speakers: Vec::new(),
            moderators: Vec::new(),
            stage_id: None,
            start: None,
            status: SessionStatus::default(),
            flags: SessionFlags::default(),
            day: String::new(),
            language: String::new(),
            partner: String::new(),
            notes: String::new(),
            area: String::new(),
            topic: String::new(),
            short_description: String::new(),
            description: String::new(),
        }
    }

    /// Sets the format.
    pub fn with_format(mut self, format: SessionFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the duration (minutes).
    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.duration = minutes;
        self
    }

    /// Adds a speaker.
    pub fn with_speaker(mut self, name: impl Into<String>) -> Self {
        self.speakers.push(name.into());
        self
    }

    /// Adds a moderator.
    pub fn with_moderator(mut self, name: impl Into<String>) -> Self {
        self.moderators.push(name.into());
        self
    }

    /// Places the session on a stage at a start time.
    pub fn placed(mut self, stage_id: impl Into<String>, start: ClockTime) -> Self {
        self.stage_id = Some(stage_id.into());
        self.start = Some(start);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the session as locked.
    pub fn locked(mut self) -> Self {
        self.flags.locked = true;
        self
    }

    /// Whether the session has both stage and start.
    pub fn is_placed(&self) -> bool {
        self.stage_id.is_some() && self.start.is_some()
    }

    /// Whether drag-and-drop must leave this session alone.
    pub fn is_locked(&self) -> bool {
        self.flags.locked || self.status == SessionStatus::Fixed
    }

    /// Whether the session has been declined.
    pub fn is_rejected(&self) -> bool {
        self.status == SessionStatus::Rejected
    }

    /// Whether the session itself is a break.
    pub fn is_pause(&self) -> bool {
        self.format == SessionFormat::Pause
    }

    /// Duration, falling back to `default` when not positive.
    pub fn effective_duration(&self, default: i32) -> i32 {
        if self.duration > 0 {
            self.duration
        } else {
            default
        }
    }

    /// Occupied interval, if the session has a start.
    pub fn interval(&self, default_duration: i32) -> Option<Interval> {
        self.start
            .map(|s| Interval::from_start(s, self.effective_duration(default_duration)))
    }

    /// Speakers followed by moderators.
    pub fn people(&self) -> impl Iterator<Item = &str> {
        self.speakers
            .iter()
            .chain(self.moderators.iter())
            .map(String::as_str)
    }

    /// Speakers plus moderators; each needs a microphone.
    pub fn mic_demand(&self) -> usize {
        self.speakers.len() + self.moderators.len()
    }

    /// Whether the stage id matches.
    pub fn is_on_stage(&self, stage_id: &str) -> bool {
        self.stage_id.as_deref() == Some(stage_id)
    }
}

impl SessionStatus {
    /// Parses a sheet value, ignoring a leading `N_` prefix.
    pub fn parse(value: &str) -> Self {
        let raw = value.trim();
        let label = match raw.split_once('_') {
            Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => raw,
        };
        match label.to_lowercase().as_str() {
            "" | "vorschlag" | "proposed" => Self::Proposed,
            "eingeladen" | "invited" => Self::Invited,
            "akzeptiert" | "zusage" | "accepted" => Self::Accepted,
            "abgelehnt" | "absage" | "rejected" => Self::Rejected,
            "fixiert" | "fixed" => Self::Fixed,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Label written back to the sheet.
    pub fn label(&self) -> &str {
        match self {
            Self::Proposed => "Vorschlag",
            Self::Invited => "Eingeladen",
            Self::Accepted => "Akzeptiert",
            Self::Rejected => "Abgelehnt",
            Self::Fixed => "Fixiert",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl SessionFormat {
    /// Parses a sheet value (case-insensitive for known formats).
    pub fn parse(value: &str) -> Self {
        let raw = value.trim();
        match raw.to_lowercase().as_str() {
            "" => Self::Unspecified,
            "talk" => Self::Talk,
            "vortrag" => Self::Vortrag,
            "panel" => Self::Panel,
            "workshop" => Self::Workshop,
            "lightning talk" | "lightning" => Self::LightningTalk,
            "pause" | "break" => Self::Pause,
            "keynote" => Self::Keynote,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Label written back to the sheet.
    pub fn label(&self) -> &str {
        match self {
            Self::Unspecified => "",
            Self::Talk => "Talk",
            Self::Vortrag => "Vortrag",
            Self::Panel => "Panel",
            Self::Workshop => "Workshop",
            Self::LightningTalk => "Lightning Talk",
            Self::Pause => "Pause",
            Self::Keynote => "Keynote",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for SessionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
