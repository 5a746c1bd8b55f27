//! People: speakers and moderators.
//!
//! Sessions refer to people by name. Matching goes through
//! [`normalize_name`] so that casing and stray whitespace from
//! spreadsheet cells do not split one person into two.

use serde::{Deserialize, Serialize};

/// A speaker or moderator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Identifier (sheet-derived, e.g. `sp-3`).
    pub id: String,
    /// Full display name; the reference key used by sessions.
    pub full_name: String,
    /// Role in the program.
    pub role: PersonRole,
    /// Raw status cell (e.g. `1_Zusage`).
    pub status: String,
    /// Pronoun category.
    pub pronoun: Pronoun,
    /// Function (moderators only, e.g. "Moderation").
    pub function: String,
}

/// Role of a person in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonRole {
    /// Gives a talk or sits on a panel.
    Speaker,
    /// Hosts a session or manages a stage.
    Moderator,
}

/// Pronoun category as collected in the registration sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pronoun {
    /// he/him
    Male,
    /// she/her
    Female,
    /// Non-binary or diverse.
    Diverse,
    /// No answer given.
    #[default]
    Unknown,
    /// Free-text answer kept verbatim.
    Other(String),
}

impl Person {
    /// Creates a speaker.
    pub fn speaker(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self::new(id, full_name, PersonRole::Speaker)
    }

    /// Creates a moderator.
    pub fn moderator(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self::new(id, full_name, PersonRole::Moderator)
    }

    fn new(id: impl Into<String>, full_name: impl Into<String>, role: PersonRole) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            role,
            status: String::new(),
            pronoun: Pronoun::Unknown,
            function: String::new(),
        }
    }

    /// Sets the status cell.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the pronoun.
    pub fn with_pronoun(mut self, pronoun: Pronoun) -> Self {
        self.pronoun = pronoun;
        self
    }

    /// Sets the function.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Whether `name` refers to this person.
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.full_name) == normalize_name(name)
    }
}

impl Pronoun {
    /// Maps a free-text registration answer to a category.
    ///
    /// Checks "woman" before "man" since one contains the other.
    pub fn from_answer(value: &str) -> Self {
        let v = value.trim().to_lowercase();
        if v.is_empty() {
            return Self::Unknown;
        }
        if v.contains("woman") || v.contains("frau") || v.contains("weiblich") {
            Self::Female
        } else if v.contains("man") || v.contains("männlich") {
            Self::Male
        } else if v.contains("div") || v.contains("non") {
            Self::Diverse
        } else {
            Self::Other(value.trim().to_string())
        }
    }
}

/// Canonical form of a person name: lowercase, single spaces.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_builder() {
        let p = Person::moderator("mod-0", "Grace Hopper")
            .with_status("1_Zusage")
            .with_function("Moderation");
        assert_eq!(p.role, PersonRole::Moderator);
        assert_eq!(p.function, "Moderation");
        assert_eq!(p.pronoun, Pronoun::Unknown);
    }

    #[test]
    fn test_name_matching() {
        let p = Person::speaker("sp-0", "Ada  Lovelace");
        assert!(p.matches("ada lovelace"));
        assert!(p.matches("  Ada Lovelace "));
        assert!(!p.matches("Ada"));
        assert_eq!(normalize_name(" Jane\tDoe "), "jane doe");
    }

    #[test]
    fn test_pronoun_mapping() {
        assert_eq!(Pronoun::from_answer("Woman"), Pronoun::Female);
        assert_eq!(Pronoun::from_answer("weiblich"), Pronoun::Female);
        assert_eq!(Pronoun::from_answer("Man"), Pronoun::Male);
        assert_eq!(Pronoun::from_answer("männlich"), Pronoun::Male);
        assert_eq!(Pronoun::from_answer("divers"), Pronoun::Diverse);
        assert_eq!(Pronoun::from_answer("non-binary"), Pronoun::Diverse);
        assert_eq!(Pronoun::from_answer(""), Pronoun::Unknown);
        assert_eq!(
            Pronoun::from_answer("they/them"),
            Pronoun::Other("they/them".into())
        );
    }
}
