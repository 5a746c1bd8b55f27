//! Festival program domain models.
//!
//! Plain records with builder-style constructors. Names of people are
//! references into the program's people list; stage ids are references
//! into its stage list.
//!
//! # Domain Mappings
//!
//! | u-festival | Sheet tab | UI |
//! |------------|-----------|----|
//! | Session | Programm_Export | Program card |
//! | Stage | Bühnen_Import | Timeline column |
//! | Break | (config) | Grey band across columns |
//! | Person | SprecherInnen / Moderation | Picker lists |

mod pause;
mod person;
mod program;
mod session;
mod stage;

pub use pause::Break;
pub use person::{normalize_name, Person, PersonRole, Pronoun};
pub use program::Program;
pub use session::{Session, SessionFlags, SessionFormat, SessionStatus, DEFAULT_DURATION_MINUTES,
    MAX_DURATION_MINUTES,
};
pub use stage::Stage;
