//! Festival program planning.
//!
//! Provides the domain models of a multi-stage festival program and the
//! rules that keep it consistent: who is where, on which stage, when.
//! Placement is interactive (drag and drop); this crate decides whether a
//! drop is allowed and why not. It does not search for a schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Session`, `Stage`, `Break`, `Person`, `Program`
//! - **`time`**: Clock times, 5-minute snapping, intervals with buffer overlap
//! - **`conflicts`**: Full-program scan for double bookings, stage overlaps,
//!   break overlaps and stage limits
//! - **`placement`**: Drop validation, apply, free-slot search
//! - **`validation`**: Input integrity checks (duplicate IDs, stage refs, people)
//! - **`production`**: Technical riders, mic overbooking, equipment peaks
//! - **`stats`**: Program KPIs (placement rate, stage utilization)
//! - **`sheet`**: Spreadsheet row codecs for people, program and stages
//! - **`curation`**: Reviewer ratings, search, filters and sorting
//! - **`config`**: `PlannerConfig` loaded from TOML
//! - **`error`**: `PlannerError` and `Result`
//!
//! # Time model
//!
//! All times are minutes since midnight of one festival day. A session
//! occupies the half-open interval `[start, start + duration)`; two
//! bookings conflict when they overlap after extending both by the
//! configured buffer.

pub mod config;
pub mod conflicts;
pub mod curation;
pub mod error;
pub mod models;
pub mod placement;
pub mod production;
pub mod sheet;
pub mod stats;
pub mod time;
pub mod validation;

pub use config::PlannerConfig;
pub use conflicts::{detect_conflicts, Conflict, ConflictType};
pub use error::{PlannerError, Result};
pub use placement::{apply_placement, validate_placement, PlacementDecision, PlacementRequest};
