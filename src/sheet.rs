//! Spreadsheet row codecs.
//!
//! Translates between Sheets value ranges (`Vec<Vec<String>>`, one inner
//! vector per row) and program models. Reading is lenient: short rows,
//! blank cells and stray whitespace are tolerated, and rows that cannot
//! be used are skipped with a debug log. Stage rows are the exception,
//! since stage limits drive conflict checks; a non-numeric limit there is
//! an error.
//!
//! # Layouts
//!
//! | Tab | Columns |
//! |-----|---------|
//! | SprecherInnen `A:I` | 0 status, 2 first name, 3 last name, 4 pronoun |
//! | Moderation `A:C` | 0 status, 1 name, 2 function |
//! | Programm_Export `A:N` | see below |
//! | Bühnen_Import `A:H` | 0 id, 1 name, 2 capacity, 3 max mics, 4 max speakers, 5 hidden |
//!
//! Program columns: 0 id, 1 title, 2 status, 3 day, 4 format, 5 stage,
//! 6 start, 7 end, 8 duration, 9 speakers, 10 moderators, 11 language,
//! 12 notes, 13 locked.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::models::{
    Person, Program, Pronoun, Session, SessionFlags, SessionFormat, SessionStatus, Stage,
    DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
};
use crate::time::{calculate_end_time, ClockTime, NO_TIME};

/// Speakers range.
pub const SPEAKERS_RANGE: &str = "'26_Kosmos_SprecherInnen'!A2:I";
/// Moderators range.
pub const MODERATORS_RANGE: &str = "'26_Kosmos_Moderation'!A2:C";
/// Program range.
pub const PROGRAM_RANGE: &str = "'Programm_Export'!A2:N";
/// Stages range.
pub const STAGES_RANGE: &str = "'Bühnen_Import'!A2:H";

/// Stage cell value meaning "not placed".
pub const INBOX_ID: &str = "Inbox";

/// Columns in a program row.
pub const PROGRAM_COLUMNS: usize = 14;

/// Speaker status prefixes that make it into the picker.
const SPEAKER_STATUS_PREFIXES: [&str; 3] = ["1", "2", "5"];

/// Body of a single `values.update` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRangeUpdate {
    /// A1 range, e.g. `'Programm_Export'!A5:N5`.
    pub range: String,
    /// Row-major cell values.
    pub values: Vec<Vec<String>>,
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn skip_header<'a>(rows: &'a [Vec<String>], column: usize, label: &str) -> &'a [Vec<String>] {
    match rows.first() {
        Some(first) if cell(first, column) == label => &rows[1..],
        _ => rows,
    }
}

/// Reads the speakers tab.
///
/// Keeps rows with at least five cells whose status starts with
/// `1`, `2` or `5`. Ids are `sp-N` in output order.
pub fn parse_speakers(rows: &[Vec<String>]) -> Vec<Person> {
    skip_header(rows, 2, "Vorname")
        .iter()
        .filter(|row| {
            row.len() >= 5
                && SPEAKER_STATUS_PREFIXES
                    .iter()
                    .any(|p| cell(row, 0).starts_with(p))
        })
        .enumerate()
        .map(|(i, row)| {
            let full_name = format!("{} {}", cell(row, 2), cell(row, 3))
                .trim()
                .to_string();
            Person::speaker(format!("sp-{i}"), full_name)
                .with_status(cell(row, 0))
                .with_pronoun(Pronoun::from_answer(cell(row, 4)))
        })
        .collect()
}

/// Reads the moderation tab.
///
/// Keeps rows with status `1…` whose function mentions moderation or
/// stage management. Ids are `mod-N` in output order.
pub fn parse_moderators(rows: &[Vec<String>]) -> Vec<Person> {
    skip_header(rows, 1, "Name")
        .iter()
        .filter(|row| {
            let function = cell(row, 2).to_lowercase();
            row.len() >= 3
                && cell(row, 0).starts_with('1')
                && (function.contains("moderat") || function.contains("stage"))
        })
        .enumerate()
        .map(|(i, row)| {
            Person::moderator(format!("mod-{i}"), cell(row, 1))
                .with_status(cell(row, 0))
                .with_function(cell(row, 2))
        })
        .collect()
}

/// Reads the program tab.
///
/// Rows without a title are skipped; fallback ids `prog-N` count the
/// remaining rows. Duration comes from column 8, then from end − start,
/// then defaults to 60; values outside one day are ignored. A start
/// without a stage is dropped so that every session is either placed or
/// in the inbox.
pub fn parse_program(rows: &[Vec<String>]) -> Vec<Session> {
    let titled = skip_header(rows, 1, "Titel")
        .iter()
        .enumerate()
        .filter(|(row_index, row)| {
            let keep = !cell(row, 1).is_empty();
            if !keep {
                debug!(row = row_index, "skipping program row without title");
            }
            keep
        });

    let mut sessions = Vec::new();
    for (index, (_, row)) in titled.enumerate() {
        let title = cell(row, 1);

        let id = match cell(row, 0) {
            "" => format!("prog-{index}"),
            id => id.to_string(),
        };
        let stage_id = match cell(row, 5) {
            "" => None,
            s if s.eq_ignore_ascii_case(INBOX_ID) => None,
            s => Some(s.to_string()),
        };
        let start = stage_id
            .as_ref()
            .and_then(|_| ClockTime::parse(cell(row, 6)));
        let end = ClockTime::parse(cell(row, 7));

        let in_range = |d: &i32| (1..=MAX_DURATION_MINUTES).contains(d);
        let duration = cell(row, 8)
            .parse::<i32>()
            .ok()
            .filter(in_range)
            .or_else(|| {
                let from = ClockTime::parse(cell(row, 6))?;
                let to = end?;
                Some(to.minutes() - from.minutes()).filter(in_range)
            })
            .unwrap_or(DEFAULT_DURATION_MINUTES);

        let mut session = Session::new(id, title)
            .with_duration(duration)
            .with_status(SessionStatus::parse(cell(row, 2)))
            .with_format(SessionFormat::parse(cell(row, 4)));
        session.stage_id = stage_id;
        session.start = start;
        session.day = cell(row, 3).to_string();
        session.speakers = split_names(cell(row, 9));
        session.moderators = split_names(cell(row, 10));
        session.language = cell(row, 11).to_string();
        session.notes = cell(row, 12).to_string();
        session.flags = SessionFlags {
            locked: is_true(cell(row, 13)),
            published: false,
        };
        sessions.push(session);
    }
    sessions
}

fn parse_limit(row: &[String], idx: usize, row_index: usize, what: &str) -> Result<Option<u32>> {
    match cell(row, idx) {
        "" => Ok(None),
        v => v
            .parse::<u32>()
            .map(|n| (n > 0).then_some(n))
            .map_err(|_| PlannerError::SheetRow {
                row: row_index,
                message: format!("{what} '{v}' is not a number"),
            }),
    }
}

/// Reads the stages tab.
///
/// # Errors
/// `PlannerError::SheetRow` if capacity, max mics or max speakers is
/// present but not a non-negative integer. Zero counts as unset.
pub fn parse_stages(rows: &[Vec<String>]) -> Result<Vec<Stage>> {
    let mut stages = Vec::new();
    for (index, row) in skip_header(rows, 1, "Name").iter().enumerate() {
        let id = cell(row, 0);
        if id.is_empty() {
            debug!(row = index, "skipping stage row without id");
            continue;
        }
        let name = match cell(row, 1) {
            "" => id,
            n => n,
        };
        stages.push(Stage {
            id: id.to_string(),
            name: name.to_string(),
            capacity: parse_limit(row, 2, index, "capacity")?,
            max_mics: parse_limit(row, 3, index, "max mics")?,
            max_speakers: parse_limit(row, 4, index, "max speakers")?,
            hidden: is_true(cell(row, 5)),
        });
    }
    Ok(stages)
}

/// Builds a program from a `batchGet` response.
///
/// `ranges` must be in the order speakers, moderators, program, stages
/// (see the `*_RANGE` constants). Missing trailing ranges are treated as
/// empty.
pub fn load_program(ranges: &[Vec<Vec<String>>]) -> Result<Program> {
    let empty: Vec<Vec<String>> = Vec::new();
    let range = |i: usize| ranges.get(i).unwrap_or(&empty);

    let mut people = parse_speakers(range(0));
    people.extend(parse_moderators(range(1)));
    let program = Program {
        sessions: parse_program(range(2)),
        stages: parse_stages(range(3))?,
        breaks: Vec::new(),
        people,
    };
    debug!(
        sessions = program.sessions.len(),
        stages = program.stages.len(),
        people = program.people.len(),
        "program loaded"
    );
    Ok(program)
}

/// Writes a session in program-tab layout.
pub fn session_to_row(session: &Session) -> Vec<String> {
    let start = session
        .start
        .map(|t| t.to_string())
        .unwrap_or_else(|| NO_TIME.to_string());
    vec![
        session.id.clone(),
        session.title.clone(),
        session.status.label().to_string(),
        session.day.clone(),
        session.format.label().to_string(),
        session
            .stage_id
            .clone()
            .unwrap_or_else(|| INBOX_ID.to_string()),
        start.clone(),
        calculate_end_time(&start, session.duration),
        session.duration.to_string(),
        session.speakers.join(", "),
        session.moderators.join(", "),
        session.language.clone(),
        session.notes.clone(),
        if session.flags.locked { "TRUE" } else { "FALSE" }.to_string(),
    ]
}

/// Update body replacing the whole program tab body (from row 2).
pub fn program_update(sessions: &[Session]) -> ValueRangeUpdate {
    ValueRangeUpdate {
        range: PROGRAM_RANGE.to_string(),
        values: sessions.iter().map(session_to_row).collect(),
    }
}

/// Update body for one session at a 1-based sheet row.
pub fn session_update(session: &Session, sheet_row: usize) -> ValueRangeUpdate {
    ValueRangeUpdate {
        range: format!("'Programm_Export'!A{sheet_row}:N{sheet_row}"),
        values: vec![session_to_row(session)],
    }
}

/// Makes text safe for a naive comma-separated export.
///
/// Commas and newlines become spaces; double quotes are doubled.
pub fn clean_for_csv(text: &str) -> String {
    text.trim()
        .replace(',', " ")
        .replace(['\n', '\r'], " ")
        .replace('"', "\"\"")
}

/// One CSV line in program-tab layout.
pub fn session_to_csv_line(session: &Session) -> String {
    session_to_row(session)
        .iter()
        .map(|v| clean_for_csv(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Random five-digit session id.
pub fn generate_id() -> String {
    rand::rng().random_range(10_000..100_000).to_string()
}
