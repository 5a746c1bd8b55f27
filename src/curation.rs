//! Curation: reviewer ratings, search and sorting.
//!
//! Reviewers score submitted sessions from 1 to 5; a score of 0 means
//! "not rated yet" and only carries a comment. The dashboard shows each
//! session with its average score and review count and lets curators
//! search, filter and sort the list.
//!
//! # Sorting
//!
//! | Key | Order |
//! |-----|-------|
//! | Title | Case-insensitive text |
//! | AverageScore | Numeric; unrated counts as 0 |
//! | ReviewCount | Numeric |
//! | Status | Case-insensitive status label |

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::models::{Session, SessionFormat, SessionStatus};

/// Highest score a reviewer can give.
pub const MAX_SCORE: u8 = 5;

/// One reviewer's rating of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Rated session.
    pub session_id: String,
    /// Reviewer e-mail or name.
    pub reviewer: String,
    /// Score 0..=5 (0 = comment only).
    pub score: u8,
    /// Free-text comment.
    pub comment: String,
}

impl Rating {
    /// Creates a rating; the score is clamped to `0..=5`.
    pub fn new(session_id: impl Into<String>, reviewer: impl Into<String>, score: u8) -> Self {
        Self {
            session_id: session_id.into(),
            reviewer: reviewer.into(),
            score: score.min(MAX_SCORE),
            comment: String::new(),
        }
    }

    /// Sets the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Reads the ratings tab: 0 session id, 1 reviewer, 2 score, 3 comment.
///
/// Rows without a session id are skipped. Unparseable scores count as 0.
pub fn parse_ratings(rows: &[Vec<String>]) -> Vec<Rating> {
    fn cell(row: &[String], i: usize) -> String {
        row.get(i).map(|s| s.trim().to_string()).unwrap_or_default()
    }

    rows.iter()
        .filter(|row| !cell(row, 0).is_empty())
        .map(|row| {
            let score = cell(row, 2).parse::<u8>().unwrap_or(0);
            Rating::new(cell(row, 0), cell(row, 1), score).with_comment(cell(row, 3))
        })
        .collect()
}

/// A session together with its rating figures.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary<'a> {
    /// The rated session.
    pub session: &'a Session,
    /// Mean of positive scores, one decimal. `None` if nobody scored.
    pub average_score: Option<f64>,
    /// Number of ratings, including comment-only ones.
    pub review_count: usize,
    /// The current reviewer's score (0 if none).
    pub my_score: u8,
    /// The current reviewer's comment.
    pub my_comment: String,
}

/// Attaches rating figures to every session.
///
/// `reviewer` is matched case-insensitively to pick out "my" rating.
pub fn summarize<'a>(
    sessions: &'a [Session],
    ratings: &[Rating],
    reviewer: &str,
) -> Vec<RatingSummary<'a>> {
    let me = reviewer.trim().to_lowercase();
    sessions
        .iter()
        .map(|session| {
            let mine: Vec<&Rating> = ratings
                .iter()
                .filter(|r| r.session_id == session.id)
                .collect();
            let scores: Vec<f64> = mine
                .iter()
                .filter(|r| r.score > 0)
                .map(|r| f64::from(r.score))
                .collect();
            let average_score = if scores.is_empty() {
                None
            } else {
                let avg = scores.iter().sum::<f64>() / scores.len() as f64;
                Some((avg * 10.0).round() / 10.0)
            };
            let own = mine
                .iter()
                .find(|r| !me.is_empty() && r.reviewer.trim().to_lowercase() == me);

            RatingSummary {
                session,
                average_score,
                review_count: mine.len(),
                my_score: own.map(|r| r.score).unwrap_or(0),
                my_comment: own.map(|r| r.comment.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

/// Sort key for the curation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Session title.
    Title,
    /// Mean reviewer score.
    #[default]
    AverageScore,
    /// Number of ratings.
    ReviewCount,
    /// Status label.
    Status,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Search, filter and sort settings for the curation list.
///
/// Empty search and `None` filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurationQuery {
    /// Text matched against title, id, speakers and description.
    pub search: String,
    /// Exact program area.
    pub area: Option<String>,
    /// Exact topic.
    pub topic: Option<String>,
    /// Exact format.
    pub format: Option<SessionFormat>,
    /// Exact status.
    pub status: Option<SessionStatus>,
    /// Sort key.
    pub sort_key: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl CurationQuery {
    /// Default query: everything, best average first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Filters by area.
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Filters by topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Filters by format.
    pub fn with_format(mut self, format: SessionFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Filters by status.
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the sort order.
    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.direction = direction;
        self
    }

    /// Clicking a column header: same key flips direction, new key starts
    /// descending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key && self.direction == SortDirection::Desc {
            self.direction = SortDirection::Asc;
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Desc;
        }
    }

    /// Whether a session passes search and filters.
    pub fn matches(&self, session: &Session) -> bool {
        let q = self.search.trim().to_lowercase();
        let found = q.is_empty()
            || session.title.to_lowercase().contains(&q)
            || session.id.to_lowercase().contains(&q)
            || session
                .speakers
                .iter()
                .any(|s| s.to_lowercase().contains(&q))
            || session.description.to_lowercase().contains(&q);

        found
            && self.area.as_ref().map_or(true, |a| &session.area == a)
            && self.topic.as_ref().map_or(true, |t| &session.topic == t)
            && self.format.as_ref().map_or(true, |f| &session.format == f)
            && self.status.as_ref().map_or(true, |s| &session.status == s)
    }

    /// Filters and sorts summaries. The sort is stable.
    pub fn apply<'a>(&self, summaries: Vec<RatingSummary<'a>>) -> Vec<RatingSummary<'a>> {
        let total = summaries.len();
        let mut out: Vec<RatingSummary<'a>> = summaries
            .into_iter()
            .filter(|s| self.matches(s.session))
            .collect();

        out.sort_by(|a, b| {
            let ord = self.compare(a, b);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        debug!(total, shown = out.len(), key = ?self.sort_key, "curation query applied");
        out
    }

    fn compare(&self, a: &RatingSummary<'_>, b: &RatingSummary<'_>) -> Ordering {
        match self.sort_key {
            SortKey::Title => a
                .session
                .title
                .to_lowercase()
                .cmp(&b.session.title.to_lowercase()),
            SortKey::AverageScore => a
                .average_score
                .unwrap_or(0.0)
                .total_cmp(&b.average_score.unwrap_or(0.0)),
            SortKey::ReviewCount => a.review_count.cmp(&b.review_count),
            SortKey::Status => a
                .session
                .status
                .label()
                .to_lowercase()
                .cmp(&b.session.status.label().to_lowercase()),
        }
    }
}
