use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completion-status criterion of a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    /// Whether a task with the given completion flag passes.
    pub fn admits(self, is_completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !is_completed,
            StatusFilter::Completed => is_completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "unknown status '{}' (expected all, active or completed)",
                other
            )),
        }
    }
}

/// The active criteria of a filtered view. Every set criterion must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: StatusFilter,
    /// Case-insensitive substring of the root title; empty matches everything
    pub search: String,
    /// Calendar date (UTC) the root task must have been completed on
    pub completed_on: Option<NaiveDate>,
    /// At least one of these must appear in the root task's subtree
    pub tags: Vec<String>,
}

impl TaskQuery {
    /// Completed views are bucketed by completion date.
    pub fn groups_by_date(&self) -> bool {
        self.status == StatusFilter::Completed || self.completed_on.is_some()
    }
}
