//! Enumerations shared by the store, the CLI and the terminal UI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
///
/// Stored in snake case (`in_progress`) so existing data files load as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Waiting,
    #[serde(alias = "in-progress")]
    InProgress,
    Paused,
    Completed,
}

impl Status {
    /// Rank used by the `recommended` ordering: paused work first, done work last.
    pub fn recommended_rank(self) -> u8 {
        match self {
            Status::Paused => 0,
            Status::Waiting => 1,
            Status::InProgress => 2,
            Status::Completed => 3,
        }
    }

    /// Wire name, as written to the data file.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Waiting => "waiting",
            Status::InProgress => "in_progress",
            Status::Paused => "paused",
            Status::Completed => "completed",
        }
    }
}

/// Orderings offered for a day's task list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    /// Ascending by `order`.
    #[default]
    Created,
    /// Paused, waiting, in progress, completed; then `order`.
    Recommended,
    /// By category id, uncategorised last; then `order`.
    Category,
    /// Most worked-on first; then `order`.
    WorkTime,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Created,
        SortMode::Recommended,
        SortMode::Category,
        SortMode::WorkTime,
    ];

    /// Next mode in the cycle, used by the terminal UI.
    pub fn next(self) -> SortMode {
        let idx = SortMode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        SortMode::ALL[(idx + 1) % SortMode::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Created => "Created",
            SortMode::Recommended => "Recommended",
            SortMode::Category => "Category",
            SortMode::WorkTime => "Work time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in [Status::Waiting, Status::InProgress, Status::Paused, Status::Completed] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn sort_mode_cycle_visits_every_mode() {
        let mut mode = SortMode::Created;
        let mut seen = Vec::new();
        for _ in 0..SortMode::ALL.len() {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(seen, SortMode::ALL.to_vec());
        assert_eq!(mode, SortMode::Created);
    }

    #[test]
    fn work_time_uses_camel_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&SortMode::WorkTime).unwrap(), "\"workTime\"");
    }
}
