//! Task data structure and related functionality.
//!
//! This module defines the `Task` record persisted in the data file, the
//! partial shapes used to create and edit it, and the elapsed-time maths tied
//! to its status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::whole_minutes_between;
use crate::fields::Status;

/// A to-do item scoped to the calendar day it was created for.
///
/// Field names are camelCase on disk (`dateCreated`, `totalTime`, ...) and the
/// start/end stamps are epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub date_created: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Accumulated minutes from finished sessions.
    #[serde(default)]
    pub total_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl Task {
    /// Stored minutes plus, while in progress, the whole minutes of the
    /// running session.
    pub fn effective_minutes(&self, now_ms: i64) -> u64 {
        match (self.status, self.start_time) {
            (Status::InProgress, Some(start)) => {
                self.total_time + whole_minutes_between(start, now_ms)
            }
            _ => self.total_time,
        }
    }

    /// Seconds of the running session, for the live ticker.
    pub fn session_seconds(&self, now_ms: i64) -> u64 {
        match (self.status, self.start_time) {
            (Status::InProgress, Some(start)) if now_ms > start => ((now_ms - start) / 1000) as u64,
            _ => 0,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Fields a caller may supply when creating a task. Everything else
/// (id, status, timing, children) is owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
    pub date_created: Option<NaiveDate>,
    pub parent_id: Option<String>,
    pub category: Option<String>,
    pub order: Option<i64>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date_created = Some(date);
        self
    }

    pub fn under(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// Shallow field-level edit. `None` leaves a field alone; for optional task
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub emoji: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub date_created: Option<NaiveDate>,
    pub category: Option<Option<String>>,
    pub order: Option<i64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(emoji) = self.emoji {
            task.emoji = emoji;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(date) = self.date_created {
            task.date_created = date;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(order) = self.order {
            task.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task {
            id: "todo_1_1".into(),
            title: "Write report".into(),
            emoji: None,
            description: None,
            status: Status::Waiting,
            date_created: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            start_time: None,
            end_time: None,
            total_time: 30,
            parent_id: None,
            children: Vec::new(),
            category: None,
            order: 0,
        }
    }

    #[test]
    fn effective_minutes_counts_running_session_only_in_progress() {
        let mut task = sample();
        task.start_time = Some(0);
        assert_eq!(task.effective_minutes(10 * 60_000), 30);

        task.status = Status::InProgress;
        assert_eq!(task.effective_minutes(10 * 60_000 + 59_000), 40);
        assert_eq!(task.session_seconds(10 * 60_000 + 59_000), 659);
    }

    #[test]
    fn patch_clears_and_sets_fields() {
        let mut task = sample();
        task.category = Some("default_1".into());
        TaskPatch {
            title: Some("Write summary".into()),
            category: Some(None),
            order: Some(7),
            ..TaskPatch::default()
        }
        .apply(&mut task);
        assert_eq!(task.title, "Write summary");
        assert_eq!(task.category, None);
        assert_eq!(task.order, 7);
        assert_eq!(task.total_time, 30);
    }

    #[test]
    fn reads_camel_case_document_records() {
        let json = r#"{
            "id": "todo_1700000000000_3",
            "title": "Stretch",
            "status": "in_progress",
            "dateCreated": "2024-05-02",
            "startTime": 1700000000000,
            "totalTime": 12,
            "parentId": "todo_1700000000000_1",
            "children": [],
            "order": 2
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.start_time, Some(1_700_000_000_000));
        assert_eq!(task.parent_id.as_deref(), Some("todo_1700000000000_1"));
        assert!(!task.is_top_level());
    }
}
