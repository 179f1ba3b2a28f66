//! The task store: the single in-memory owner of the task collection.
//!
//! Every mutation writes the whole collection back through the [`Storage`]
//! bridge. A failed write is logged and swallowed; the in-memory list stays
//! authoritative and is never rolled back.
//!
//! Missing ids are not errors. Mutations report them as [`Lookup::NotFound`]
//! and leave the store untouched, so callers decide whether to care.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::clock::{day_at_offset, whole_minutes_between, Clock};
use crate::db::Storage;
use crate::fields::{SortMode, Status};
use crate::task::{Task, TaskDraft, TaskPatch};

/// Title given to sub-tasks created through [`TodoStore::add_child`].
pub const CHILD_PLACEHOLDER_TITLE: &str = "New sub-task";

/// Outcome of an operation addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound => None,
        }
    }
}

/// What a status change did to the task's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub from: Status,
    pub to: Status,
    /// Session minutes folded into `totalTime` by this change.
    pub minutes_added: u64,
    pub total_time: u64,
}

pub struct TodoStore {
    todos: Vec<Task>,
    storage: Rc<dyn Storage>,
    clock: Rc<dyn Clock>,
    next_seq: u64,
}

impl TodoStore {
    /// Build the store from whatever the storage holds. A read failure is
    /// logged and yields an empty store.
    pub fn load(storage: Rc<dyn Storage>, clock: Rc<dyn Clock>) -> Self {
        let todos = storage.todos().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load todos");
            Vec::new()
        });
        tracing::debug!(count = todos.len(), "todos loaded");
        Self {
            todos,
            storage,
            clock,
            next_seq: 1,
        }
    }

    /// Re-read the collection from storage (after an import or clear).
    pub fn reload(&mut self) {
        match self.storage.todos() {
            Ok(todos) => self.todos = todos,
            Err(e) => tracing::error!(error = %e, "failed to reload todos"),
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Direct children of `id`, in the parent's `children` order.
    pub fn children_of(&self, id: &str) -> Vec<&Task> {
        let Some(parent) = self.get(id) else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .filter_map(|child| self.get(child))
            .collect()
    }

    /// Create a task from `draft` and return its id.
    ///
    /// Status starts at waiting with no recorded time. The date defaults to
    /// today in the host's timezone. If the draft names an existing parent,
    /// the new id is appended to that parent's children.
    pub fn add(&mut self, draft: TaskDraft) -> String {
        let id = self.generate_id();
        let task = Task {
            id: id.clone(),
            title: draft.title,
            emoji: draft.emoji,
            description: draft.description,
            status: Status::Waiting,
            date_created: draft
                .date_created
                .unwrap_or_else(|| self.clock.today_local()),
            start_time: None,
            end_time: None,
            total_time: 0,
            parent_id: draft.parent_id,
            children: Vec::new(),
            category: draft.category,
            order: draft.order.unwrap_or(0),
        };

        if let Some(parent_id) = task.parent_id.as_deref() {
            if let Some(parent) = self.todos.iter_mut().find(|t| t.id == parent_id) {
                parent.children.push(id.clone());
            }
        }
        tracing::debug!(%id, date = %task.date_created, "todo added");
        self.todos.push(task);
        self.save();
        id
    }

    /// Shallow-merge `patch` into the task.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Lookup<()> {
        let Some(task) = self.todos.iter_mut().find(|t| t.id == id) else {
            return Lookup::NotFound;
        };
        patch.apply(task);
        self.save();
        Lookup::Found(())
    }

    /// Change status and account for time.
    ///
    /// - entering `in_progress` stamps a new start time;
    /// - leaving `in_progress` folds the session's whole minutes into
    ///   `totalTime` and clears the start time;
    /// - `in_progress` to `completed` also stamps the end time.
    ///
    /// Re-asserting `in_progress` keeps the running session instead of
    /// restarting its stamp, so no elapsed time is lost. Every other
    /// transition only overwrites the status.
    pub fn set_status(&mut self, id: &str, status: Status) -> Lookup<StatusChange> {
        let now = self.clock.now_ms();
        let Some(task) = self.todos.iter_mut().find(|t| t.id == id) else {
            return Lookup::NotFound;
        };

        let from = task.status;
        let mut minutes_added = 0;
        if from == Status::InProgress && status != Status::InProgress {
            if let Some(start) = task.start_time.take() {
                minutes_added = whole_minutes_between(start, now);
                task.total_time += minutes_added;
            }
            if status == Status::Completed {
                task.end_time = Some(now);
            }
        } else if status == Status::InProgress && from != Status::InProgress {
            task.start_time = Some(now);
        }
        task.status = status;

        let change = StatusChange {
            from,
            to: status,
            minutes_added,
            total_time: task.total_time,
        };
        tracing::debug!(%id, from = from.as_str(), to = status.as_str(), minutes_added, "status changed");
        self.save();
        Lookup::Found(change)
    }

    /// Remove the task and its whole subtree, then unlink it from its parent.
    /// Returns how many tasks were removed.
    pub fn delete(&mut self, id: &str) -> Lookup<usize> {
        let Some(target) = self.get(id) else {
            return Lookup::NotFound;
        };
        let parent_id = target.parent_id.clone();

        let mut doomed: HashSet<String> = HashSet::new();
        doomed.insert(id.to_string());
        self.collect_descendants(id, &mut doomed);

        let before = self.todos.len();
        self.todos.retain(|t| !doomed.contains(&t.id));
        let removed = before - self.todos.len();

        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.todos.iter_mut().find(|t| t.id == parent_id) {
                parent.children.retain(|c| c != id);
            }
        }
        tracing::debug!(%id, removed, "todo deleted");
        self.save();
        Lookup::Found(removed)
    }

    /// Add a placeholder sub-task under an existing parent.
    pub fn add_child(&mut self, parent_id: &str, date: NaiveDate) -> Lookup<String> {
        if self.get(parent_id).is_none() {
            return Lookup::NotFound;
        }
        let id = self.add(TaskDraft::titled(CHILD_PLACEHOLDER_TITLE).on(date).under(parent_id));
        Lookup::Found(id)
    }

    /// Tasks created for `date`, in store order.
    pub fn list_by_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.todos
            .iter()
            .filter(|t| t.date_created == date)
            .collect()
    }

    /// Tasks created for `date` in the requested order. The underlying
    /// collection is not reordered.
    pub fn list_sorted(&self, date: NaiveDate, mode: SortMode) -> Vec<&Task> {
        let mut tasks = self.list_by_date(date);
        let now = self.clock.now_ms();
        match mode {
            SortMode::Created => tasks.sort_by_key(|t| t.order),
            SortMode::Recommended => {
                tasks.sort_by_key(|t| (t.status.recommended_rank(), t.order))
            }
            SortMode::Category => tasks.sort_by(|a, b| {
                compare_category(a.category.as_deref(), b.category.as_deref())
                    .then(a.order.cmp(&b.order))
            }),
            SortMode::WorkTime => tasks.sort_by(|a, b| {
                b.effective_minutes(now)
                    .cmp(&a.effective_minutes(now))
                    .then(a.order.cmp(&b.order))
            }),
        }
        tasks
    }

    /// Sum of stored minutes for `date`. A running session is not included.
    pub fn total_work_time(&self, date: NaiveDate) -> u64 {
        self.list_by_date(date).iter().map(|t| t.total_time).sum()
    }

    /// Live elapsed minutes for a task at the clock's current instant.
    pub fn effective_minutes(&self, task: &Task) -> u64 {
        task.effective_minutes(self.clock.now_ms())
    }

    /// Copy yesterday's unfinished top-level tasks to today as fresh waiting
    /// tasks placed ahead of today's list. "Today" is the calendar day at
    /// `offset_hours` from UTC. Returns how many were copied.
    pub fn copy_incomplete_from_yesterday(&mut self, offset_hours: i32) -> usize {
        let today = day_at_offset(self.clock.now(), offset_hours);
        let yesterday = today - Duration::days(1);

        let carried: Vec<Task> = self
            .todos
            .iter()
            .filter(|t| {
                t.date_created == yesterday
                    && t.is_top_level()
                    && matches!(t.status, Status::Waiting | Status::Paused)
            })
            .cloned()
            .collect();
        if carried.is_empty() {
            tracing::debug!(%yesterday, "nothing to carry over");
            return 0;
        }

        let count = carried.len() as i64;
        let base = self
            .todos
            .iter()
            .filter(|t| t.date_created == today)
            .map(|t| t.order)
            .min()
            .unwrap_or(1);

        for (index, source) in carried.iter().enumerate() {
            let id = self.generate_id();
            self.todos.push(Task {
                id,
                title: source.title.clone(),
                emoji: source.emoji.clone(),
                description: source.description.clone(),
                status: Status::Waiting,
                date_created: today,
                start_time: None,
                end_time: None,
                total_time: 0,
                parent_id: None,
                children: Vec::new(),
                category: source.category.clone(),
                order: base - count + index as i64,
            });
        }
        tracing::debug!(%today, copied = carried.len(), "carried over unfinished tasks");
        self.save();
        carried.len()
    }

    fn collect_descendants(&self, id: &str, out: &mut HashSet<String>) {
        for child in self.todos.iter().filter(|t| t.parent_id.as_deref() == Some(id)) {
            if out.insert(child.id.clone()) {
                self.collect_descendants(&child.id, out);
            }
        }
    }

    fn generate_id(&mut self) -> String {
        loop {
            let id = format!("todo_{}_{}", self.clock.now_ms(), self.next_seq);
            self.next_seq += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn save(&self) {
        if let Err(e) = self.storage.set_todos(&self.todos) {
            tracing::error!(error = %e, "failed to save todos");
        }
    }
}

/// Category ids ascending, uncategorised last.
fn compare_category(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
