//! Terminal formatting helpers shared by the CLI and the TUI.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::category::CategoryRegistry;
use crate::fields::Status;
use crate::task::Task;

/// Parse `YYYY-MM-DD` or one of `today`, `yesterday`, `tomorrow` relative to
/// `today`.
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => Some(today),
        "yesterday" => Some(today - Duration::days(1)),
        "tomorrow" => Some(today + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").ok(),
    }
}

/// `45m`, `1h 30m`, `2h`.
pub fn format_minutes(minutes: u64) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// `h:mm:ss` for the live session ticker.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}:{:02}", seconds / 3600, (seconds / 60) % 60, seconds % 60)
}

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Waiting => "Waiting",
        Status::InProgress => "In progress",
        Status::Paused => "Paused",
        Status::Completed => "Completed",
    }
}

/// Single-column glyph used in compact listings.
pub fn status_glyph(s: Status) -> &'static str {
    match s {
        Status::Waiting => "○",
        Status::InProgress => "▶",
        Status::Paused => "⏸",
        Status::Completed => "✓",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Title with its emoji prefix, if any.
pub fn display_title(task: &Task) -> String {
    match &task.emoji {
        Some(emoji) => format!("{emoji} {}", task.title),
        None => task.title.clone(),
    }
}

/// Lay out an already-sorted list as a tree: each task is followed by its
/// children (in the same relative order), depth-first. Tasks whose parent is
/// not in the list are treated as roots.
pub fn tree_rows<'a>(tasks: &[&'a Task]) -> Vec<(&'a Task, usize)> {
    let present: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let mut rows = Vec::with_capacity(tasks.len());
    let mut visited = HashSet::new();

    fn walk<'a>(
        task: &'a Task,
        depth: usize,
        tasks: &[&'a Task],
        rows: &mut Vec<(&'a Task, usize)>,
        visited: &mut HashSet<&'a str>,
    ) {
        if !visited.insert(task.id.as_str()) {
            return;
        }
        rows.push((task, depth));
        for child in tasks
            .iter()
            .filter(|t| t.parent_id.as_deref() == Some(task.id.as_str()))
        {
            walk(*child, depth + 1, tasks, rows, visited);
        }
    }

    for task in tasks {
        let is_root = task
            .parent_id
            .as_deref()
            .map_or(true, |p| !present.contains(p));
        if is_root {
            walk(*task, 0, tasks, &mut rows, &mut visited);
        }
    }
    // Anything left is part of a parent cycle; show it flat rather than drop it.
    for task in tasks {
        if !visited.contains(task.id.as_str()) {
            rows.push((*task, 0));
        }
    }
    rows
}

/// Print tasks in a formatted table. `live_minutes` gives each task's
/// effective minutes.
pub fn print_table(
    rows: &[(&Task, usize)],
    categories: &CategoryRegistry,
    live_minutes: impl Fn(&Task) -> u64,
) {
    println!(
        "{:<28} {:<12} {:<8} {:<12} {}",
        "ID", "Status", "Time", "Category", "Title"
    );
    for (t, depth) in rows {
        let category = t
            .category
            .as_deref()
            .map(|id| categories.name_of(id).unwrap_or(id))
            .unwrap_or("-");
        println!(
            "{:<28} {:<12} {:<8} {:<12} {}{} {}",
            t.id,
            format_status(t.status),
            format_minutes(live_minutes(t)),
            truncate(category, 12),
            "  ".repeat(*depth),
            status_glyph(t.status),
            display_title(t)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, parent: Option<&str>) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            emoji: None,
            description: None,
            status: Status::Waiting,
            date_created: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            start_time: None,
            end_time: None,
            total_time: 0,
            parent_id: parent.map(str::to_string),
            children: Vec::new(),
            category: None,
            order: 0,
        }
    }

    #[test]
    fn parses_relative_and_iso_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date_input("Today", today), Some(today));
        assert_eq!(
            parse_date_input("yesterday", today),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            parse_date_input("tomorrow", today),
            NaiveDate::from_ymd_opt(2024, 3, 2)
        );
        assert_eq!(
            parse_date_input("2023-12-25", today),
            NaiveDate::from_ymd_opt(2023, 12, 25)
        );
        assert_eq!(parse_date_input("next week", today), None);
    }

    #[test]
    fn minutes_and_clock() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_clock(3_725), "1:02:05");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("운동하기 계획", 4), "운동하…");
    }

    #[test]
    fn tree_rows_nest_children_under_parents() {
        let root = task("root", None);
        let child = task("child", Some("root"));
        let grandchild = task("grand", Some("child"));
        let orphan = task("orphan", Some("elsewhere"));
        let list = vec![&grandchild, &orphan, &child, &root];

        let rows: Vec<(&str, usize)> = tree_rows(&list)
            .into_iter()
            .map(|(t, d)| (t.id.as_str(), d))
            .collect();
        assert_eq!(
            rows,
            vec![("orphan", 0), ("root", 0), ("child", 1), ("grand", 2)]
        );
    }
}
