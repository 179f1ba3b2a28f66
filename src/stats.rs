//! Daily, weekly and monthly summaries over the task collection.
//!
//! Weeks start on Sunday. Time figures are stored minutes only; a running
//! session is not counted until it is folded in.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::fields::Status;
use crate::task::Task;

const TOP_CATEGORY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_todos: usize,
    pub completed_todos: usize,
    pub total_time_spent: u64,
    pub context_switches: usize,
    /// Task count per category id; uncategorised tasks are not counted.
    pub categories: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    pub daily_stats: Vec<DailyStats>,
    pub weekly_total_time: u64,
    pub weekly_completed_todos: usize,
    pub weekly_context_switches: usize,
    pub top_categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// `YYYY-MM`.
    pub month: String,
    pub weekly_stats: Vec<WeeklyStats>,
    pub monthly_total_time: u64,
    pub monthly_completed_todos: usize,
    pub monthly_context_switches: usize,
    pub top_categories: Vec<CategoryCount>,
}

fn on_date(tasks: &[Task], date: NaiveDate) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |t| t.date_created == date)
}

fn completed_on(tasks: &[Task], date: NaiveDate) -> usize {
    on_date(tasks, date)
        .filter(|t| t.status == Status::Completed)
        .count()
}

pub fn daily(tasks: &[Task], date: NaiveDate) -> DailyStats {
    let mut total_todos = 0;
    let mut total_time_spent = 0;
    let mut categories = BTreeMap::new();
    for task in on_date(tasks, date) {
        total_todos += 1;
        total_time_spent += task.total_time;
        if let Some(category) = &task.category {
            *categories.entry(category.clone()).or_insert(0) += 1;
        }
    }
    DailyStats {
        date,
        total_todos,
        completed_todos: completed_on(tasks, date),
        total_time_spent,
        context_switches: context_switches(tasks, date),
        categories,
    }
}

/// Percentage of the day's tasks that are completed, rounded; 0 for an empty day.
pub fn completion_rate(tasks: &[Task], date: NaiveDate) -> u32 {
    let total = on_date(tasks, date).count();
    if total == 0 {
        return 0;
    }
    let completed = completed_on(tasks, date);
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Rough estimate: one switch between each pair of completed tasks.
pub fn context_switches(tasks: &[Task], date: NaiveDate) -> usize {
    completed_on(tasks, date).saturating_sub(1)
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

pub fn weekly(tasks: &[Task], date: NaiveDate) -> WeeklyStats {
    let start = week_start(date);
    let end = start + Duration::days(6);
    let daily_stats: Vec<DailyStats> = start
        .iter_days()
        .take(7)
        .map(|day| daily(tasks, day))
        .collect();

    WeeklyStats {
        week_start: start,
        weekly_total_time: daily_stats.iter().map(|d| d.total_time_spent).sum(),
        weekly_completed_todos: daily_stats.iter().map(|d| d.completed_todos).sum(),
        weekly_context_switches: daily_stats.iter().map(|d| d.context_switches).sum(),
        top_categories: top_categories(tasks, start, end),
        daily_stats,
    }
}

/// Month totals are summed over the month's own days; the weekly breakdown
/// covers every Sunday-start week that touches the month, so its first and
/// last weeks may include days from neighbouring months.
pub fn monthly(tasks: &[Task], date: NaiveDate) -> MonthlyStats {
    let first = date.with_day(1).unwrap_or(date);
    let last = last_day_of_month(first);

    let mut weekly_stats = Vec::new();
    let mut cursor = week_start(first);
    while cursor <= last {
        weekly_stats.push(weekly(tasks, cursor));
        cursor += Duration::days(7);
    }

    let days: Vec<DailyStats> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|day| daily(tasks, day))
        .collect();

    MonthlyStats {
        month: first.format("%Y-%m").to_string(),
        weekly_stats,
        monthly_total_time: days.iter().map(|d| d.total_time_spent).sum(),
        monthly_completed_todos: days.iter().map(|d| d.completed_todos).sum(),
        monthly_context_switches: days.iter().map(|d| d.context_switches).sum(),
        top_categories: top_categories(tasks, first, last),
    }
}

/// Most used category ids over `[start, end]`, by count then id, at most five.
pub fn top_categories(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks
        .iter()
        .filter(|t| t.date_created >= start && t.date_created <= end)
    {
        if let Some(category) = task.category.as_deref() {
            *counts.entry(category).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    // BTreeMap iteration is already id-ordered, so a stable sort keeps ties by id.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_CATEGORY_LIMIT);
    ranked
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next| next - Duration::days(1))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn task(id: &str, date: NaiveDate, status: Status, minutes: u64, category: Option<&str>) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            emoji: None,
            description: None,
            status,
            date_created: date,
            start_time: None,
            end_time: None,
            total_time: minutes,
            parent_id: None,
            children: Vec::new(),
            category: category.map(str::to_string),
            order: 0,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            // 2024-05-01 is a Wednesday; its week starts Sunday 2024-04-28.
            task("a", day(5, 1), Status::Completed, 30, Some("default_1")),
            task("b", day(5, 1), Status::Completed, 15, Some("default_1")),
            task("c", day(5, 1), Status::Waiting, 0, Some("default_2")),
            task("d", day(5, 1), Status::InProgress, 10, None),
            task("e", day(4, 29), Status::Completed, 20, Some("default_3")),
            task("f", day(5, 20), Status::Completed, 45, Some("default_2")),
            task("g", day(6, 1), Status::Completed, 99, Some("default_4")),
        ]
    }

    #[test]
    fn daily_counts() {
        let stats = daily(&sample(), day(5, 1));
        assert_eq!(stats.total_todos, 4);
        assert_eq!(stats.completed_todos, 2);
        assert_eq!(stats.total_time_spent, 55);
        assert_eq!(stats.context_switches, 1);
        assert_eq!(
            stats.categories,
            BTreeMap::from([("default_1".to_string(), 2), ("default_2".to_string(), 1)])
        );
    }

    #[test]
    fn completion_rate_rounds_and_handles_empty_day() {
        let tasks = sample();
        assert_eq!(completion_rate(&tasks, day(5, 1)), 50);
        assert_eq!(completion_rate(&tasks, day(5, 2)), 0);

        let thirds = vec![
            task("x", day(5, 3), Status::Completed, 0, None),
            task("y", day(5, 3), Status::Waiting, 0, None),
            task("z", day(5, 3), Status::Waiting, 0, None),
        ];
        assert_eq!(completion_rate(&thirds, day(5, 3)), 33);
    }

    #[test]
    fn context_switches_never_negative() {
        assert_eq!(context_switches(&sample(), day(5, 2)), 0);
        assert_eq!(context_switches(&sample(), day(4, 29)), 0);
    }

    #[test]
    fn weekly_starts_on_sunday() {
        let stats = weekly(&sample(), day(5, 1));
        assert_eq!(stats.week_start, day(4, 28));
        assert_eq!(stats.daily_stats.len(), 7);
        assert_eq!(stats.daily_stats[6].date, day(5, 4));
        assert_eq!(stats.weekly_total_time, 75);
        assert_eq!(stats.weekly_completed_todos, 3);
        assert_eq!(stats.weekly_context_switches, 1);
        assert_eq!(stats.top_categories[0].category, "default_1");
        assert_eq!(stats.top_categories[0].count, 2);
    }

    #[test]
    fn monthly_totals_cover_the_month_only() {
        let stats = monthly(&sample(), day(5, 17));
        assert_eq!(stats.month, "2024-05");
        // April 28 through June 1 spans five Sunday-start weeks.
        assert_eq!(stats.weekly_stats.len(), 5);
        assert_eq!(stats.weekly_stats[0].week_start, day(4, 28));
        assert_eq!(stats.monthly_total_time, 100);
        assert_eq!(stats.monthly_completed_todos, 3);
        assert!(stats.top_categories.iter().all(|c| c.category != "default_4"));
    }

    #[test]
    fn top_categories_rank_by_count_then_id_and_cap_at_five() {
        let mut tasks = Vec::new();
        for (i, cat) in ["c7", "c6", "c5", "c4", "c3", "c2", "c1"].iter().enumerate() {
            tasks.push(task(&format!("t{i}"), day(5, 1), Status::Waiting, 0, Some(cat)));
        }
        tasks.push(task("extra", day(5, 1), Status::Waiting, 0, Some("c6")));

        let top = top_categories(&tasks, day(5, 1), day(5, 1));
        let names: Vec<&str> = top.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["c6", "c1", "c2", "c3", "c4"]);
    }

    #[test]
    fn december_rolls_into_next_year() {
        assert_eq!(last_day_of_month(day(12, 1)), day(12, 31));
        assert_eq!(last_day_of_month(day(2, 1)), day(2, 29));
    }
}
