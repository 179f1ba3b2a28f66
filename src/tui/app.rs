//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the command context for
//! the session, handles key presses per view and state, and renders a sidebar
//! beside the active view. The event loop polls every 50 ms, which also keeps
//! the running-session clock ticking on screen.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::category::{is_hex_color, DEFAULT_CATEGORY_COLOR};
use crate::cmd::Context;
use crate::db::{carry_over_offset, default_settings, Storage};
use crate::fields::{SortMode, Status};
use crate::format::{
    display_title, format_clock, format_minutes, format_status, status_glyph, tree_rows, truncate,
};
use crate::stats;
use crate::store::{Lookup, CHILD_PLACEHOLDER_TITLE};
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::tui::{
    colors::{status_color, DARK_RED, INK, MUTED, PINK},
    enums::{AppState, PendingAction, View},
    input::InputField,
    utils::{centered_rect, hex_to_color},
};

/// The session the user last started from the UI. Only read for display; the
/// store keeps the authoritative start stamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTimer {
    pub task_id: String,
    pub started_at: i64,
}

impl ActiveTimer {
    pub fn elapsed_seconds(&self, now_ms: i64) -> u64 {
        if now_ms <= self.started_at {
            0
        } else {
            ((now_ms - self.started_at) / 1000) as u64
        }
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    ctx: Context,
    view: View,
    state: AppState,
    date: NaiveDate,
    sort: SortMode,
    /// Task ids for `date` in display order, with tree depth.
    rows: Vec<(String, usize)>,
    task_state: TableState,
    category_state: TableState,
    input: InputField,
    last_category: Option<String>,
    pending: Option<PendingAction>,
    timer: Option<ActiveTimer>,
    status_message: String,
}

impl App {
    pub fn new(ctx: Context) -> Self {
        let date = ctx.clock.today_local();
        // Resume the display for a session left running by an earlier run.
        let timer = ctx
            .todos
            .all()
            .iter()
            .filter(|t| t.status == Status::InProgress)
            .filter_map(|t| {
                t.start_time.map(|started_at| ActiveTimer {
                    task_id: t.id.clone(),
                    started_at,
                })
            })
            .max_by_key(|t| t.started_at);

        let mut category_state = TableState::default();
        if !ctx.categories.all().is_empty() {
            category_state.select(Some(0));
        }

        let mut app = App {
            ctx,
            view: View::Todos,
            state: AppState::Browse,
            date,
            sort: SortMode::Created,
            rows: Vec::new(),
            task_state: TableState::default(),
            category_state,
            input: InputField::new(),
            last_category: None,
            pending: None,
            timer,
            status_message: String::new(),
        };
        app.refresh_rows();
        app
    }

    /// Rebuild the day's rows, keeping the selection on the same task when it
    /// still exists.
    fn refresh_rows(&mut self) {
        let keep = self.selected_task_id();
        let previous_index = self.task_state.selected();

        let sorted = self.ctx.todos.list_sorted(self.date, self.sort);
        self.rows = tree_rows(&sorted)
            .into_iter()
            .map(|(t, depth)| (t.id.clone(), depth))
            .collect();

        let index = keep
            .and_then(|id| self.rows.iter().position(|(r, _)| *r == id))
            .or_else(|| {
                if self.rows.is_empty() {
                    None
                } else {
                    Some(previous_index.unwrap_or(0).min(self.rows.len() - 1))
                }
            });
        self.task_state.select(index);
    }

    fn select_task(&mut self, id: &str) {
        if let Some(i) = self.rows.iter().position(|(r, _)| r == id) {
            self.task_state.select(Some(i));
        }
    }

    fn selected_task_id(&self) -> Option<String> {
        self.task_state
            .selected()
            .and_then(|i| self.rows.get(i))
            .map(|(id, _)| id.clone())
    }

    fn selected_task(&self) -> Option<&Task> {
        self.selected_task_id()
            .and_then(|id| self.ctx.todos.get(&id))
    }

    fn selected_category_id(&self) -> Option<String> {
        self.category_state
            .selected()
            .and_then(|i| self.ctx.categories.all().get(i))
            .map(|c| c.id.clone())
    }

    fn move_in(state: &mut TableState, len: usize, delta: isize) {
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        state.select(Some(next as usize));
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.task_state.select(None);
        self.refresh_rows();
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            return true;
        }
        match self.state {
            AppState::Browse => {
                self.status_message.clear();
                return self.handle_browse_key(code);
            }
            state if state.is_text_entry() => self.handle_text_key(code),
            AppState::Confirm => self.handle_confirm_key(code),
            _ => self.state = AppState::Browse,
        }
        false
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::BackTab => self.view = self.view.prev(),
            KeyCode::Char(c @ '1'..='4') => {
                self.view = View::ALL[(c as u8 - b'1') as usize];
            }
            KeyCode::Char('?') => self.state = AppState::Help,
            _ => match self.view {
                View::Todos => self.handle_todos_key(code),
                View::Stats => {
                    self.handle_date_key(code);
                }
                View::Categories => self.handle_categories_key(code),
                View::Settings => {}
            },
        }
        false
    }

    /// Day navigation shared by the Todos and Stats views.
    fn handle_date_key(&mut self, code: KeyCode) -> bool {
        let target = match code {
            KeyCode::Left | KeyCode::Char('h') => self.date.pred_opt(),
            KeyCode::Right | KeyCode::Char('l') => self.date.succ_opt(),
            KeyCode::Char('t') => Some(self.ctx.clock.today_local()),
            _ => return false,
        };
        if let Some(date) = target {
            self.set_date(date);
        }
        true
    }

    fn handle_todos_key(&mut self, code: KeyCode) {
        if self.handle_date_key(code) {
            return;
        }
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                Self::move_in(&mut self.task_state, self.rows.len(), 1)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                Self::move_in(&mut self.task_state, self.rows.len(), -1)
            }
            KeyCode::Char('o') => {
                self.sort = self.sort.next();
                self.refresh_rows();
                self.status_message = format!("Sorted by {}", self.sort.label());
            }
            KeyCode::Char('a') => {
                self.input = InputField::new();
                self.state = AppState::QuickAdd;
            }
            KeyCode::Char('A') => self.add_child(),
            KeyCode::Char('r') | KeyCode::Enter => {
                if let Some(title) = self.selected_task().map(|t| t.title.clone()) {
                    self.input = InputField::with_value(&title);
                    self.state = AppState::Rename;
                }
            }
            KeyCode::Char('s') => self.set_selected_status(Status::InProgress),
            KeyCode::Char('p') => self.set_selected_status(Status::Paused),
            KeyCode::Char('c') => self.set_selected_status(Status::Completed),
            KeyCode::Char('w') => self.set_selected_status(Status::Waiting),
            KeyCode::Char('g') => self.cycle_category(),
            KeyCode::Char('y') => self.carry_over(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self.selected_task() {
                    self.pending = Some(PendingAction::DeleteTask {
                        id: task.id.clone(),
                        title: task.title.clone(),
                    });
                    self.state = AppState::Confirm;
                }
            }
            _ => {}
        }
    }

    fn handle_categories_key(&mut self, code: KeyCode) {
        let len = self.ctx.categories.all().len();
        match code {
            KeyCode::Down | KeyCode::Char('j') => Self::move_in(&mut self.category_state, len, 1),
            KeyCode::Up | KeyCode::Char('k') => Self::move_in(&mut self.category_state, len, -1),
            KeyCode::Char('a') => {
                self.input = InputField::new();
                self.state = AppState::AddCategory;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let selected = self
                    .selected_category_id()
                    .and_then(|id| self.ctx.categories.get(&id).cloned());
                if let Some(category) = selected {
                    self.pending = Some(PendingAction::DeleteCategory {
                        id: category.id,
                        name: category.name,
                    });
                    self.state = AppState::Confirm;
                }
            }
            _ => {}
        }
    }

    fn handle_text_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state = AppState::Browse,
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) => self.input.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.state = AppState::Browse;
                if let Some(action) = self.pending.take() {
                    self.execute(action);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Browse;
                self.pending = None;
                self.status_message = "Cancelled".into();
            }
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        let text = self.input.value.trim().to_string();
        let state = self.state;
        self.state = AppState::Browse;
        if text.is_empty() {
            return;
        }

        match state {
            AppState::QuickAdd => {
                let order = self
                    .ctx
                    .todos
                    .list_by_date(self.date)
                    .iter()
                    .map(|t| t.order)
                    .max()
                    .map_or(0, |m| m + 1);
                let mut draft = TaskDraft::titled(text).on(self.date).with_order(order);
                draft.category = self
                    .last_category
                    .clone()
                    .filter(|id| self.ctx.categories.get(id).is_some());
                let id = self.ctx.todos.add(draft);
                self.refresh_rows();
                self.select_task(&id);
                self.status_message = "Task added".into();
            }
            AppState::Rename => {
                if let Some(id) = self.selected_task_id() {
                    self.ctx.todos.update(
                        &id,
                        TaskPatch {
                            title: Some(text),
                            ..TaskPatch::default()
                        },
                    );
                    self.refresh_rows();
                }
            }
            AppState::AddCategory => {
                let (name, color) = split_name_color(&text);
                if name.is_empty() {
                    self.status_message = "Category needs a name".into();
                    return;
                }
                self.ctx.categories.add(&name, &color);
                let last = self.ctx.categories.all().len() - 1;
                self.category_state.select(Some(last));
                self.status_message = format!("Added category {name}");
            }
            _ => {}
        }
    }

    fn execute(&mut self, action: PendingAction) {
        match action {
            PendingAction::DeleteTask { id, title } => {
                match self.ctx.todos.delete(&id) {
                    Lookup::Found(removed) => {
                        self.status_message = format!("Deleted '{title}' ({removed} removed)");
                    }
                    Lookup::NotFound => self.status_message = "Task no longer exists".into(),
                }
                let orphaned = self
                    .timer
                    .as_ref()
                    .is_some_and(|t| self.ctx.todos.get(&t.task_id).is_none());
                if orphaned {
                    self.timer = None;
                }
                self.refresh_rows();
            }
            PendingAction::DeleteCategory { id, name } => {
                if self.ctx.categories.delete(&id).is_found() {
                    self.status_message = format!("Deleted category {name}");
                }
                if self.last_category.as_deref() == Some(id.as_str()) {
                    self.last_category = None;
                }
                let len = self.ctx.categories.all().len();
                Self::move_in(&mut self.category_state, len, 0);
            }
        }
    }

    fn set_selected_status(&mut self, status: Status) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        match self.ctx.todos.set_status(&id, status) {
            Lookup::Found(change) => {
                self.sync_timer(&id, status);
                self.status_message = if change.minutes_added > 0 {
                    format!(
                        "{} → {} (+{})",
                        format_status(change.from),
                        format_status(change.to),
                        format_minutes(change.minutes_added)
                    )
                } else {
                    format!("{} → {}", format_status(change.from), format_status(change.to))
                };
            }
            Lookup::NotFound => self.status_message = "Task no longer exists".into(),
        }
        self.refresh_rows();
    }

    fn sync_timer(&mut self, id: &str, status: Status) {
        if status == Status::InProgress {
            self.timer = self
                .ctx
                .todos
                .get(id)
                .and_then(|t| t.start_time)
                .map(|started_at| ActiveTimer {
                    task_id: id.to_string(),
                    started_at,
                });
        } else if self.timer.as_ref().is_some_and(|t| t.task_id == id) {
            self.timer = None;
        }
    }

    fn add_child(&mut self) {
        let Some(parent) = self.selected_task_id() else {
            self.status_message = "Select a task first".into();
            return;
        };
        match self.ctx.todos.add_child(&parent, self.date) {
            Lookup::Found(id) => {
                self.refresh_rows();
                self.select_task(&id);
                self.input = InputField::with_value(CHILD_PLACEHOLDER_TITLE);
                self.state = AppState::Rename;
            }
            Lookup::NotFound => self.status_message = "Task no longer exists".into(),
        }
    }

    /// Step the selected task through the categories, then back to none.
    /// The choice becomes the default for quick add.
    fn cycle_category(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let current = self.ctx.todos.get(&id).and_then(|t| t.category.clone());
        let ids: Vec<String> = self
            .ctx
            .categories
            .all()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let next = match current.and_then(|c| ids.iter().position(|x| *x == c)) {
            None => ids.first().cloned(),
            Some(i) if i + 1 < ids.len() => Some(ids[i + 1].clone()),
            Some(_) => None,
        };

        self.ctx.todos.update(
            &id,
            TaskPatch {
                category: Some(next.clone()),
                ..TaskPatch::default()
            },
        );
        self.status_message = match next.as_deref().and_then(|c| self.ctx.categories.name_of(c)) {
            Some(name) => format!("Category: {name}"),
            None => "Category cleared".into(),
        };
        self.last_category = next;
        self.refresh_rows();
    }

    fn carry_over(&mut self) {
        let settings = self.ctx.storage.settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read settings, using defaults");
            default_settings()
        });
        let copied = self
            .ctx
            .todos
            .copy_incomplete_from_yesterday(carry_over_offset(&settings));
        self.status_message = if copied == 0 {
            "Nothing to carry over from yesterday".into()
        } else {
            format!("Carried over {copied} task(s)")
        };
        self.refresh_rows();
    }

    fn category_label(&self, id: Option<&str>) -> (String, Color) {
        match id {
            None => ("-".into(), MUTED),
            Some(id) => match self.ctx.categories.get(id) {
                Some(c) => (c.name.clone(), hex_to_color(&c.color).unwrap_or(Color::White)),
                None => (id.to_string(), MUTED),
            },
        }
    }

    /// Render the sidebar with the app title and view list.
    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "TodoForMe",
                Style::default().fg(PINK).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.ctx.clock.today_local().format("%a %b %-d").to_string(),
                Style::default().fg(MUTED),
            )),
            Line::from(""),
        ];
        for (i, view) in View::ALL.iter().enumerate() {
            let label = format!(" {} {:<12}", i + 1, view.label());
            let style = if *view == self.view {
                Style::default().bg(PINK).fg(INK).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(label, style)));
        }

        let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        f.render_widget(sidebar, area);
    }

    /// Render the day's task table with its header.
    fn render_todos(&mut self, f: &mut Frame, area: Rect) {
        let now_ms = self.ctx.clock.now_ms();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let mut header = vec![
            Span::styled(
                self.date.format("%Y-%m-%d (%a)").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  Sort: {}", self.sort.label())),
            Span::raw(format!(
                "  Recorded: {}",
                format_minutes(self.ctx.todos.total_work_time(self.date))
            )),
        ];
        if let Some(timer) = &self.timer {
            if let Some(task) = self.ctx.todos.get(&timer.task_id) {
                header.push(Span::styled(
                    format!(
                        "  ▶ {} {}",
                        truncate(&task.title, 20),
                        format_clock(timer.elapsed_seconds(now_ms))
                    ),
                    Style::default().fg(status_color(Status::InProgress)),
                ));
            }
        }
        let header_block = Paragraph::new(Line::from(header))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let header_cells = ["Task", "Category", "Time", "Session", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header_row = Row::new(header_cells)
            .style(Style::default().bg(PINK).fg(INK))
            .height(1);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .filter_map(|(id, depth)| self.ctx.todos.get(id).map(|t| (t, *depth)))
            .map(|(task, depth)| {
                let (category, category_color) = self.category_label(task.category.as_deref());
                let session = match task.session_seconds(now_ms) {
                    0 => String::new(),
                    secs => format_clock(secs),
                };
                let mut style = Style::default().fg(status_color(task.status));
                if task.status == Status::Completed {
                    style = style.add_modifier(Modifier::CROSSED_OUT);
                }
                Row::new(vec![
                    Cell::from(format!(
                        "{}{} {}",
                        "  ".repeat(depth),
                        status_glyph(task.status),
                        display_title(task)
                    )),
                    Cell::from(category).style(Style::default().fg(category_color)),
                    Cell::from(format_minutes(self.ctx.todos.effective_minutes(task))),
                    Cell::from(session),
                    Cell::from(format_status(task.status)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Min(28),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header_row)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Todos ({}) - Press '?' for help",
                self.rows.len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.task_state);
    }

    /// Render the daily and weekly summary for the selected date.
    fn render_stats(&self, f: &mut Frame, area: Rect) {
        let tasks = self.ctx.todos.all();
        let daily = stats::daily(tasks, self.date);
        let weekly = stats::weekly(tasks, self.date);
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(format!("Day · {}", self.date), bold)),
            Line::from(format!(
                "  Tasks           {} / {} completed ({}%)",
                daily.completed_todos,
                daily.total_todos,
                stats::completion_rate(tasks, self.date)
            )),
            Line::from(format!(
                "  Time            {}",
                format_minutes(daily.total_time_spent)
            )),
            Line::from(format!("  Context switches {}", daily.context_switches)),
        ];
        for (category, count) in &daily.categories {
            let (name, color) = self.category_label(Some(category.as_str()));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{name:<16}"), Style::default().fg(color)),
                Span::raw(count.to_string()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Week of {}", weekly.week_start),
            bold,
        )));
        let busiest = weekly
            .daily_stats
            .iter()
            .map(|d| d.total_time_spent)
            .max()
            .unwrap_or(0)
            .max(1);
        for day in &weekly.daily_stats {
            let bar = "█".repeat((day.total_time_spent * 20 / busiest) as usize);
            let marker = if day.date == self.date { "›" } else { " " };
            lines.push(Line::from(vec![
                Span::raw(format!(
                    " {marker}{} {:>2}/{:<2} {:>7} ",
                    day.date.format("%a"),
                    day.completed_todos,
                    day.total_todos,
                    format_minutes(day.total_time_spent)
                )),
                Span::styled(bar, Style::default().fg(PINK)),
            ]));
        }
        lines.push(Line::from(format!(
            "  Total {} · {} completed · {} switches",
            format_minutes(weekly.weekly_total_time),
            weekly.weekly_completed_todos,
            weekly.weekly_context_switches
        )));
        for entry in &weekly.top_categories {
            let (name, color) = self.category_label(Some(entry.category.as_str()));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{name:<16}"), Style::default().fg(color)),
                Span::raw(entry.count.to_string()),
            ]));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Stats - h/l to change day"),
        );
        f.render_widget(paragraph, area);
    }

    /// Render the category table.
    fn render_categories(&mut self, f: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .ctx
            .categories
            .all()
            .iter()
            .map(|c| {
                let color = hex_to_color(&c.color).unwrap_or(Color::White);
                Row::new(vec![
                    Cell::from("■■").style(Style::default().fg(color)),
                    Cell::from(c.name.clone()),
                    Cell::from(c.color.clone()),
                    Cell::from(c.id.clone()).style(Style::default().fg(MUTED)),
                ])
            })
            .collect();

        let header = Row::new(["", "Name", "Color", "ID"])
            .style(Style::default().bg(PINK).fg(INK).add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(9),
            Constraint::Length(28),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Categories - a: add, d: delete"),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.category_state);
    }

    /// Render the settings map and the data file location.
    fn render_settings(&self, f: &mut Frame, area: Rect) {
        let path = self
            .ctx
            .storage
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".into());
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Data file  ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(path),
            ]),
            Line::from(""),
        ];
        match self.ctx.storage.settings() {
            Ok(settings) => {
                for (key, value) in &settings {
                    lines.push(Line::from(format!("{key:<26} {value}")));
                }
            }
            Err(e) => lines.push(Line::from(format!("Failed to read settings: {e}"))),
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Change with: tdf settings set <key> <value>",
            Style::default().fg(MUTED),
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Settings"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render the single-line input popup for add, rename and new category.
    fn render_input(&self, f: &mut Frame, area: Rect) {
        let title = match self.state {
            AppState::QuickAdd => {
                let (category, _) = self.category_label(self.last_category.as_deref());
                format!("New task for {} (category: {category})", self.date)
            }
            AppState::Rename => "Rename".to_string(),
            AppState::AddCategory => "New category: name #RRGGBB".to_string(),
            _ => String::new(),
        };

        let popup = centered_rect(70, 20, area);
        let popup = Rect {
            height: popup.height.max(3),
            ..popup
        };
        f.render_widget(Clear, popup);
        let paragraph = Paragraph::new(self.input.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(PINK)),
        );
        f.render_widget(paragraph, popup);

        let offset = Line::from(self.input.before_cursor()).width() as u16;
        f.set_cursor_position((popup.x + 1 + offset, popup.y + 1));
    }

    /// Render a confirmation dialog for destructive actions.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(
                self.pending
                    .as_ref()
                    .map(PendingAction::describe)
                    .unwrap_or_default(),
            ),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the key binding overview.
    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default().fg(PINK).add_modifier(Modifier::BOLD),
            ))
        };
        let text = vec![
            section("Anywhere"),
            Line::from("  Tab / Shift+Tab   next / previous view"),
            Line::from("  1-4               jump to view"),
            Line::from("  q, Ctrl+C         quit"),
            Line::from(""),
            section("Todos"),
            Line::from("  j/k               move selection"),
            Line::from("  h/l, t            previous / next day, today"),
            Line::from("  o                 cycle sort mode"),
            Line::from("  a                 quick add (uses last category)"),
            Line::from("  A                 add sub-task under selection"),
            Line::from("  r, Enter          rename"),
            Line::from("  s / p / c / w     start / pause / complete / back to waiting"),
            Line::from("  g                 cycle category"),
            Line::from("  y                 carry over yesterday's unfinished tasks"),
            Line::from("  d                 delete with sub-tasks"),
            Line::from(""),
            section("Categories"),
            Line::from("  a                 add 'name #color'"),
            Line::from("  d                 delete"),
            Line::from(""),
            Line::from(Span::styled("Press any key to close", Style::default().fg(MUTED))),
        ];

        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Browse => match self.view {
                    View::Todos => format!(
                        "{} task(s) | a add  s start  p pause  c complete  ? help",
                        self.rows.len()
                    ),
                    View::Stats => "h/l change day  t today".to_string(),
                    View::Categories => format!("{} categories", self.ctx.categories.all().len()),
                    View::Settings => "Settings are read-only here".to_string(),
                },
                AppState::QuickAdd | AppState::Rename | AppState::AddCategory => {
                    "Enter to save, Esc to cancel".to_string()
                }
                AppState::Confirm => "Confirm Action".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(text)
            .style(Style::default().bg(PINK).fg(INK))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(0)])
            .split(outer[0]);

        self.render_sidebar(f, body[0]);
        match self.view {
            View::Todos => self.render_todos(f, body[1]),
            View::Stats => self.render_stats(f, body[1]),
            View::Categories => self.render_categories(f, body[1]),
            View::Settings => self.render_settings(f, body[1]),
        }

        match self.state {
            state if state.is_text_entry() => self.render_input(f, body[1]),
            AppState::Confirm => self.render_confirm(f, outer[0]),
            AppState::Help => self.render_help(f, outer[0]),
            _ => {}
        }

        self.render_status_bar(f, outer[1]);
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Split `Errands #F97316` into name and colour. Without a trailing hex
/// colour the whole text is the name.
fn split_name_color(text: &str) -> (String, String) {
    match text.rsplit_once(char::is_whitespace) {
        Some((name, color)) if is_hex_color(color) => {
            (name.trim().to_string(), color.to_string())
        }
        _ if is_hex_color(text) => (String::new(), text.to_string()),
        _ => (text.to_string(), DEFAULT_CATEGORY_COLOR.to_string()),
    }
}
