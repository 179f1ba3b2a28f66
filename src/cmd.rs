//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one store, registry or storage operation. The
//! store reports missing ids as `NotFound`; this layer turns those into
//! errors so scripts see a non-zero exit.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;
use clap::Subcommand;
use clap_complete::{generate, Shell};
use serde::Serialize;
use serde_json::Value;

use crate::category::{is_hex_color, CategoryPatch, CategoryRegistry, DEFAULT_CATEGORY_COLOR};
use crate::clock::{Clock, SystemClock};
use crate::db::{
    carry_over_offset, create_backup, parse_offset_hours, ImportBundle, JsonFileStorage, Storage,
    CARRY_OVER_OFFSET_KEY,
};
use crate::error::{Error, Result};
use crate::fields::{SortMode, Status};
use crate::format::*;
use crate::stats;
use crate::store::{Lookup, TodoStore};
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal UI.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Emoji shown before the title.
        #[arg(long)]
        emoji: Option<String>,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Day the task belongs to: YYYY-MM-DD, "today", "yesterday" or "tomorrow".
        #[arg(long)]
        date: Option<String>,
        /// Parent task ID.
        #[arg(long)]
        parent: Option<String>,
        /// Category ID or name.
        #[arg(long)]
        category: Option<String>,
        /// Sort position within the day.
        #[arg(long, allow_hyphen_values = true)]
        order: Option<i64>,
    },

    /// Add a placeholder sub-task under an existing task.
    Child {
        /// Parent task ID.
        parent: String,
        /// Day for the sub-task (defaults to the parent's day).
        #[arg(long)]
        date: Option<String>,
        /// Title to use instead of the placeholder.
        #[arg(long)]
        title: Option<String>,
    },

    /// List a day's tasks.
    List {
        /// Day to list (default: today).
        #[arg(long)]
        date: Option<String>,
        /// Sort order.
        #[arg(long, value_enum, default_value_t = SortMode::Created)]
        sort: SortMode,
        /// Render sub-tasks nested under their parents.
        #[arg(long)]
        tree: bool,
    },

    /// Show a single task and its sub-tasks.
    Show {
        /// Task ID.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task ID.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        /// Remove the emoji.
        #[arg(long, conflicts_with = "emoji")]
        clear_emoji: bool,
        #[arg(long)]
        desc: Option<String>,
        /// Category ID or name.
        #[arg(long)]
        category: Option<String>,
        /// Remove the category.
        #[arg(long, conflicts_with = "category")]
        clear_category: bool,
        #[arg(long, allow_hyphen_values = true)]
        order: Option<i64>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Set a task's status.
    Status {
        /// Task ID.
        id: String,
        /// waiting | in-progress | paused | completed.
        #[arg(value_enum)]
        status: Status,
    },

    /// Start working on a task (status in-progress).
    Start {
        /// Task ID.
        id: String,
    },

    /// Pause a task, folding the running session into its total.
    Pause {
        /// Task ID.
        id: String,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID.
        id: String,
    },

    /// Reopen a task (status waiting).
    Reopen {
        /// Task ID.
        id: String,
    },

    /// Delete a task and all of its sub-tasks.
    Delete {
        /// Task ID.
        id: String,
    },

    /// Copy yesterday's unfinished top-level tasks to today.
    CarryOver,

    /// Total recorded minutes for a day.
    Total {
        #[arg(long)]
        date: Option<String>,
    },

    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Show or change settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Daily, weekly or monthly statistics.
    Stats {
        #[command(subcommand)]
        period: StatsPeriod,
    },

    /// Export all data as JSON.
    Export {
        /// Output file path (default: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import data exported by `export`; present collections are replaced.
    Import {
        /// Input JSON file path.
        input: PathBuf,
        /// Skip creating backup before import.
        #[arg(long)]
        no_backup: bool,
    },

    /// Erase all tasks, categories and settings.
    Clear {
        /// Confirm the wipe.
        #[arg(long)]
        yes: bool,
    },

    /// Print the data file location.
    Path,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List all categories.
    List,
    /// Add a category.
    Add {
        name: String,
        /// Hex colour such as #3B82F6.
        #[arg(long, default_value = DEFAULT_CATEGORY_COLOR)]
        color: String,
    },
    /// Rename or recolour a category.
    Update {
        /// Category ID.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category. Tasks keep the dangling reference.
    Delete {
        /// Category ID.
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print all settings, defaults included.
    Show,
    /// Set a key. The value is parsed as JSON, falling back to a plain string.
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub enum StatsPeriod {
    Daily {
        #[arg(long)]
        date: Option<String>,
    },
    /// Sunday-start week containing the date.
    Weekly {
        #[arg(long)]
        date: Option<String>,
    },
    /// Calendar month containing the date.
    Monthly {
        #[arg(long)]
        date: Option<String>,
    },
}

/// Everything a command needs: the storage bridge and the two stores built
/// over it.
pub struct Context {
    pub storage: Rc<JsonFileStorage>,
    pub clock: Rc<dyn Clock>,
    pub todos: TodoStore,
    pub categories: CategoryRegistry,
    pub json: bool,
}

impl Context {
    pub fn open(db_path: &Path, json: bool) -> Result<Self> {
        let storage = Rc::new(JsonFileStorage::open(db_path)?);
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let shared: Rc<dyn Storage> = storage.clone();
        Ok(Self {
            todos: TodoStore::load(Rc::clone(&shared), Rc::clone(&clock)),
            categories: CategoryRegistry::load(shared, Rc::clone(&clock)),
            storage,
            clock,
            json,
        })
    }

    fn today(&self) -> NaiveDate {
        self.clock.today_local()
    }

    fn date_arg(&self, date: Option<&str>) -> Result<NaiveDate> {
        match date {
            None => Ok(self.today()),
            Some(s) => parse_date_input(s, self.today())
                .ok_or_else(|| Error::InvalidArgument(format!("unrecognised date '{s}'"))),
        }
    }

    /// Accept a category id, or a name matched case-insensitively.
    fn category_arg(&self, s: &str) -> Result<String> {
        if let Some(c) = self.categories.get(s) {
            return Ok(c.id.clone());
        }
        self.categories
            .all()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(s))
            .map(|c| c.id.clone())
            .ok_or_else(|| Error::category_not_found(s))
    }

    fn task(&self, id: &str) -> Result<&Task> {
        self.todos.get(id).ok_or_else(|| Error::task_not_found(id))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedTask<'a> {
    #[serde(flatten)]
    task: &'a Task,
    effective_minutes: u64,
    depth: usize,
}

/// Launch the terminal user interface.
pub fn cmd_ui(ctx: Context) -> Result<()> {
    run_tui(ctx)?;
    Ok(())
}

/// Add a new task.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    ctx: &mut Context,
    title: String,
    emoji: Option<String>,
    desc: Option<String>,
    date: Option<String>,
    parent: Option<String>,
    category: Option<String>,
    order: Option<i64>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidArgument("title must not be empty".into()));
    }
    let date = match (&date, &parent) {
        (None, Some(p)) => ctx.task(p)?.date_created,
        _ => ctx.date_arg(date.as_deref())?,
    };
    if let Some(p) = &parent {
        ctx.task(p)?;
    }
    let category = category.map(|c| ctx.category_arg(&c)).transpose()?;

    let id = ctx.todos.add(TaskDraft {
        title,
        emoji,
        description: desc,
        date_created: Some(date),
        parent_id: parent,
        category,
        order,
    });
    if ctx.json {
        print_json(&serde_json::json!({ "id": id }))
    } else {
        println!("Added {id} for {date}");
        Ok(())
    }
}

/// Add a placeholder sub-task.
pub fn cmd_child(
    ctx: &mut Context,
    parent: String,
    date: Option<String>,
    title: Option<String>,
) -> Result<()> {
    let date = match date {
        Some(d) => ctx.date_arg(Some(&d))?,
        None => ctx.task(&parent)?.date_created,
    };
    let Lookup::Found(id) = ctx.todos.add_child(&parent, date) else {
        return Err(Error::task_not_found(parent));
    };
    if let Some(title) = title {
        ctx.todos.update(
            &id,
            TaskPatch {
                title: Some(title),
                ..TaskPatch::default()
            },
        );
    }
    if ctx.json {
        print_json(&serde_json::json!({ "id": id, "parentId": parent }))
    } else {
        println!("Added sub-task {id} under {parent}");
        Ok(())
    }
}

/// List a day's tasks in the requested order.
pub fn cmd_list(ctx: &Context, date: Option<String>, sort: SortMode, tree: bool) -> Result<()> {
    let date = ctx.date_arg(date.as_deref())?;
    let sorted = ctx.todos.list_sorted(date, sort);
    let rows: Vec<(&Task, usize)> = if tree {
        tree_rows(&sorted)
    } else {
        sorted.into_iter().map(|t| (t, 0)).collect()
    };

    if ctx.json {
        let listed: Vec<ListedTask> = rows
            .iter()
            .map(|(task, depth)| ListedTask {
                task: *task,
                effective_minutes: ctx.todos.effective_minutes(task),
                depth: *depth,
            })
            .collect();
        return print_json(&listed);
    }

    if rows.is_empty() {
        println!("No tasks for {date}.");
        return Ok(());
    }
    println!("{date} · sorted by {}", sort.label());
    print_table(&rows, &ctx.categories, |t| ctx.todos.effective_minutes(t));
    println!(
        "Recorded: {}",
        format_minutes(ctx.todos.total_work_time(date))
    );
    Ok(())
}

/// View detailed information about a task.
pub fn cmd_show(ctx: &Context, id: String) -> Result<()> {
    let task = ctx.task(&id)?;
    let children = ctx.todos.children_of(&id);

    if ctx.json {
        return print_json(&serde_json::json!({
            "task": task,
            "effectiveMinutes": ctx.todos.effective_minutes(task),
            "children": children,
        }));
    }

    let category = task
        .category
        .as_deref()
        .map(|c| ctx.categories.name_of(c).unwrap_or(c).to_string())
        .unwrap_or_else(|| "-".into());
    println!("ID:           {}", task.id);
    println!("Title:        {}", display_title(task));
    println!("Status:       {}", format_status(task.status));
    println!("Date:         {}", task.date_created);
    println!("Category:     {category}");
    println!("Order:        {}", task.order);
    println!(
        "Time:         {} (recorded {})",
        format_minutes(ctx.todos.effective_minutes(task)),
        format_minutes(task.total_time)
    );
    println!("Parent:       {}", task.parent_id.as_deref().unwrap_or("-"));
    println!(
        "Description:\n{}\n",
        task.description.as_deref().unwrap_or("-")
    );
    println!("Sub-tasks:");
    if children.is_empty() {
        println!("  -");
    }
    for child in children {
        println!(
            "  {} {} (#{})",
            status_glyph(child.status),
            display_title(child),
            child.id
        );
    }
    Ok(())
}

/// Update fields on a task.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    ctx: &mut Context,
    id: String,
    title: Option<String>,
    emoji: Option<String>,
    clear_emoji: bool,
    desc: Option<String>,
    category: Option<String>,
    clear_category: bool,
    order: Option<i64>,
    date: Option<String>,
) -> Result<()> {
    let category = match (category, clear_category) {
        (_, true) => Some(None),
        (Some(c), false) => Some(Some(ctx.category_arg(&c)?)),
        (None, false) => None,
    };
    let patch = TaskPatch {
        title,
        emoji: if clear_emoji { Some(None) } else { emoji.map(Some) },
        description: desc.map(Some),
        date_created: date.map(|d| ctx.date_arg(Some(&d))).transpose()?,
        category,
        order,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument("nothing to update".into()));
    }

    if ctx.todos.update(&id, patch).is_not_found() {
        return Err(Error::task_not_found(id));
    }
    if ctx.json {
        print_json(ctx.task(&id)?)
    } else {
        println!("Updated {id}");
        Ok(())
    }
}

/// Change a task's status and report the time folded in.
pub fn cmd_status(ctx: &mut Context, id: String, status: Status) -> Result<()> {
    let Lookup::Found(change) = ctx.todos.set_status(&id, status) else {
        return Err(Error::task_not_found(id));
    };
    if ctx.json {
        return print_json(&change);
    }
    if change.minutes_added > 0 {
        println!(
            "{id}: {} -> {} (+{}, total {})",
            format_status(change.from),
            format_status(change.to),
            format_minutes(change.minutes_added),
            format_minutes(change.total_time)
        );
    } else {
        println!(
            "{id}: {} -> {}",
            format_status(change.from),
            format_status(change.to)
        );
    }
    Ok(())
}

/// Delete a task and its subtree.
pub fn cmd_delete(ctx: &mut Context, id: String) -> Result<()> {
    let Lookup::Found(removed) = ctx.todos.delete(&id) else {
        return Err(Error::task_not_found(id));
    };
    if ctx.json {
        print_json(&serde_json::json!({ "id": id, "removed": removed }))
    } else {
        println!("Deleted {id} ({removed} task(s) removed)");
        Ok(())
    }
}

/// Copy yesterday's unfinished work to today.
pub fn cmd_carry_over(ctx: &mut Context) -> Result<()> {
    let offset = carry_over_offset(&ctx.storage.settings()?);
    let copied = ctx.todos.copy_incomplete_from_yesterday(offset);
    if ctx.json {
        print_json(&serde_json::json!({ "copied": copied }))
    } else {
        if copied == 0 {
            println!("Nothing to carry over from yesterday.");
        } else {
            println!("Carried over {copied} task(s) from yesterday.");
        }
        Ok(())
    }
}

/// Total recorded minutes for a day.
pub fn cmd_total(ctx: &Context, date: Option<String>) -> Result<()> {
    let date = ctx.date_arg(date.as_deref())?;
    let total = ctx.todos.total_work_time(date);
    if ctx.json {
        print_json(&serde_json::json!({ "date": date, "totalMinutes": total }))
    } else {
        println!("{date}: {}", format_minutes(total));
        Ok(())
    }
}

/// Handle category management commands.
pub fn cmd_category(ctx: &mut Context, action: CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List => {
            if ctx.json {
                return print_json(ctx.categories.all());
            }
            println!("{:<28} {:<9} {}", "ID", "Color", "Name");
            for c in ctx.categories.all() {
                println!("{:<28} {:<9} {}", c.id, c.color, c.name);
            }
        }
        CategoryAction::Add { name, color } => {
            if !is_hex_color(&color) {
                return Err(Error::InvalidArgument(format!("'{color}' is not a hex colour")));
            }
            let id = ctx.categories.add(&name, &color);
            if ctx.json {
                return print_json(&serde_json::json!({ "id": id }));
            }
            println!("Added category {id} ({name})");
        }
        CategoryAction::Update { id, name, color } => {
            if let Some(c) = &color {
                if !is_hex_color(c) {
                    return Err(Error::InvalidArgument(format!("'{c}' is not a hex colour")));
                }
            }
            if ctx
                .categories
                .update(&id, CategoryPatch { name, color })
                .is_not_found()
            {
                return Err(Error::category_not_found(id));
            }
            if !ctx.json {
                println!("Updated category {id}");
            }
        }
        CategoryAction::Delete { id } => {
            if ctx.categories.delete(&id).is_not_found() {
                return Err(Error::category_not_found(id));
            }
            if !ctx.json {
                println!("Deleted category {id}");
            }
        }
    }
    Ok(())
}

/// Show or change settings.
pub fn cmd_settings(ctx: &Context, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = ctx.storage.settings()?;
            if ctx.json {
                return print_json(&settings);
            }
            for (k, v) in &settings {
                println!("{k:<26} {v}");
            }
        }
        SettingsAction::Set { key, value } => {
            let parsed = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
            if key == CARRY_OVER_OFFSET_KEY && parse_offset_hours(&parsed).is_none() {
                return Err(Error::InvalidArgument(format!(
                    "{key} must be a whole number of hours between -23 and 23, got {parsed}"
                )));
            }
            tracing::debug!(%key, value = %parsed, "setting changed");
            ctx.storage.set_setting(&key, parsed)?;
            if !ctx.json {
                println!("Set {key}");
            }
        }
    }
    Ok(())
}

/// Print statistics for a period.
pub fn cmd_stats(ctx: &Context, period: StatsPeriod) -> Result<()> {
    let tasks = ctx.todos.all();
    match period {
        StatsPeriod::Daily { date } => {
            let date = ctx.date_arg(date.as_deref())?;
            let daily = stats::daily(tasks, date);
            if ctx.json {
                return print_json(&daily);
            }
            println!("{date}");
            println!(
                "  Tasks:           {} ({} completed, {}%)",
                daily.total_todos,
                daily.completed_todos,
                stats::completion_rate(tasks, date)
            );
            println!("  Time:            {}", format_minutes(daily.total_time_spent));
            println!("  Context switches {}", daily.context_switches);
            for (category, count) in &daily.categories {
                println!("  {:<16} {count}", category_label(ctx, category));
            }
        }
        StatsPeriod::Weekly { date } => {
            let date = ctx.date_arg(date.as_deref())?;
            let weekly = stats::weekly(tasks, date);
            if ctx.json {
                return print_json(&weekly);
            }
            println!("Week of {}", weekly.week_start);
            for day in &weekly.daily_stats {
                println!(
                    "  {} {}  {:>2}/{:<2} {}",
                    day.date,
                    day.date.format("%a"),
                    day.completed_todos,
                    day.total_todos,
                    format_minutes(day.total_time_spent)
                );
            }
            println!(
                "  Total: {} · {} completed · {} switches",
                format_minutes(weekly.weekly_total_time),
                weekly.weekly_completed_todos,
                weekly.weekly_context_switches
            );
            print_top_categories(ctx, &weekly.top_categories);
        }
        StatsPeriod::Monthly { date } => {
            let date = ctx.date_arg(date.as_deref())?;
            let monthly = stats::monthly(tasks, date);
            if ctx.json {
                return print_json(&monthly);
            }
            println!("{}", monthly.month);
            for week in &monthly.weekly_stats {
                println!(
                    "  Week of {}  {:>3} completed  {}",
                    week.week_start,
                    week.weekly_completed_todos,
                    format_minutes(week.weekly_total_time)
                );
            }
            println!(
                "  Total: {} · {} completed · {} switches",
                format_minutes(monthly.monthly_total_time),
                monthly.monthly_completed_todos,
                monthly.monthly_context_switches
            );
            print_top_categories(ctx, &monthly.top_categories);
        }
    }
    Ok(())
}

fn category_label<'a>(ctx: &'a Context, id: &'a str) -> &'a str {
    ctx.categories.name_of(id).unwrap_or(id)
}

fn print_top_categories(ctx: &Context, top: &[stats::CategoryCount]) {
    if top.is_empty() {
        return;
    }
    println!("  Top categories:");
    for entry in top {
        println!("    {:<16} {}", category_label(ctx, &entry.category), entry.count);
    }
}

/// Export everything as a JSON bundle.
pub fn cmd_export(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let bundle = ctx.storage.export(ctx.clock.now())?;
    let text = serde_json::to_string_pretty(&bundle)?;
    match output {
        Some(path) => {
            fs::write(&path, text + "\n")?;
            println!(
                "Exported {} task(s) and {} categories to {}",
                bundle.todos.len(),
                bundle.categories.len(),
                path.display()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Import a JSON bundle with automatic backup.
pub fn cmd_import(ctx: &mut Context, input: PathBuf, no_backup: bool) -> Result<()> {
    let text = fs::read_to_string(&input)?;
    let bundle: ImportBundle = serde_json::from_str(&text)?;
    if bundle.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "{} has no todos, categories or settings",
            input.display()
        )));
    }

    if !no_backup {
        if let Some(path) = ctx.storage.path().filter(|p| p.exists()) {
            let backup = create_backup(path)?;
            println!("Created backup: {}", backup.display());
        }
    }

    let todos = bundle.todos.as_ref().map(Vec::len);
    let categories = bundle.categories.as_ref().map(Vec::len);
    ctx.storage.import(bundle)?;
    ctx.todos.reload();
    ctx.categories.reload();
    tracing::debug!(input = %input.display(), ?todos, ?categories, "import finished");

    if ctx.json {
        print_json(&serde_json::json!({ "todos": todos, "categories": categories }))
    } else {
        println!(
            "Imported {} task(s), {} categories",
            todos.map_or("no".to_string(), |n| n.to_string()),
            categories.map_or("no".to_string(), |n| n.to_string())
        );
        Ok(())
    }
}

/// Wipe the data file back to defaults.
pub fn cmd_clear(ctx: &mut Context, yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::InvalidArgument(
            "refusing to clear without --yes".into(),
        ));
    }
    ctx.storage.clear()?;
    ctx.todos.reload();
    ctx.categories.reload();
    println!("All data cleared.");
    Ok(())
}

/// Print where the data file lives.
pub fn cmd_path(ctx: &Context) -> Result<()> {
    if let Some(path) = ctx.storage.path() {
        println!("{}", path.display());
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Dispatch a parsed subcommand.
pub fn run(command: Commands, db_path: &Path, json: bool) -> Result<()> {
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let mut ctx = Context::open(db_path, json)?;
    match command {
        Commands::Completions { .. } => Ok(()),
        Commands::Ui => cmd_ui(ctx),
        Commands::Add { title, emoji, desc, date, parent, category, order } =>
            cmd_add(&mut ctx, title, emoji, desc, date, parent, category, order),
        Commands::Child { parent, date, title } => cmd_child(&mut ctx, parent, date, title),
        Commands::List { date, sort, tree } => cmd_list(&ctx, date, sort, tree),
        Commands::Show { id } => cmd_show(&ctx, id),
        Commands::Update { id, title, emoji, clear_emoji, desc, category, clear_category, order, date } =>
            cmd_update(&mut ctx, id, title, emoji, clear_emoji, desc, category, clear_category, order, date),
        Commands::Status { id, status } => cmd_status(&mut ctx, id, status),
        Commands::Start { id } => cmd_status(&mut ctx, id, Status::InProgress),
        Commands::Pause { id } => cmd_status(&mut ctx, id, Status::Paused),
        Commands::Complete { id } => cmd_status(&mut ctx, id, Status::Completed),
        Commands::Reopen { id } => cmd_status(&mut ctx, id, Status::Waiting),
        Commands::Delete { id } => cmd_delete(&mut ctx, id),
        Commands::CarryOver => cmd_carry_over(&mut ctx),
        Commands::Total { date } => cmd_total(&ctx, date),
        Commands::Category { action } => cmd_category(&mut ctx, action),
        Commands::Settings { action } => cmd_settings(&ctx, action),
        Commands::Stats { period } => cmd_stats(&ctx, period),
        Commands::Export { output } => cmd_export(&ctx, output),
        Commands::Import { input, no_backup } => cmd_import(&mut ctx, input, no_backup),
        Commands::Clear { yes } => cmd_clear(&mut ctx, yes),
        Commands::Path => cmd_path(&ctx),
    }
}
