//! Chantier - construction site planning
//!
//! CLI entry point for generating, tracking and analyzing plannings.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use chantier::cli::{Cli, Command, OutputFormat};
use chantier::config::Config;
use chantier::demo::{demo_tasks, demo_time_entries};
use chantier::domain::{AiPrompt, Category, Priority, Store, Task, TaskStatus, TimeEntry};
use chantier::planning::PlanningService;
use chantier::stats::ProjectStats;
use chantier::timelog::{ActiveTimer, ActiveTimers, TimeFilter, TimeReport, log_manual_hours};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    // Logs go to stderr so stdout stays parseable with --format json
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(store_dir = %config.storage.store_dir, "Chantier loaded config");

    match cli.command {
        Some(Command::Generate {
            description,
            duration,
            team,
            budget,
            priorities,
            replace,
            format,
        }) => {
            let mut prompt = AiPrompt::new(description, duration, team).with_priorities(priorities);
            if let Some(budget) = budget {
                prompt = prompt.with_budget(budget);
            }
            cmd_generate(&config, &prompt, replace, format).await
        }
        Some(Command::Analyze { format }) => cmd_analyze(&config, format).await,
        Some(Command::List {
            status,
            category,
            format,
        }) => cmd_list(&config, status, category, format),
        Some(Command::Show { id, format }) => cmd_show(&config, &id, format),
        Some(Command::Status { id, status }) => cmd_status(&config, &id, status),
        Some(Command::Log {
            id,
            hours,
            description,
            start,
            stop,
            user,
        }) => cmd_log(&config, &id, hours, description.as_deref(), start, stop, &user),
        Some(Command::Time { today, task, format }) => cmd_time(&config, TimeFilter { today, task_id: task }, format),
        Some(Command::Stats { format }) => cmd_stats(&config, format),
        Some(Command::Delete { id }) => cmd_delete(&config, &id),
        Some(Command::Demo) => cmd_demo(&config),
        Some(Command::Clear) => cmd_clear(&config),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<Store> {
    let path = PathBuf::from(&config.storage.store_dir);
    Store::open(&path).context(format!("Failed to open store at {}", path.display()))
}

fn load_task(store: &Store, id: &str) -> Result<Task> {
    store
        .get::<Task>(id)?
        .ok_or_else(|| eyre::eyre!("Task not found: {}", id))
}

/// Generate a planning and store its tasks
async fn cmd_generate(config: &Config, prompt: &AiPrompt, replace: bool, format: OutputFormat) -> Result<()> {
    let service = PlanningService::from_config(config)?;
    let tasks = service.generate_planning(prompt).await?;

    let store = open_store(config)?;
    if replace {
        store.clear::<Task>()?;
    }
    store.upsert_all(tasks.clone())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
        OutputFormat::Text => {
            println!(
                "{} {} tasks from {} to {}",
                "Generated".green().bold(),
                tasks.len(),
                tasks.first().map(|t| t.start_date.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default(),
                tasks.last().map(|t| t.end_date.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default(),
            );
            println!();
            print_task_table(&tasks);
        }
    }
    Ok(())
}

/// Analyze the stored tasks
async fn cmd_analyze(config: &Config, format: OutputFormat) -> Result<()> {
    let service = PlanningService::from_config(config)?;
    let tasks: Vec<Task> = open_store(config)?.list()?;
    let messages = service.analyze_planning(&tasks).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&messages)?),
        OutputFormat::Text => {
            println!("{} ({} tasks)", "Planning analysis".bold(), tasks.len());
            for message in &messages {
                println!("  {}", message);
            }
        }
    }
    Ok(())
}

fn cmd_list(config: &Config, status: Option<TaskStatus>, category: Option<Category>, format: OutputFormat) -> Result<()> {
    let tasks: Vec<Task> = open_store(config)?
        .list::<Task>()?
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("No tasks found");
            } else {
                print_task_table(&tasks);
            }
        }
    }
    Ok(())
}

fn cmd_show(config: &Config, id: &str, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let task = load_task(&store, id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&task)?),
        OutputFormat::Text => {
            println!("{} {}", task.title.bold(), format!("({})", task.id).dimmed());
            println!("  {}", task.description);
            println!("  Status:     {}", task.status);
            println!("  Priority:   {}", colored_priority(task.priority));
            println!("  Category:   {}", task.category);
            println!("  Location:   {}", task.location);
            println!(
                "  Schedule:   {} → {}",
                task.start_date.format("%Y-%m-%d %H:%M"),
                task.end_date.format("%Y-%m-%d %H:%M")
            );
            println!(
                "  Hours:      {} estimated, {} actual",
                task.estimated_hours,
                task.actual_hours.unwrap_or(0.0)
            );
            if !task.assigned_to.is_empty() {
                println!("  Assigned:   {}", task.assigned_to.join(", "));
            }
            if !task.dependencies.is_empty() {
                println!("  Depends on: {}", task.dependencies.join(", "));
            }
            for material in &task.materials {
                println!("  Material:   {} {} {}", material.quantity, material.unit, material.name);
            }
            if let Some(notes) = &task.notes {
                println!("  Notes:      {}", notes);
            }
        }
    }
    Ok(())
}

fn cmd_status(config: &Config, id: &str, status: TaskStatus) -> Result<()> {
    let store = open_store(config)?;
    let mut task = load_task(&store, id)?;
    task.set_status(status, chrono::Utc::now());
    store.upsert(&task)?;
    println!("{} {} is now {}", "Updated".green(), task.id, status);
    Ok(())
}

fn cmd_log(
    config: &Config,
    id: &str,
    hours: Option<f64>,
    description: Option<&str>,
    start: bool,
    stop: bool,
    user: &str,
) -> Result<()> {
    let store = open_store(config)?;
    let task = load_task(&store, id)?;
    let now = chrono::Utc::now();

    let mut timers: ActiveTimers = store.list::<ActiveTimer>()?.into_iter().collect();

    if start {
        timers.start(&task.id, now)?;
        store.upsert_all(timers.to_records())?;
        println!("{} timer for: {}", "Started".green(), task.title);
        return Ok(());
    }

    let (entry, updated) = if stop {
        let logged = timers.stop(&task, user, now)?;
        store.remove::<ActiveTimer>(&task.id)?;
        logged
    } else {
        let hours = hours.ok_or_else(|| eyre::eyre!("--hours is required without --start/--stop"))?;
        log_manual_hours(&task, hours, description, user, now)?
    };

    store.upsert(&entry)?;
    store.upsert(&updated)?;
    println!(
        "{} {:.2}h for \"{}\" (total {:.2}h)",
        "Logged".green(),
        entry.hours,
        updated.title,
        updated.actual_hours.unwrap_or(0.0)
    );
    Ok(())
}

fn cmd_time(config: &Config, filter: TimeFilter, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let tasks: Vec<Task> = store.list()?;
    let entries: Vec<TimeEntry> = store.list()?;
    let timers: ActiveTimers = store.list::<ActiveTimer>()?.into_iter().collect();
    let report = TimeReport::build(&entries, &timers, &filter, chrono::Utc::now());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let title = |id: &str| tasks.iter().find(|t| t.id == id).map(|t| t.title.clone()).unwrap_or_default();

            if !report.running.is_empty() {
                println!("{}", "Running timers".bold());
                for timer in &report.running {
                    println!("  {} {}  {}", timer.task_id.dimmed(), title(timer.task_id.as_str()), timer.elapsed.yellow());
                }
                println!();
            }

            if report.entries.is_empty() {
                println!("No time entries found");
                return Ok(());
            }

            println!("{} ({} entries)", "Time entries".bold(), report.entries.len());
            for entry in &report.entries {
                println!(
                    "  {}  {:>5.2}h  {:<16} {}",
                    entry.start_time.format("%Y-%m-%d %H:%M"),
                    entry.hours,
                    entry.user_id,
                    entry.description.as_deref().unwrap_or("")
                );
            }
            println!();
            println!("{}", "Hours per task".bold());
            for total in &report.totals {
                println!("  {} {}  {:.2}h", total.task_id.dimmed(), title(total.task_id.as_str()), total.hours);
            }
            println!("Total: {:.2}h", report.total_hours);
        }
    }
    Ok(())
}

fn cmd_stats(config: &Config, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let tasks: Vec<Task> = store.list()?;
    let entries: Vec<TimeEntry> = store.list()?;
    let stats = ProjectStats::compute(&tasks, &entries, chrono::Utc::now());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("{}", "Project statistics".bold());
            println!("-----------------");
            println!("Total tasks: {}", stats.total_tasks);
            println!("  Completed:   {}", stats.completed_tasks);
            println!("  In progress: {}", stats.in_progress_tasks);
            println!("  Overdue:     {}", stats.overdue_tasks);
            println!("  Completion:  {:.0}%", stats.completion_rate());
            println!();
            println!("Estimated hours: {:.1}", stats.total_estimated_hours);
            println!("Actual hours:    {:.1}", stats.total_actual_hours);
            println!("Efficiency:      {:.0}%", stats.efficiency);
            println!();
            print_task_ids("Today", &stats.today_tasks, &tasks);
            print_task_ids("Upcoming", &stats.upcoming_tasks, &tasks);
        }
    }
    Ok(())
}

fn cmd_delete(config: &Config, id: &str) -> Result<()> {
    if open_store(config)?.remove::<Task>(id)? {
        println!("{} task {}", "Deleted".green(), id);
        Ok(())
    } else {
        Err(eyre::eyre!("Task not found: {}", id))
    }
}

fn cmd_demo(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let now = chrono::Utc::now();
    let tasks = demo_tasks(now);
    let entries = demo_time_entries(now);
    let (task_count, entry_count) = (tasks.len(), entries.len());

    store.upsert_all(tasks)?;
    store.upsert_all(entries)?;
    println!(
        "{} {} demo tasks and {} time entries",
        "Loaded".green(),
        task_count,
        entry_count
    );
    Ok(())
}

fn cmd_clear(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    store.clear::<Task>()?;
    store.clear::<TimeEntry>()?;
    store.clear::<ActiveTimer>()?;
    println!("{} all stored data", "Cleared".green());
    Ok(())
}

fn print_task_table(tasks: &[Task]) {
    for task in tasks {
        println!(
            "{:<24} {:<12} {:<8} {:>6.1}h  {}  {}",
            task.id.dimmed(),
            task.category.to_string(),
            colored_priority(task.priority),
            task.estimated_hours,
            task.start_date.format("%m-%d %H:%M"),
            task.title
        );
    }
}

fn print_task_ids(label: &str, ids: &[String], tasks: &[Task]) {
    println!("{}:", label);
    if ids.is_empty() {
        println!("  (none)");
    }
    for id in ids {
        let title = tasks.iter().find(|t| &t.id == id).map(|t| t.title.as_str()).unwrap_or("");
        println!("  {} {}", id.dimmed(), title);
    }
}

fn colored_priority(priority: Priority) -> colored::ColoredString {
    let label = priority.to_string();
    match priority {
        Priority::Urgent => label.red().bold(),
        Priority::High => label.yellow(),
        Priority::Medium => label.normal(),
        Priority::Low => label.dimmed(),
    }
}
