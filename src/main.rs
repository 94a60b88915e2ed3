use chrono::{Datelike, Days, NaiveDate};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, RoutineCommands};
use config::Config;
use studyplan::domain::{EntryStatus, Plan, PlanningEntry, UserRoutine};
use studyplan::planner::{daily_summary, format_minutes, group_by_date};
use studyplan::storage::JsonStore;
use studyplan::{GenerationMode, Planner};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn setup_logging(default_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("studyplan.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none()
        && let Some(level) = default_level.and_then(|l| l.parse::<log::LevelFilter>().ok())
    {
        builder.filter_level(level);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    let store = JsonStore::open(&config.storage.data_dir).context("Failed to open data directory")?;
    if cli.is_verbose() {
        println!("{} {}", "Data directory:".yellow(), store.base_path().display());
    }
    let planner = Planner::default().with_limits(config.planner.clone());

    match &cli.command {
        Commands::Generate { plan, start, mode } => {
            handle_generate(&store, &planner, plan.as_deref(), *start, (*mode).into())
        }
        Commands::Complete {
            entry,
            minutes,
            plan,
            replan,
        } => handle_complete(&store, &planner, plan.as_deref(), entry, *minutes, *replan),
        Commands::Today { plan, date } => handle_today(&store, &planner, plan.as_deref(), *date),
        Commands::Calendar { plan, days } => handle_calendar(&store, &planner, plan.as_deref(), *days),
        Commands::Routine { command } => handle_routine(&store, command),
        Commands::Import { path } => handle_import(&store, path),
        Commands::Plans => handle_plans(&store),
    }
}

/// Load the routine and the plan it (or the caller) points at
fn load_context(store: &JsonStore, plan_id: Option<&str>) -> Result<(UserRoutine, Plan)> {
    let routine = store.load_routine().context("Failed to load routine")?;
    let plan_id = plan_id
        .map(str::to_string)
        .or_else(|| routine.selected_plan_id.clone())
        .ok_or_else(|| eyre!("No plan given and none selected (see `studyplan routine select`)"))?;
    let plan = store
        .load_plan(&plan_id)
        .context(format!("Failed to load plan {}", plan_id))?;
    Ok((routine, plan))
}

fn handle_generate(
    store: &JsonStore,
    planner: &Planner,
    plan_id: Option<&str>,
    start: Option<NaiveDate>,
    mode: GenerationMode,
) -> Result<()> {
    let (routine, plan) = load_context(store, plan_id)?;
    let existing = store.load_schedule(&plan.id).context("Failed to load schedule")?;
    let start = start.unwrap_or_else(|| planner.today());

    let schedule = planner.generate_schedule(&plan, &routine, start, &existing, mode);
    store
        .save_schedule(&plan.id, &schedule)
        .context("Failed to save schedule")?;

    let pending = schedule.iter().filter(|e| !e.is_completed()).count();
    let last = schedule.iter().map(|e| e.date).max();
    println!(
        "{} {} sessions for {} ({} open)",
        "Scheduled:".green(),
        schedule.len(),
        plan.name.bold(),
        pending
    );
    if let Some(last) = last {
        println!("  Last session on {}", last);
    }
    if routine.is_paused {
        println!("{}", "  Routine is paused: no new sessions were placed".yellow());
    }
    Ok(())
}

fn handle_complete(
    store: &JsonStore,
    planner: &Planner,
    plan_id: Option<&str>,
    entry_id: &str,
    minutes: u32,
    replan: bool,
) -> Result<()> {
    let (routine, plan) = load_context(store, plan_id)?;
    let schedule = store.load_schedule(&plan.id).context("Failed to load schedule")?;

    let completion = planner
        .complete(&schedule, entry_id, minutes, &plan)
        .context(format!("Failed to complete {}", entry_id))?;
    println!("{} {} ({} min)", "Completed:".green(), entry_id, minutes);
    if let Some(review) = &completion.review {
        println!(
            "  Review #{} scheduled on {}",
            review.review_step.unwrap_or_default(),
            review.date
        );
    }

    let updated = if replan {
        planner.generate_schedule(&plan, &routine, planner.today(), &completion.schedule, GenerationMode::Replan)
    } else {
        completion.schedule
    };
    store
        .save_schedule(&plan.id, &updated)
        .context("Failed to save schedule")?;
    Ok(())
}

fn describe(entry: &PlanningEntry, plan: &Plan) -> String {
    let goal = plan.find_goal(&entry.discipline_id, &entry.topic_id, &entry.goal_id);
    let title = goal
        .map(|g| {
            let lesson = entry
                .sub_goal_id
                .as_ref()
                .and_then(|sid| g.sub_goals.iter().find(|s| &s.id == sid))
                .map(|s| format!(" / {}", s.title))
                .unwrap_or_default();
            format!("[{}] {}{}", g.kind, g.title, lesson)
        })
        .unwrap_or_else(|| entry.goal_id.clone());
    let discipline = plan
        .discipline(&entry.discipline_id)
        .map(|d| d.name.as_str())
        .unwrap_or("?");
    let review = match entry.review_step {
        Some(step) if entry.is_review => format!(" (review {})", step),
        _ => String::new(),
    };
    format!("{} - {}{}", discipline, title, review)
}

fn status_marker(status: EntryStatus) -> ColoredString {
    match status {
        EntryStatus::Completed => "done".green(),
        EntryStatus::Pending => "todo".cyan(),
        EntryStatus::Delayed => "late".red(),
    }
}

fn handle_today(store: &JsonStore, planner: &Planner, plan_id: Option<&str>, date: Option<NaiveDate>) -> Result<()> {
    let (_, plan) = load_context(store, plan_id)?;
    let schedule = store.load_schedule(&plan.id).context("Failed to load schedule")?;
    let date = date.unwrap_or_else(|| planner.today());
    let summary = daily_summary(&schedule, date);

    let label = if summary.is_done() { "Day (all done):".green() } else { "Day:".cyan() };
    println!(
        "{} {}  {}/{} done, {} planned, {} spent",
        label,
        date,
        summary.completed,
        summary.total(),
        format_minutes(summary.planned_minutes),
        format_minutes(summary.spent_minutes)
    );
    for entry in &summary.entries {
        println!(
            "  {} {:>4} min  {}  {}",
            status_marker(entry.status),
            entry.duration_minutes,
            describe(entry, &plan),
            entry.id.dimmed()
        );
    }
    Ok(())
}

fn handle_calendar(store: &JsonStore, planner: &Planner, plan_id: Option<&str>, days: u32) -> Result<()> {
    let (_, plan) = load_context(store, plan_id)?;
    let schedule = store.load_schedule(&plan.id).context("Failed to load schedule")?;
    let from = planner.today();
    let until = from
        .checked_add_days(Days::new(days as u64))
        .ok_or_else(|| eyre!("Calendar range out of bounds"))?;

    for (date, entries) in group_by_date(&schedule).range(from..until) {
        let minutes: u32 = entries.iter().map(|e| e.duration_minutes).sum();
        println!(
            "{} {} ({})",
            WEEKDAYS[date.weekday().num_days_from_sunday() as usize].bold(),
            date,
            format_minutes(minutes)
        );
        for entry in entries {
            println!(
                "  {} {:>4} min  {}",
                status_marker(entry.status),
                entry.duration_minutes,
                describe(entry, &plan)
            );
        }
    }
    Ok(())
}

fn handle_routine(store: &JsonStore, command: &RoutineCommands) -> Result<()> {
    let mut routine = store.load_routine().context("Failed to load routine")?;
    match command {
        RoutineCommands::Show => {
            for (index, name) in WEEKDAYS.iter().enumerate() {
                let minutes = routine.days.get(&(index as u8)).copied().unwrap_or(0);
                println!("  {} {:>4} min", name, minutes);
            }
            println!("  Total {}/week", format_minutes(routine.weekly_total()));
            println!("  Profile: {}", routine.profile);
            println!(
                "  Plan: {}{}",
                routine.selected_plan_id.as_deref().unwrap_or("-"),
                if routine.is_paused { " (paused)" } else { "" }
            );
            return Ok(());
        }
        RoutineCommands::Set { weekday, minutes } => {
            routine.set_day(*weekday, *minutes)?;
        }
        RoutineCommands::Profile { profile } => routine.profile = (*profile).into(),
        RoutineCommands::Select { plan } => {
            store.load_plan(plan).context(format!("Unknown plan {}", plan))?;
            routine.selected_plan_id = Some(plan.clone());
        }
        RoutineCommands::Pause => routine.is_paused = true,
        RoutineCommands::Resume => routine.is_paused = false,
    }
    store.save_routine(&routine).context("Failed to save routine")?;
    println!("{}", "Routine updated".green());
    Ok(())
}

fn handle_import(store: &JsonStore, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let plan: Plan = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content).context("Failed to parse plan JSON")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse plan YAML")?
    };
    store.save_plan(&plan).context("Failed to store plan")?;
    println!("{} {} ({})", "Imported:".green(), plan.name, plan.id);
    Ok(())
}

fn handle_plans(store: &JsonStore) -> Result<()> {
    for id in store.list_plans().context("Failed to list plans")? {
        println!("  {}", id);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging at the configured level
    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
