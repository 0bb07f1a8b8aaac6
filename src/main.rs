use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use karma::app::App;
use karma::config::{Config, LOG_ENV};
use karma::task::{NewTask, COMPLETED, DATE_FORMAT, PENDING};
use karma::{ui, TaskStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "karma")]
#[command(about = "Personal to-do list with a terminal UI")]
#[command(version)]
struct Cli {
    /// Task database file
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run a single command instead of the interactive UI
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        /// Task description
        task: String,
        /// Time of day (HH:MM)
        #[arg(short, long)]
        time: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Repeat the task every day
        #[arg(short, long)]
        repeat_daily: bool,
    },
    /// List tasks
    List {
        /// Only show tasks with this status
        #[arg(short, long)]
        status: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the completion analysis
    Analyze,
    /// Mark a task as completed
    Done {
        /// Task ID
        id: i64,
    },
    /// Mark a task as pending again
    Undo {
        /// Task ID
        id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    let log_dir = config.resolve_log_dir();
    if let Err(err) = init_tracing(&log_dir) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let db_path = config.resolve_db_path(cli.db.as_deref());
    let store = TaskStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    match cli.command {
        None => run_tui(store),
        Some(command) => run_command(&store, command),
    }
}

fn init_tracing(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("karma.log")
        .build(log_dir)
        .with_context(|| format!("Failed to open log file in {}", log_dir.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("karma=info")),
        )
        .with_writer(file_appender)
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(store: TaskStore) -> Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    info!("starting interactive session");
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("Terminal UI failed")
}

fn run_command(store: &TaskStore, command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            task,
            time,
            date,
            repeat_daily,
        } => {
            let date = date.unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string());
            let new_task = NewTask::new(&task, &time, &date, repeat_daily)?;
            let task = store.add_task(&new_task)?;
            println!("Added task #{}", task.id);
        }
        Commands::List { status, json } => {
            let tasks = match status {
                Some(status) => store.tasks_by_status(&status)?,
                None => store.list_tasks()?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                for task in &tasks {
                    println!("[#{}] {}", task.id, task);
                }
            }
        }
        Commands::Analyze => {
            print!("{}", store.analyze()?);
        }
        Commands::Done { id } => {
            store.set_status(id, COMPLETED)?;
            println!("Task #{id} marked {COMPLETED}");
        }
        Commands::Undo { id } => {
            store.set_status(id, PENDING)?;
            println!("Task #{id} marked {PENDING}");
        }
    }
    Ok(())
}
