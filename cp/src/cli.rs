//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Category, TaskStatus};

/// Chantier - construction site planning
#[derive(Parser)]
#[command(
    name = "chantier",
    about = "Generate, track and analyze construction site plannings",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Data is stored in ~/.local/share/chantier unless storage.store-dir is set"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Generate a planning from a project description and store its tasks
    Generate {
        /// Project description, e.g. "Construction d'une maison"
        description: String,

        /// Target duration in days
        #[arg(short, long, default_value = "30")]
        duration: u32,

        /// Team size
        #[arg(short, long, default_value = "5")]
        team: u32,

        /// Budget
        #[arg(short, long)]
        budget: Option<f64>,

        /// Priority keyword (repeatable); matching task titles become high priority
        #[arg(short, long = "priority")]
        priorities: Vec<String>,

        /// Remove existing tasks before storing the new ones
        #[arg(long)]
        replace: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Analyze the stored planning
    Analyze {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List stored tasks
    List {
        /// Only tasks with this status
        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// Only tasks in this category
        #[arg(long)]
        category: Option<Category>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one task
    Show {
        /// Task ID
        id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Change a task's status
    Status {
        /// Task ID
        id: String,

        /// New status (not-started, in-progress, completed, on-hold, cancelled)
        status: TaskStatus,
    },

    /// Log time against a task
    Log {
        /// Task ID
        id: String,

        /// Hours worked (manual entry)
        #[arg(long, conflicts_with_all = ["start", "stop"], required_unless_present_any = ["start", "stop"])]
        hours: Option<f64>,

        /// Entry description
        #[arg(short, long)]
        description: Option<String>,

        /// Start a timer
        #[arg(long, conflicts_with = "stop")]
        start: bool,

        /// Stop the running timer and log the elapsed time
        #[arg(long)]
        stop: bool,

        /// User logging the time
        #[arg(short, long, default_value = "current_user")]
        user: String,
    },

    /// Show logged time entries, per-task totals and running timers
    Time {
        /// Only entries that started today
        #[arg(long)]
        today: bool,

        /// Only entries and timers for this task
        #[arg(long)]
        task: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show dashboard statistics
    Stats {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Load the demonstration data set
    Demo,

    /// Remove every stored task, time entry and timer
    Clear,
}

/// Output format for list-like commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["chantier"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from([
            "chantier",
            "generate",
            "Construction d'une maison",
            "--duration",
            "45",
            "-p",
            "fondations",
            "-p",
            "toiture",
        ]);
        if let Some(Command::Generate {
            description,
            duration,
            team,
            budget,
            priorities,
            replace,
            format,
        }) = cli.command
        {
            assert_eq!(description, "Construction d'une maison");
            assert_eq!(duration, 45);
            assert_eq!(team, 5);
            assert!(budget.is_none());
            assert_eq!(priorities, vec!["fondations", "toiture"]);
            assert!(!replace);
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_list_filters() {
        let cli = Cli::parse_from(["chantier", "list", "--status", "in-progress", "--category", "plumbing", "-f", "json"]);
        if let Some(Command::List {
            status,
            category,
            format,
        }) = cli.command
        {
            assert_eq!(status, Some(TaskStatus::InProgress));
            assert_eq!(category, Some(Category::Plumbing));
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["chantier", "status", "task_1", "completed"]);
        assert!(matches!(
            cli.command,
            Some(Command::Status { status: TaskStatus::Completed, .. })
        ));
    }

    #[test]
    fn test_cli_parse_log_modes() {
        let cli = Cli::parse_from(["chantier", "log", "task_1", "--hours", "2.5"]);
        assert!(matches!(cli.command, Some(Command::Log { hours: Some(h), start: false, stop: false, .. }) if h == 2.5));

        let cli = Cli::parse_from(["chantier", "log", "task_1", "--start"]);
        assert!(matches!(cli.command, Some(Command::Log { hours: None, start: true, .. })));

        assert!(Cli::try_parse_from(["chantier", "log", "task_1"]).is_err());
        assert!(Cli::try_parse_from(["chantier", "log", "task_1", "--start", "--stop"]).is_err());
        assert!(Cli::try_parse_from(["chantier", "log", "task_1", "--hours", "1", "--stop"]).is_err());
    }

    #[test]
    fn test_cli_parse_time() {
        let cli = Cli::parse_from(["chantier", "time", "--today", "--task", "demo_2"]);
        if let Some(Command::Time { today, task, format }) = cli.command {
            assert!(today);
            assert_eq!(task.as_deref(), Some("demo_2"));
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Time command");
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["chantier", "-c", "/path/to/config.yml", "stats"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }
}
