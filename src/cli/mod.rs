use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};

use crate::models::{TimeOfDay, Weekday};

pub mod assign;
pub mod classes;
pub mod export;
pub mod people;
pub mod project;
pub mod settings;
pub mod show;
pub mod slots;
pub mod sync;
pub mod ui;

pub use assign::run_assign;
pub use classes::run_classes;
pub use export::run_export;
pub use people::run_people;
pub use project::run_project;
pub use settings::run_config;
pub use show::{run_count, run_show};
pub use slots::run_slots;
pub use sync::{run_pull, run_push};

#[derive(Parser)]
#[command(name = "rostercmd")]
#[command(about = "Weekly roster of people, time slots and classes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the people list
    #[command(subcommand)]
    People(PeopleCommand),
    /// Manage class tags and their colours
    #[command(subcommand)]
    Classes(ClassesCommand),
    /// Manage the daily time slots
    #[command(subcommand)]
    Slots(SlotsCommand),
    /// Set or clear an assignment
    #[command(subcommand)]
    Assign(AssignCommand),
    /// Print the roster grid
    Show(ShowArgs),
    /// Count assignments per class
    Count(CountArgs),
    /// Write the current roster to the remote store
    Push,
    /// Replace the local roster with the remote copy
    Pull(PullArgs),
    /// Save or load a project file
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Export the roster
    #[command(subcommand)]
    Export(ExportCommand),
    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

// ============================================================================
// People / Classes
// ============================================================================

#[derive(Subcommand)]
pub enum PeopleCommand {
    /// Add people; names may be separated by commas or given as separate arguments
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a person and all of their assignments
    Remove {
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    List,
}

#[derive(Subcommand)]
pub enum ClassesCommand {
    /// Add classes; names may be separated by commas or given as separate arguments
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a class and every assignment using it
    Remove {
        name: String,
        #[arg(short, long)]
        force: bool,
    },
    /// Change a class colour (e.g. "#f59e0b")
    Color { name: String, color: String },
    List,
}

// ============================================================================
// Slots / Assignments
// ============================================================================

#[derive(Subcommand)]
pub enum SlotsCommand {
    /// Add a slot; without --start it follows the latest slot
    Add {
        /// Start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,
    },
    /// Change the start or end of the slot at POSITION (1-based)
    Set {
        position: usize,
        /// "start" or "end"
        field: String,
        /// New time (HH:MM)
        time: String,
    },
    /// Remove the slot at POSITION and its assignments
    Remove {
        position: usize,
        #[arg(short, long)]
        force: bool,
    },
    /// Replace all slots with a template: school, halfday or custom
    Template {
        name: String,
        #[arg(short, long)]
        force: bool,
    },
    List,
}

#[derive(Subcommand)]
pub enum AssignCommand {
    /// Assign a class to a person at a slot
    Set(AssignSetArgs),
    /// Clear an assignment
    Remove {
        day: String,
        /// Slot start time (HH:MM)
        start: String,
        person: String,
    },
}

#[derive(Args)]
pub struct AssignSetArgs {
    pub day: String,
    /// Slot start time (HH:MM)
    pub start: String,
    pub person: String,
    pub class: String,
    /// Duration in minutes
    #[arg(short, long, default_value = "60")]
    pub duration: u32,
    #[arg(short, long)]
    pub notes: Option<String>,
}

// ============================================================================
// Views
// ============================================================================

#[derive(Args)]
pub struct ShowArgs {
    /// Day to show (mon..fri); all days when omitted
    pub day: Option<String>,
    /// Print without class colours
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args)]
pub struct CountArgs {
    /// A day (mon..fri) or "week"
    #[arg(default_value = "week")]
    pub scope: String,
}

// ============================================================================
// Persistence
// ============================================================================

#[derive(Args)]
pub struct PullArgs {
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Write the roster to a project file
    Save { path: String },
    /// Replace the roster with a project file
    Load {
        path: String,
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ExportCommand {
    /// One CSV per weekday plus a class summary
    Csv {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    Set { key: String, value: String },
    Unset { key: String },
}

pub(crate) fn parse_time(s: &str) -> anyhow::Result<TimeOfDay> {
    s.trim().parse::<TimeOfDay>().map_err(|e| anyhow!(e))
}

pub(crate) fn parse_day(s: &str) -> anyhow::Result<Weekday> {
    s.parse::<Weekday>().map_err(|e| anyhow!(e))
}

/// Join repeated arguments so each becomes its own entry for `parse_names`
pub(crate) fn join_names(names: &[String]) -> String {
    names.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_assign_set() {
        let cli = Cli::try_parse_from([
            "rostercmd", "assign", "set", "mon", "08:00", "Alice", "Maths", "-d", "45",
        ])
        .unwrap();
        match cli.command {
            Commands::Assign(AssignCommand::Set(args)) => {
                assert_eq!(args.day, "mon");
                assert_eq!(args.person, "Alice");
                assert_eq!(args.duration, 45);
                assert!(args.notes.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_cli_count_defaults_to_week() {
        let cli = Cli::try_parse_from(["rostercmd", "count"]).unwrap();
        match cli.command {
            Commands::Count(args) => assert_eq!(args.scope, "week"),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_time(" 08:30 ").unwrap(), TimeOfDay::new(8, 30).unwrap());
        assert!(parse_time("8.30").is_err());
        assert_eq!(parse_day("fri").unwrap(), Weekday::Friday);
        assert!(parse_day("sat").is_err());
    }

    #[test]
    fn test_join_names() {
        let names = vec!["Alice, Bob".to_string(), "Carol".to_string()];
        assert_eq!(join_names(&names), "Alice, Bob\nCarol");
    }
}
