//! CLI command definitions using clap.
//!
//! - generate: rebuild a plan's schedule from a start date
//! - complete: finish a session and chain its review
//! - today / calendar: read the schedule
//! - routine: edit the weekly routine
//! - import / plans: manage plan documents

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use studyplan::GenerationMode;
use studyplan::domain::Profile;

/// studyplan - study calendar generator with spaced review
#[derive(Parser, Debug)]
#[command(name = "studyplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate (or regenerate) the schedule of a plan
    Generate {
        /// Plan id (defaults to the routine's selected plan)
        plan: Option<String>,

        /// First day to place work on (defaults to today)
        #[arg(short, long)]
        start: Option<NaiveDate>,

        /// Why the schedule is being generated
        #[arg(short, long, value_enum, default_value_t = ModeArg::Replan)]
        mode: ModeArg,
    },

    /// Mark a session completed and schedule its next review
    Complete {
        /// Entry id to complete
        entry: String,

        /// Minutes actually spent
        #[arg(short, long)]
        minutes: u32,

        /// Plan id (defaults to the routine's selected plan)
        #[arg(short, long)]
        plan: Option<String>,

        /// Rebuild the remaining schedule afterwards
        #[arg(short, long)]
        replan: bool,
    },

    /// Show one day's sessions
    Today {
        /// Plan id (defaults to the routine's selected plan)
        plan: Option<String>,

        /// Day to show (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show upcoming days
    Calendar {
        /// Plan id (defaults to the routine's selected plan)
        plan: Option<String>,

        /// Number of days to show
        #[arg(short, long, default_value_t = 14)]
        days: u32,
    },

    /// Weekly routine management
    Routine {
        #[command(subcommand)]
        command: RoutineCommands,
    },

    /// Copy a plan document (YAML or JSON) into the store
    Import {
        /// Path to the plan document
        path: PathBuf,
    },

    /// List stored plans
    Plans,
}

/// Routine subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RoutineCommands {
    /// Print the current routine
    Show,

    /// Set the minutes available on a weekday (0 = Sunday .. 6 = Saturday)
    Set { weekday: u8, minutes: u32 },

    /// Set the reading profile
    Profile {
        #[arg(value_enum)]
        profile: ProfileArg,
    },

    /// Select the active plan
    Select { plan: String },

    /// Pause the plan (no new work is scheduled)
    Pause,

    /// Resume a paused plan
    Resume,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    New,
    Replan,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::New => GenerationMode::New,
            ModeArg::Replan => GenerationMode::Replan,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileArg {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<ProfileArg> for Profile {
    fn from(profile: ProfileArg) -> Self {
        match profile {
            ProfileArg::Beginner => Profile::Beginner,
            ProfileArg::Intermediate => Profile::Intermediate,
            ProfileArg::Advanced => Profile::Advanced,
        }
    }
}
