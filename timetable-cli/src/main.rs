mod commands;
mod storage;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CustomEventArg, GlobalOptions};

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Plan a conflict-free course timetable and export it as ICS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog file: JSON array of section records
    #[arg(short, long, env = "TIMETABLE_CATALOG", global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Directory holding saved timetables
    #[arg(long, env = "TIMETABLE_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Only auto-select sections from this term code (e.g. 202409, or "current")
    #[arg(short, long, global = true, value_parser = commands::parse_term)]
    term: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog courses
    Courses {
        /// Only show one subject
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Show one section of the catalog
    Find { crn: u32 },

    /// Show the open timetable
    Show,

    /// Select a course, one section of each schedule type
    Select { subject: String, number: u32 },

    /// Pick a specific section for a schedule type (Lecture, Lab, Tutorial, ...)
    Pick {
        #[arg(value_name = "TYPE")]
        schedule_type: String,
        crn: u32,
    },

    /// Remove one section
    Remove { crn: u32 },

    /// Remove every section of a course
    #[command(name = "drop")]
    DropCourse { subject: String, number: u32 },

    /// Give a section its course color, or take it away
    Color {
        crn: u32,

        /// Release the color instead of assigning one
        #[arg(long)]
        release: bool,
    },

    /// Print the weekly calendar
    Events {
        /// Any day of the week to show (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Extra event, as "TITLE;YYYY-MM-DDTHH:MM;YYYY-MM-DDTHH:MM"
        #[arg(short, long = "event")]
        events: Vec<CustomEventArg>,
    },

    /// Write the weekly calendar to an ICS file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Calendar name
        #[arg(long)]
        calendar_name: Option<String>,

        /// Any day of the week to export (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Extra event, as "TITLE;YYYY-MM-DDTHH:MM;YYYY-MM-DDTHH:MM"
        #[arg(short, long = "event")]
        events: Vec<CustomEventArg>,
    },

    /// List saved timetables
    List,

    /// Save the open timetable under a name
    Save { name: String },

    /// Open a saved timetable
    Load { name: String },

    /// Start an empty timetable
    New,

    /// Delete a saved timetable
    Delete { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("timetable_cli={},timetable_core={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = GlobalOptions {
        catalog: cli.catalog,
        data_dir: cli.data_dir,
        term: cli.term,
    };
    let mut engine = commands::open_engine(&options)?;

    match cli.command {
        Commands::Courses { subject } => commands::courses_command(&engine, subject.as_deref()),
        Commands::Find { crn } => commands::find_command(&engine, crn),
        Commands::Show => commands::show_command(&engine),
        Commands::Select { subject, number } => {
            commands::select_command(&mut engine, &subject, number)
        }
        Commands::Pick { schedule_type, crn } => {
            commands::pick_command(&mut engine, &schedule_type, crn)
        }
        Commands::Remove { crn } => commands::remove_command(&mut engine, crn),
        Commands::DropCourse { subject, number } => {
            commands::drop_command(&mut engine, &subject, number)
        }
        Commands::Color { crn, release } => commands::color_command(&mut engine, crn, release),
        Commands::Events { date, events } => commands::events_command(&mut engine, date, events),
        Commands::Export {
            output,
            calendar_name,
            date,
            events,
        } => commands::export_command(
            &mut engine,
            commands::ExportParams {
                output,
                calendar_name,
                date,
                events,
            },
        ),
        Commands::List => commands::list_command(&engine),
        Commands::Save { name } => commands::save_command(&mut engine, &name),
        Commands::Load { name } => commands::load_command(&mut engine, &name),
        Commands::New => commands::new_command(&mut engine),
        Commands::Delete { name } => commands::delete_command(&mut engine, &name),
    }
}
