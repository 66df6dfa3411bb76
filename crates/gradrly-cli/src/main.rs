//! Command-line interface for the Gradrly grading toolkit.
//!
//! Every operation of the core library is reachable from here: grading a
//! submission against a rubric, drafting a rubric from an assignment
//! description, suggesting additional feedback, and the simulated
//! account/university directory and assignment catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradrly_core::config::ConfigLoader;
use log::LevelFilter;
use std::path::PathBuf;

mod commands;
mod output;

#[derive(Parser, Debug)]
#[clap(
    name = "gradrly",
    author,
    version = "0.1.0",
    about = "Gradrly - AI-assisted academic grading"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        default_value = "gradrly.yaml",
        help = "Configuration file (built-in defaults are used when the file does not exist)"
    )]
    config: PathBuf,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade a submission against an assignment's rubric
    Grade {
        #[clap(long, help = "Assignment spec file (YAML)", conflicts_with = "assignment_id")]
        assignment: Option<PathBuf>,

        #[clap(long, help = "Id or title of a stored assignment")]
        assignment_id: Option<String>,

        #[clap(long, help = "Submission text file")]
        submission: PathBuf,

        #[clap(long, help = "Student email recorded in the grading history")]
        student: Option<String>,

        #[clap(long, help = "Additional grading instructions")]
        instructions: Option<String>,

        #[clap(long, help = "Print the raw JSON result")]
        json: bool,
    },
    /// Generate a grading rubric from an assignment description
    Rubric {
        #[clap(long, help = "Assignment description text")]
        description: String,

        #[clap(long, default_value = "100")]
        max_points: u32,

        #[clap(long, help = "Print the raw JSON criteria")]
        json: bool,
    },
    /// Suggest additional feedback points for a submission
    Suggest {
        #[clap(long, help = "Submission text file")]
        submission: PathBuf,

        #[clap(long, help = "Feedback written so far")]
        feedback: String,
    },
    /// Manage the signed-in account
    Account {
        #[clap(subcommand)]
        action: commands::AccountCommands,
    },
    /// Manage the university directory
    University {
        #[clap(subcommand)]
        action: commands::UniversityCommands,
    },
    /// Manage stored assignments
    Assignment {
        #[clap(subcommand)]
        action: commands::AssignmentCommands,
    },
    /// Show the grading history
    History,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter_level(log_level).init();

    let config = ConfigLoader::from_file_or_default(&cli.config).await?;

    match cli.command {
        Commands::Grade {
            assignment,
            assignment_id,
            submission,
            student,
            instructions,
            json,
        } => {
            commands::grade(
                &config,
                commands::GradeArgs {
                    assignment,
                    assignment_id,
                    submission,
                    student,
                    instructions,
                    json,
                },
            )
            .await
        }
        Commands::Rubric {
            description,
            max_points,
            json,
        } => commands::rubric(&config, &description, max_points, json).await,
        Commands::Suggest {
            submission,
            feedback,
        } => commands::suggest(&config, &submission, &feedback).await,
        Commands::Account { action } => commands::account(&config, action),
        Commands::University { action } => commands::university(&config, action),
        Commands::Assignment { action } => commands::assignment(&config, action),
        Commands::History => commands::history(&config),
    }
}
