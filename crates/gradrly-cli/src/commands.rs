//! Subcommand handlers: wire configuration to the provider factory, the
//! grading service, and the local stores.

use crate::output;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Subcommand;
use gradrly_core::catalog::{Catalog, GradeRecord};
use gradrly_core::config::GradrlyConfig;
use gradrly_core::directory::{Directory, RegisterRequest, UserRole};
use gradrly_core::grading::{warn_on_rubric_imbalance, Criterion, GradingRequest, GradingService};
use gradrly_core::llm::providers::create_llm_client;
use gradrly_core::store::JsonStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Register a new account
    Register {
        #[clap(long)]
        email: String,
        #[clap(long)]
        name: String,
        #[clap(long, value_parser = parse_role)]
        role: UserRole,
        #[clap(long)]
        institution: String,
        #[clap(long, help = "For graders: the professor's email")]
        professor_email: Option<String>,
    },
    /// Sign in (mock authentication)
    Login {
        #[clap(long)]
        email: String,
        #[clap(long, default_value = "")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum UniversityCommands {
    /// List known universities
    List,
    /// Add a university
    Add {
        #[clap(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssignmentCommands {
    /// Store an assignment from a YAML spec file
    Create {
        #[clap(long)]
        file: PathBuf,
    },
    /// List stored assignments
    List,
}

pub struct GradeArgs {
    pub assignment: Option<PathBuf>,
    pub assignment_id: Option<String>,
    pub submission: PathBuf,
    pub student: Option<String>,
    pub instructions: Option<String>,
    pub json: bool,
}

/// Assignment spec as written by hand in YAML.
#[derive(Debug, Deserialize)]
pub struct AssignmentSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub max_points: u32,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub due_date: Option<String>,
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    match value {
        "professor" => Ok(UserRole::Professor),
        "student" => Ok(UserRole::Student),
        "grader" => Ok(UserRole::Grader),
        other => Err(format!(
            "unknown role '{}', expected professor, student, or grader",
            other
        )),
    }
}

fn open_store(config: &GradrlyConfig) -> Result<JsonStore> {
    let store = match &config.storage.data_dir {
        Some(dir) => JsonStore::new(dir.clone())?,
        None => JsonStore::open_default()?,
    };
    Ok(store)
}

fn build_service(config: &GradrlyConfig) -> Result<GradingService> {
    let llm = create_llm_client(&config.llm)?;
    let mut service = GradingService::new(llm);
    if let Some(system_prompt) = &config.grading.system_prompt {
        service = service.with_system_prompt(system_prompt.clone());
    }
    Ok(service)
}

fn load_assignment_spec(path: &Path) -> Result<AssignmentSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read assignment spec {}", path.display()))?;
    let spec: AssignmentSpec = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse assignment spec {}", path.display()))?;
    warn_on_rubric_imbalance(&spec.criteria, spec.max_points);
    Ok(spec)
}

pub async fn grade(config: &GradrlyConfig, args: GradeArgs) -> Result<()> {
    let store = open_store(config)?;
    let mut catalog = Catalog::open(store);

    let (assignment_id, spec) = match (&args.assignment, &args.assignment_id) {
        (Some(path), _) => (None, load_assignment_spec(path)?),
        (None, Some(id)) => {
            let assignment = catalog
                .find_assignment(id)
                .ok_or_else(|| anyhow!("No stored assignment matches '{}'", id))?;
            (
                Some(assignment.id.clone()),
                AssignmentSpec {
                    title: assignment.title.clone(),
                    description: assignment.description.clone(),
                    max_points: assignment.max_points,
                    criteria: assignment.criteria.clone(),
                    due_date: assignment.due_date.clone(),
                },
            )
        }
        (None, None) => {
            return Err(anyhow!("Pass either --assignment <file> or --assignment-id <id>"))
        }
    };

    let submission_content = std::fs::read_to_string(&args.submission)
        .with_context(|| format!("Failed to read submission {}", args.submission.display()))?;

    let request = GradingRequest {
        assignment_title: spec.title.clone(),
        assignment_description: spec.description.clone(),
        submission_content,
        criteria: spec.criteria.clone(),
        max_points: spec.max_points,
        additional_instructions: args.instructions.clone(),
    };

    let service = build_service(config)?;
    let graded = service.grade_submission(&request).await;

    catalog.record_grade(GradeRecord {
        id: uuid::Uuid::new_v4().to_string(),
        assignment_id,
        assignment_title: spec.title.clone(),
        student: args.student.clone(),
        result: graded.result.clone(),
        provenance: graded.provenance.clone(),
        graded_at: Utc::now(),
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&graded)?);
    } else {
        output::print_graded(&request, &graded);
    }

    Ok(())
}

pub async fn rubric(
    config: &GradrlyConfig,
    description: &str,
    max_points: u32,
    json: bool,
) -> Result<()> {
    let service = build_service(config)?;
    let criteria = service.generate_rubric(description, max_points).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&criteria)?);
    } else {
        output::print_criteria_table(&criteria);
    }

    Ok(())
}

pub async fn suggest(config: &GradrlyConfig, submission: &Path, feedback: &str) -> Result<()> {
    let submission_content = std::fs::read_to_string(submission)
        .with_context(|| format!("Failed to read submission {}", submission.display()))?;

    let service = build_service(config)?;
    let suggestions = service.suggest_feedback(&submission_content, feedback).await;

    println!("\nSuggested feedback points:");
    for suggestion in suggestions {
        println!("  - {}", suggestion);
    }
    println!();

    Ok(())
}

pub fn account(config: &GradrlyConfig, action: AccountCommands) -> Result<()> {
    let store = open_store(config)?;
    let mut directory = Directory::open(store)?;

    match action {
        AccountCommands::Register {
            email,
            name,
            role,
            institution,
            professor_email,
        } => {
            let user = directory.register(RegisterRequest {
                email,
                name,
                role,
                institution,
                professor_email,
            })?;
            println!("Registered and signed in as {} ({})", user.name, user.email);
        }
        AccountCommands::Login { email, password } => {
            let user = directory.login(&email, &password)?;
            println!("Signed in as {} ({:?})", user.name, user.role);
        }
        AccountCommands::Logout => {
            directory.logout();
            println!("Signed out");
        }
        AccountCommands::Whoami => match directory.session() {
            Some(user) => {
                println!(
                    "{} <{}> - {:?} at {}",
                    user.name, user.email, user.role, user.institution
                );
            }
            None => println!("Not signed in"),
        },
    }

    Ok(())
}

pub fn university(config: &GradrlyConfig, action: UniversityCommands) -> Result<()> {
    let store = open_store(config)?;
    let mut directory = Directory::open(store)?;

    match action {
        UniversityCommands::List => {
            for university in directory.universities() {
                println!("{:<24} {}", university.id, university.name);
            }
        }
        UniversityCommands::Add { name } => {
            let id = directory.add_university(&name)?;
            println!("Added university '{}' with id {}", name, id);
        }
    }

    Ok(())
}

pub fn assignment(config: &GradrlyConfig, action: AssignmentCommands) -> Result<()> {
    let store = open_store(config)?;
    let mut catalog = Catalog::open(store);

    match action {
        AssignmentCommands::Create { file } => {
            let spec = load_assignment_spec(&file)?;
            let assignment = catalog.add_assignment(
                None,
                &spec.title,
                &spec.description,
                spec.max_points,
                spec.criteria,
                spec.due_date,
            )?;
            println!("Stored assignment '{}' with id {}", assignment.title, assignment.id);
        }
        AssignmentCommands::List => {
            for assignment in catalog.assignments() {
                println!(
                    "{:<38} {:<28} {} pts",
                    assignment.id, assignment.title, assignment.max_points
                );
            }
        }
    }

    Ok(())
}

pub fn history(config: &GradrlyConfig) -> Result<()> {
    let store = open_store(config)?;
    let catalog = Catalog::open(store);
    output::print_history_table(catalog.history());
    Ok(())
}
