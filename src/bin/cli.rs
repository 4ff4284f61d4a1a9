//! Trackle CLI
//!
//! Command-line interface for the Trackle backend:
//! - Log in, register, log out
//! - Browse and edit the exercise library
//! - Manage workout templates
//! - Log workouts
//! - View statistics

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackle::client::{ApiClient, ErrorResponse, FileStore, PageRequest, Session, SessionState};
use trackle::config::{generate_default_config, Config, LoggingConfig};
use trackle::resources::{
    CreateTemplateRequest, CreateWorkoutRequest, Exercise, ExerciseQuery, ExerciseUpdate,
    NewExercise, RegisterRequest, Template, TemplateExercise, TemplateExerciseSpec, TimeRange,
    UpdateTemplateRequest, UpdateWorkoutRequest, WorkoutEntry, WorkoutEntrySpec, WorkoutQuery,
    WorkoutSummary,
};

#[derive(Parser)]
#[command(name = "trackle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track exercises, workout templates and workouts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/trackle/config.toml or ./trackle.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        username: String,
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the current session and ask the server whether it is valid
    Status,

    /// Exercise library
    #[command(subcommand)]
    Exercises(ExerciseCommand),

    /// Workout templates
    #[command(subcommand)]
    Templates(TemplateCommand),

    /// Logged workouts
    #[command(subcommand)]
    Workouts(WorkoutCommand),

    /// Statistics
    #[command(subcommand)]
    Stats(StatsCommand),

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ExerciseCommand {
    /// List exercises, one page at a time
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        limit: u32,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        muscle: Option<String>,
    },
    Show { id: u64 },
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        category: String,
        #[arg(short, long, default_value = "")]
        muscle: String,
        #[arg(short, long, default_value = "")]
        equipment: String,
    },
    /// Change fields of an exercise; omitted fields are kept
    Update {
        id: u64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        muscle: Option<String>,
        #[arg(short, long)]
        equipment: Option<String>,
    },
    Delete { id: u64 },
    /// Search by name or category
    Search { query: String },
    /// Exercises in one category
    Category { name: String },
    /// Suggestions based on your workout history
    Suggested,
    Categories,
    Muscles,
    Equipment,
}

#[derive(Subcommand)]
pub enum TemplateCommand {
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        limit: u32,
        #[arg(short, long)]
        search: Option<String>,
    },
    Show { id: u64 },
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Exercise slot as EXERCISE_ID:SETS, repeatable
        #[arg(short, long = "exercise")]
        exercises: Vec<String>,
    },
    Update {
        id: u64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    Delete { id: u64 },
    /// List the exercise slots of a template
    Slots { id: u64 },
    /// Add an exercise slot to a template
    AddExercise {
        template_id: u64,
        exercise_id: u64,
        #[arg(short, long, default_value = "3")]
        sets: u32,
    },
    /// Change the set count of a slot
    SetSets { slot_id: u64, sets: u32 },
    /// Remove an exercise slot
    RemoveExercise { slot_id: u64 },
}

#[derive(Subcommand)]
pub enum WorkoutCommand {
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        limit: u32,
        #[arg(short, long)]
        template: Option<u64>,
    },
    Show { id: u64 },
    Create {
        /// Template the workout follows
        template: u64,
        name: String,
        #[arg(short, long)]
        notes: Option<String>,
        /// Set as EXERCISE_ID:SET:REPS:WEIGHT, repeatable
        #[arg(short, long = "entry")]
        entries: Vec<String>,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Workout counts over time
    Workouts {
        #[arg(short, long, default_value = "month")]
        range: TimeRange,
    },
    /// Weight progression for one exercise
    Exercise {
        id: u64,
        #[arg(short, long, default_value = "month")]
        range: TimeRange,
    },
    /// Totals across all workouts
    Aggregate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The subscriber depends on the config, so discovery is logged after init.
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load_with_env(path)?;
            init_tracing(&config.logging);
            tracing::debug!("Loaded config from {:?}", path);
            config
        }
        None => {
            let discovery = Config::discover();
            init_tracing(&discovery.config.logging);
            discovery.log();
            discovery.config
        }
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_deref());
    }

    let session = Session::load(FileStore::new(&config.session.file));
    let client = ApiClient::new(config.api.client_config(), session)?.on_unauthorized(|path: &str| {
        if let Some(hint) = relogin_hint(path) {
            eprintln!("{}", hint);
        }
    });

    run(&cli, &client).await
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trackle={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// What to tell the user when the server answers `path` with 401.
/// A rejected login or registration already reports its own error.
fn relogin_hint(path: &str) -> Option<&'static str> {
    match path {
        "/login" | "/register" => None,
        _ => Some("Session expired or invalid. Run `trackle login` to sign in again."),
    }
}

/// Message on the first line, details on the second
fn api_error(err: ErrorResponse) -> anyhow::Error {
    if err.error.is_empty() {
        anyhow!("{}\n  (status {})", err.message, err.status)
    } else {
        anyhow!("{}\n  {} (status {})", err.message, err.error, err.status)
    }
}

async fn run(cli: &Cli, client: &ApiClient) -> anyhow::Result<()> {
    let format = cli.format;

    match &cli.command {
        Commands::Login { email, password } => {
            let resp = client.auth().login(email, password).await.map_err(api_error)?;
            if !client.session().is_authenticated() {
                bail!("Login failed: {}", resp.message);
            }
            println!("Logged in as {}", email);
        }

        Commands::Register { username, email, password } => {
            let request = RegisterRequest {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            };
            request.validate().map_err(|e| api_error(e.into()))?;

            let resp = client
                .auth()
                .register_and_login(&request)
                .await
                .map_err(api_error)?;
            if !resp.success {
                bail!("Registration failed: {}", resp.message);
            }
            println!("Registered and logged in as {}", username);
        }

        Commands::Logout => {
            client.auth().logout();
            println!("Logged out");
        }

        Commands::Status => {
            println!("Trackle v{}", env!("CARGO_PKG_VERSION"));
            println!("Backend: {}", client.config().base_url);
            println!();

            match client.session().state() {
                SessionState::Anonymous => {
                    println!("Not logged in.");
                    println!();
                    println!("Log in with:");
                    println!("  trackle login <email> --password <password>");
                    return Ok(());
                }
                SessionState::Authenticated { username, .. } => {
                    match username {
                        Some(name) => println!("Session: stored token for {}", name),
                        None => println!("Session: stored token"),
                    }
                }
            }

            match client.auth().check().await {
                Ok(resp) if resp.success => {
                    println!("Server: session is valid");
                }
                Ok(resp) => println!("Server: {}", resp.message),
                Err(err) => return Err(api_error(err)),
            }
        }

        Commands::Exercises(cmd) => exercises(client, cmd, format).await?,
        Commands::Templates(cmd) => templates(client, cmd, format).await?,
        Commands::Workouts(cmd) => workouts(client, cmd, format).await?,
        Commands::Stats(cmd) => stats(client, cmd, format).await?,

        Commands::Config { output } => write_config(output.as_deref())?,
    }

    Ok(())
}

async fn exercises(client: &ApiClient, cmd: &ExerciseCommand, format: Format) -> anyhow::Result<()> {
    let api = client.exercises();

    match cmd {
        ExerciseCommand::List { page, limit, search, category, muscle } => {
            let query = ExerciseQuery {
                page: PageRequest::new(*page, *limit),
                search: search.clone(),
                category: category.clone(),
                muscle: muscle.clone(),
            };
            let resp = api.list(&query).await.map_err(api_error)?;
            let pagination = resp.pagination();
            emit_rows(format, &resp.data.unwrap_or_default())?;
            print_page_footer(format, pagination.page, pagination.total_pages, pagination.total);
        }
        ExerciseCommand::Show { id } => {
            let exercise = api.get(*id).await.and_then(|r| r.into_data()).map_err(api_error)?;
            emit_rows(format, std::slice::from_ref(&exercise))?;
            if format == Format::Table && !exercise.description.is_empty() {
                println!();
                println!("{}", exercise.description);
            }
        }
        ExerciseCommand::Create { name, description, category, muscle, equipment } => {
            let exercise = NewExercise {
                name: name.clone(),
                description: description.clone(),
                category: category.clone(),
                primary_muscle: muscle.clone(),
                equipment: equipment.clone(),
            };
            exercise.validate().map_err(|e| api_error(e.into()))?;

            let resp = api.create(&exercise).await.map_err(api_error)?;
            match resp.data {
                Some(created) if created.id != 0 => {
                    println!("Created exercise {} ({})", created.name, created.id)
                }
                Some(created) => println!("Created exercise {}", created.name),
                None => println!("{}", resp.message),
            }
        }
        ExerciseCommand::Update { id, name, description, category, muscle, equipment } => {
            let update = ExerciseUpdate {
                name: name.clone(),
                description: description.clone(),
                category: category.clone(),
                primary_muscle: muscle.clone(),
                equipment: equipment.clone(),
            };
            if update == ExerciseUpdate::default() {
                bail!("Nothing to update");
            }
            if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                bail!("Name is required");
            }
            let resp = api.update(*id, &update).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Exercise updated"));
        }
        ExerciseCommand::Delete { id } => {
            let resp = api.delete(*id).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Exercise deleted"));
        }
        ExerciseCommand::Search { query } => {
            let resp = api.search(query).await.map_err(api_error)?;
            emit_rows(format, &resp.data.unwrap_or_default())?;
        }
        ExerciseCommand::Category { name } => {
            let resp = api.by_category(name).await.map_err(api_error)?;
            emit_rows(format, &resp.data.unwrap_or_default())?;
        }
        ExerciseCommand::Suggested => {
            let resp = api.suggested().await.map_err(api_error)?;
            emit_rows(format, &resp.data.unwrap_or_default())?;
        }
        ExerciseCommand::Categories => emit_list(format, api.categories().await.map_err(api_error)?.data)?,
        ExerciseCommand::Muscles => emit_list(format, api.muscles().await.map_err(api_error)?.data)?,
        ExerciseCommand::Equipment => emit_list(format, api.equipment().await.map_err(api_error)?.data)?,
    }
    Ok(())
}

async fn templates(client: &ApiClient, cmd: &TemplateCommand, format: Format) -> anyhow::Result<()> {
    let api = client.templates();

    match cmd {
        TemplateCommand::List { page, limit, search } => {
            let resp = api
                .list(PageRequest::new(*page, *limit), search.as_deref())
                .await
                .map_err(api_error)?;
            let pagination = resp.pagination();
            emit_rows(format, &resp.data.unwrap_or_default())?;
            print_page_footer(format, pagination.page, pagination.total_pages, pagination.total);
        }
        TemplateCommand::Show { id } => {
            let template = api.get(*id).await.and_then(|r| r.into_data()).map_err(api_error)?;
            if format == Format::Table {
                println!("{} ({})", template.name, template.id);
                if !template.description.is_empty() {
                    println!("{}", template.description);
                }
                println!();
            }
            emit_rows(format, &template.exercises)?;
        }
        TemplateCommand::Create { name, description, exercises } => {
            let request = CreateTemplateRequest {
                name: name.clone(),
                description: description.clone(),
                exercises: exercises
                    .iter()
                    .map(|s| parse_slot(s))
                    .collect::<anyhow::Result<Vec<_>>>()?,
            };
            request.validate().map_err(|e| api_error(e.into()))?;

            let resp = api.create(&request).await.map_err(api_error)?;
            match resp.data {
                Some(created) => println!("Created template {} ({})", created.name, created.id),
                None => println!("{}", non_empty(&resp.message, "Template created")),
            }
        }
        TemplateCommand::Update { id, name, description } => {
            let update = UpdateTemplateRequest {
                name: name.clone(),
                description: description.clone(),
                exercises: None,
            };
            if update == UpdateTemplateRequest::default() {
                bail!("Nothing to update");
            }
            let resp = api.update(*id, &update).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Template updated"));
        }
        TemplateCommand::Delete { id } => {
            let resp = api.delete(*id).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Template deleted"));
        }
        TemplateCommand::Slots { id } => {
            let resp = api.exercises(*id).await.map_err(api_error)?;
            emit_rows(format, &resp.data.unwrap_or_default())?;
        }
        TemplateCommand::AddExercise { template_id, exercise_id, sets } => {
            if *sets == 0 {
                bail!("Sets must be greater than 0");
            }
            let slot = api
                .add_exercise(*template_id, *exercise_id, *sets)
                .await
                .and_then(|r| r.into_data())
                .map_err(api_error)?;
            println!("Added exercise {} x{} as slot {}", slot.exercise_id, slot.sets, slot.id);
        }
        TemplateCommand::SetSets { slot_id, sets } => {
            if *sets == 0 {
                bail!("Sets must be greater than 0");
            }
            let resp = api.update_exercise(*slot_id, *sets).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Slot updated"));
        }
        TemplateCommand::RemoveExercise { slot_id } => {
            let resp = api.remove_exercise(*slot_id).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Slot removed"));
        }
    }
    Ok(())
}

async fn workouts(client: &ApiClient, cmd: &WorkoutCommand, format: Format) -> anyhow::Result<()> {
    let api = client.workouts();

    match cmd {
        WorkoutCommand::List { page, limit, template } => {
            let query = WorkoutQuery {
                page: PageRequest::new(*page, *limit),
                template_id: *template,
            };
            let resp = api.list(&query).await.map_err(api_error)?;
            let pagination = resp.pagination();
            emit_rows(format, &resp.data.unwrap_or_default())?;
            print_page_footer(format, pagination.page, pagination.total_pages, pagination.total);
        }
        WorkoutCommand::Show { id } => {
            let workout = api.get(*id).await.and_then(|r| r.into_data()).map_err(api_error)?;
            if format == Format::Table {
                println!("{} ({})", workout.name, workout.id);
                if let Some(template) = &workout.template_name {
                    println!("Template: {}", template);
                }
                if !workout.notes.is_empty() {
                    println!("Notes: {}", workout.notes);
                }
                println!();
            }
            emit_rows(format, &workout.entries)?;
        }
        WorkoutCommand::Create { template, name, notes, entries } => {
            let request = CreateWorkoutRequest {
                template_id: *template,
                name: name.clone(),
                notes: notes.clone(),
                entries: entries
                    .iter()
                    .map(|s| parse_entry(s))
                    .collect::<anyhow::Result<Vec<_>>>()?,
            };
            request.validate().map_err(|e| api_error(e.into()))?;

            let resp = api.create(&request).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Workout logged"));
        }
        WorkoutCommand::Update { id, name, notes } => {
            let update = UpdateWorkoutRequest {
                name: name.clone(),
                notes: notes.clone(),
                entries: None,
            };
            if update == UpdateWorkoutRequest::default() {
                bail!("Nothing to update");
            }
            let resp = api.update(*id, &update).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Workout updated"));
        }
        WorkoutCommand::Delete { id } => {
            let resp = api.delete(*id).await.map_err(api_error)?;
            println!("{}", non_empty(&resp.message, "Workout deleted"));
        }
    }
    Ok(())
}

async fn stats(client: &ApiClient, cmd: &StatsCommand, format: Format) -> anyhow::Result<()> {
    let api = client.stats();

    match cmd {
        StatsCommand::Workouts { range } => {
            let stats = api.workouts(*range).await.and_then(|r| r.into_data()).map_err(api_error)?;
            let rows: Vec<(String, String)> = stats
                .labels
                .iter()
                .zip(stats.data.iter())
                .map(|(label, count)| (label.clone(), count.to_string()))
                .collect();
            emit_pairs(format, ("Period", "Workouts"), &rows)?;
        }
        StatsCommand::Exercise { id, range } => {
            let progress = api
                .exercise(*id, *range)
                .await
                .and_then(|r| r.into_data())
                .map_err(api_error)?;
            if progress.dates.is_empty() && format == Format::Table {
                println!("No data for the selected time range");
                return Ok(());
            }
            let rows: Vec<(String, String)> = progress
                .dates
                .iter()
                .zip(progress.weights.iter())
                .map(|(date, weight)| (date.clone(), format!("{:.1}", weight)))
                .collect();
            emit_pairs(format, ("Date", "Max weight"), &rows)?;
        }
        StatsCommand::Aggregate => {
            let stats = api.aggregate().await.and_then(|r| r.into_data()).map_err(api_error)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => {
                    let rows = vec![
                        ("Total workouts".to_string(), stats.total_workouts.to_string()),
                        ("Total exercises".to_string(), stats.total_exercises.to_string()),
                        ("Average duration (min)".to_string(), format!("{:.1}", stats.avg_duration)),
                    ];
                    emit_pairs(format, ("Stat", "Value"), &rows)?;
                }
            }
        }
    }
    Ok(())
}

// ============================================
// Input parsing
// ============================================

fn parse_slot(s: &str) -> anyhow::Result<TemplateExerciseSpec> {
    let (exercise_id, sets) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid exercise slot {:?}. Use EXERCISE_ID:SETS", s))?;
    Ok(TemplateExerciseSpec {
        exercise_id: exercise_id.trim().parse().context("Invalid exercise id")?,
        sets: sets.trim().parse().context("Invalid set count")?,
    })
}

fn parse_entry(s: &str) -> anyhow::Result<WorkoutEntrySpec> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    let [exercise_id, set_number, reps, weight] = parts.as_slice() else {
        bail!("Invalid entry {:?}. Use EXERCISE_ID:SET:REPS:WEIGHT", s);
    };
    Ok(WorkoutEntrySpec {
        exercise_id: exercise_id.parse().context("Invalid exercise id")?,
        set_number: set_number.parse().context("Invalid set number")?,
        reps: reps.parse().context("Invalid rep count")?,
        weight: weight.parse().context("Invalid weight")?,
    })
}

fn non_empty<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.is_empty() {
        fallback
    } else {
        message
    }
}

// ============================================
// Output
// ============================================

/// A record that prints as one table/CSV row
trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl Tabular for Exercise {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Category", "Muscle", "Equipment"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            dash(&self.category),
            dash(&self.primary_muscle),
            dash(&self.equipment),
        ]
    }
}

impl Tabular for Template {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Exercises", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.exercises.len().to_string(),
            dash(&self.description),
        ]
    }
}

impl Tabular for TemplateExercise {
    fn headers() -> &'static [&'static str] {
        &["Slot", "Exercise", "Name", "Sets"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            id_or_dash(self.id),
            self.exercise_id.to_string(),
            self.name
                .clone()
                .or_else(|| self.exercise.as_ref().map(|e| e.name.clone()))
                .unwrap_or_else(|| "-".to_string()),
            self.sets.to_string(),
        ]
    }
}

impl Tabular for WorkoutSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Template", "Logged"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.workout_id.to_string(),
            self.workout_name.clone(),
            dash(&self.template_name),
            self.logged_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl Tabular for WorkoutEntry {
    fn headers() -> &'static [&'static str] {
        &["Exercise", "Set", "Reps", "Weight"]
    }

    fn row(&self) -> Vec<String> {
        let exercise = self
            .exercise_name
            .clone()
            .or_else(|| self.exercise.as_ref().map(|e| e.name.clone()))
            .unwrap_or_else(|| self.exercise_id.to_string());
        vec![
            exercise,
            self.set_number.to_string(),
            self.reps.to_string(),
            format!("{:.1}", self.weight),
        ]
    }
}

fn id_or_dash(id: u64) -> String {
    if id == 0 {
        "-".to_string()
    } else {
        id.to_string()
    }
}

fn dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

fn emit_rows<T: Tabular + Serialize>(format: Format, rows: &[T]) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(T::headers())?;
            for row in rows {
                writer.write_record(row.row())?;
            }
            writer.flush()?;
        }
        Format::Table => {
            if rows.is_empty() {
                println!("Nothing to show.");
                return Ok(());
            }
            let body: Vec<Vec<String>> = rows.iter().map(T::row).collect();
            print_table(T::headers(), &body);
        }
    }
    Ok(())
}

fn emit_pairs(format: Format, headers: (&str, &str), rows: &[(String, String)]) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            let map: serde_json::Map<String, serde_json::Value> = rows
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record([headers.0, headers.1])?;
            for (k, v) in rows {
                writer.write_record([k, v])?;
            }
            writer.flush()?;
        }
        Format::Table => {
            let body: Vec<Vec<String>> = rows.iter().map(|(k, v)| vec![k.clone(), v.clone()]).collect();
            print_table(&[headers.0, headers.1], &body);
        }
    }
    Ok(())
}

fn emit_list(format: Format, items: Option<Vec<String>>) -> anyhow::Result<()> {
    let items = items.unwrap_or_default();
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        _ => {
            for item in items {
                println!("{}", item);
            }
        }
    }
    Ok(())
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn print_page_footer(format: Format, page: u32, total_pages: u64, total: u64) {
    if format == Format::Table {
        println!();
        println!("Page {} of {} ({} total)", page, total_pages.max(1), total);
    }
}
