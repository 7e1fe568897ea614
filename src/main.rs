//! StudyMind CLI
//!
//! Command-line front end for the StudyMind backend:
//! - Sign in, register, sign out
//! - Dashboard and stats
//! - Materials, tasks, study sessions, notifications, progress
//! - AI study tools

use anyhow::{bail, Context};
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studymind::client::{
    AskRequest, CompendiumRequest, ExplainRequest, GenerateRequest, MaterialFilter,
    MaterialUpdate, MaterialUpload, NewSession, NewTask, NotificationFilter, ProcessUpload,
    ProgressFilter, SessionEnd, SessionFilter, SettingsUpdate, TaskFilter, TaskUpdate,
};
use studymind::config::{generate_default_config, ConfigLoad};
use studymind::handlers::{DashboardState, Destination, FormOutcome, PageController, Timings};
use studymind::{
    ApiClient, Config, FileStorage, LoggingConfig, LoginForm, RegistrationForm,
    SessionCookies, TerminalPage,
};

#[derive(Parser)]
#[command(name = "studymind")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the StudyMind learning platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides config and STUDYMIND_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/studymind/config.toml or ./studymind.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Keep the session for 30 days; without it the session ends with this command
        #[arg(long)]
        remember_me: bool,
    },

    /// Create an account
    Register {
        first_name: String,
        last_name: String,
        email: String,
        /// Password (prompted twice when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Accept the Terms of Service and Privacy Policy
        #[arg(long)]
        accept_terms: bool,
    },

    /// Sign out and forget the cached user
    Logout,

    /// Check whether the session is still valid
    Whoami,

    /// Show the signed-in user and their stats
    Dashboard,

    /// Show dashboard stats
    Stats,

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommand>,
    },

    /// Study materials
    Materials {
        #[command(subcommand)]
        action: MaterialsCommand,
    },

    /// Tasks
    Tasks {
        #[command(subcommand)]
        action: TasksCommand,
    },

    /// Study sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },

    /// Notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationsCommand,
    },

    /// Study progress
    Progress {
        #[command(subcommand)]
        action: ProgressCommand,
    },

    /// AI study tools
    Ai {
        #[command(subcommand)]
        action: AiCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        email_notifications: Option<bool>,
        /// Daily study goal in minutes
        #[arg(long)]
        daily_goal: Option<u32>,
        /// Weekly study goal in minutes
        #[arg(long)]
        weekly_goal: Option<u32>,
        /// Reminder time, HH:MM
        #[arg(long)]
        reminder_time: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MaterialsCommand {
    List {
        #[arg(long)]
        status: Option<String>,
        /// File type, e.g. pdf
        #[arg(long = "type")]
        file_type: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    Show {
        id: i64,
    },
    Upload {
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum TasksCommand {
    List {
        /// Only completed (true) or open (false) tasks
        #[arg(long)]
        completed: Option<bool>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    Show {
        id: i64,
    },
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// review, practice, exam...
        #[arg(long = "type")]
        task_type: Option<String>,
        /// Due date: today, tomorrow, +3d, 2025-06-01 or 2025-06-01T18:00
        #[arg(long)]
        due: Option<String>,
        /// Estimated minutes
        #[arg(long)]
        estimated: Option<u32>,
        /// low, medium, high
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        material: Option<i64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        task_type: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        estimated: Option<u32>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    Delete {
        id: i64,
    },
    /// Flip a task between open and completed
    Toggle {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    List {
        /// Look back this many days
        #[arg(long)]
        days: Option<u32>,
    },
    Start {
        #[arg(long)]
        material: Option<i64>,
        /// reading, review, quiz...
        #[arg(long)]
        activity: Option<String>,
    },
    End {
        id: i64,
        /// Minutes studied
        #[arg(long, default_value = "0")]
        duration: u32,
        #[arg(long, default_value = "0")]
        pages: u32,
    },
}

#[derive(Subcommand)]
pub enum NotificationsCommand {
    List {
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read {
        id: i64,
    },
    /// Mark every notification as read
    ReadAll,
}

#[derive(Subcommand)]
pub enum ProgressCommand {
    Daily {
        #[arg(long)]
        days: Option<u32>,
    },
    Weekly,
}

/// Text to work on: inline or read from a file
#[derive(Args)]
pub struct ContentArgs {
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,
    #[arg(long)]
    file: Option<PathBuf>,
}

impl ContentArgs {
    async fn resolve(self) -> anyhow::Result<String> {
        match (self.content, self.file) {
            (Some(content), _) => Ok(content),
            (None, Some(path)) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {:?}", path)),
            (None, None) => bail!("Provide --content or --file"),
        }
    }
}

#[derive(Subcommand)]
pub enum AiCommand {
    /// Upload a document and get a study compendium for it
    Process {
        path: PathBuf,
        #[arg(long)]
        goal: Option<String>,
    },
    Compendium {
        #[command(flatten)]
        input: ContentArgs,
        #[arg(long)]
        goal: Option<String>,
    },
    Ask {
        question: String,
        #[command(flatten)]
        input: ContentArgs,
    },
    Explain {
        concept: String,
        #[arg(long)]
        context: Option<String>,
    },
    Flashcards {
        #[command(flatten)]
        input: ContentArgs,
        #[arg(long)]
        count: Option<u32>,
    },
    Quiz {
        #[command(flatten)]
        input: ContentArgs,
        #[arg(long)]
        count: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ConfigLoad {
            config: Config::load_with_env(path)?,
            source: Some(path.clone()),
            skipped: Vec::new(),
        },
        None => Config::load_default(),
    };

    init_logging(&loaded.config.logging);
    loaded.report();

    let mut config = loaded.config;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    if let Commands::Config { output } = &cli.command {
        write_default_config(output.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let policy = CookiePolicy::for_command(&cli.command);
    let app = App::open(config, cli.format)?;
    let result = app.run(cli.command).await;
    match policy {
        CookiePolicy::Save => app.save_cookies(),
        CookiePolicy::Forget => app.forget_cookies(),
    }
    result
}

/// What happens to the saved session cookies after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CookiePolicy {
    Save,
    Forget,
}

impl CookiePolicy {
    /// A login without `--remember-me` is a browser-session login on the
    /// backend, so its cookies end with this invocation.
    fn for_command(command: &Commands) -> Self {
        match command {
            Commands::Logout => Self::Forget,
            Commands::Login { remember_me, .. } if !remember_me => Self::Forget,
            _ => Self::Save,
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studymind={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

/// Client, storage locations and output settings for one invocation
struct App {
    client: ApiClient,
    config: Config,
    format: OutputFormat,
}

impl App {
    fn open(config: Config, format: OutputFormat) -> anyhow::Result<Self> {
        let client = ApiClient::new(config.api.client_config())?;

        let cookies_path = config.storage.cookies_path();
        if let Some(url) = client.cookie_url() {
            match SessionCookies::load(&cookies_path) {
                Ok(Some(saved)) => saved.restore(client.cookies(), &url),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable session cookies"),
            }
        }

        Ok(Self {
            client,
            config,
            format,
        })
    }

    fn save_cookies(&self) {
        let Some(url) = self.client.cookie_url() else {
            return;
        };
        let saved = SessionCookies::capture(self.client.cookies(), &url);
        if let Err(e) = saved.save(&self.config.storage.cookies_path()) {
            tracing::warn!(error = %e, "failed to save session cookies");
        }
    }

    fn forget_cookies(&self) {
        let path = self.config.storage.cookies_path();
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, path = ?path, "failed to remove session cookies"),
        }
    }

    fn controller(&self) -> anyhow::Result<PageController<TerminalPage, FileStorage>> {
        let storage = FileStorage::open(self.config.storage.storage_path())?;
        Ok(PageController::with_timings(
            self.client.clone(),
            TerminalPage::stdout(),
            storage,
            Timings::from(&self.config.ui),
        ))
    }

    fn print(&self, data: &Value, table: impl FnOnce(&Value)) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Table => table(data),
        }
        Ok(())
    }

    async fn run(&self, command: Commands) -> anyhow::Result<ExitCode> {
        match command {
            Commands::Login {
                email,
                password,
                remember_me,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => prompt("Password: ")?,
                };
                let form = LoginForm {
                    email,
                    password,
                    remember_me,
                };
                let mut controller = self.controller()?;
                let outcome = controller.submit_login(&form).await;
                return self.after_sign_in(controller, outcome).await;
            }

            Commands::Register {
                first_name,
                last_name,
                email,
                password,
                accept_terms,
            } => {
                let (password, confirm_password) = match password {
                    Some(password) => (password.clone(), password),
                    None => (prompt("Password: ")?, prompt("Confirm password: ")?),
                };
                let form = RegistrationForm {
                    first_name,
                    last_name,
                    email,
                    password,
                    confirm_password,
                    accept_terms,
                };
                let mut controller = self.controller()?;
                let outcome = controller.submit_registration(&form).await;
                return self.after_sign_in(controller, outcome).await;
            }

            Commands::Logout => {
                let mut controller = self.controller()?;
                controller.logout().await;
                println!("Signed out.");
            }

            Commands::Whoami => {
                let mut controller = self.controller()?;
                match controller.refresh_session().await? {
                    Some(user) => {
                        let record = serde_json::to_value(&user)?;
                        self.print(&record, |_| {
                            println!("{} <{}>", user.display_name(), user.email);
                        })?;
                    }
                    None => {
                        println!("Not signed in.");
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }

            Commands::Dashboard => {
                let mut controller = self.controller()?;
                return Ok(self.show_dashboard(&mut controller).await);
            }

            Commands::Stats => {
                let stats = self.client.user().stats().await?;
                let data = serde_json::to_value(&stats)?;
                self.print(&data, |_| {
                    for card in stats.cards() {
                        println!("{:<24} {}", card.label, card.display_value());
                    }
                })?;
            }

            Commands::Settings { action } => match action.unwrap_or(SettingsCommand::Show) {
                SettingsCommand::Show => {
                    let settings = self.client.user().settings().await?;
                    self.print(&settings, print_record)?;
                }
                SettingsCommand::Set {
                    theme,
                    notifications,
                    email_notifications,
                    daily_goal,
                    weekly_goal,
                    reminder_time,
                } => {
                    let update = SettingsUpdate {
                        theme,
                        notifications_enabled: notifications,
                        email_notifications,
                        daily_goal,
                        weekly_goal,
                        reminder_time,
                    };
                    let settings = self.client.user().update_settings(&update).await?;
                    self.print(&settings, print_record)?;
                }
            },

            Commands::Materials { action } => self.materials(action).await?,
            Commands::Tasks { action } => self.tasks(action).await?,
            Commands::Sessions { action } => self.sessions(action).await?,
            Commands::Notifications { action } => self.notifications(action).await?,
            Commands::Progress { action } => self.progress(action).await?,
            Commands::Ai { action } => self.ai(action).await?,

            Commands::Config { output } => write_default_config(output.as_deref())?,
        }

        Ok(ExitCode::SUCCESS)
    }

    /// Follow the redirect a successful sign-in schedules.
    async fn after_sign_in(
        &self,
        mut controller: PageController<TerminalPage, FileStorage>,
        outcome: FormOutcome,
    ) -> anyhow::Result<ExitCode> {
        if !outcome.is_success() {
            return Ok(ExitCode::FAILURE);
        }
        if let Some((Destination::Dashboard, delay)) = controller.page().pending_navigation() {
            tokio::time::sleep(delay).await;
            return Ok(self.show_dashboard(&mut controller).await);
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn show_dashboard(
        &self,
        controller: &mut PageController<TerminalPage, FileStorage>,
    ) -> ExitCode {
        match controller.load_dashboard().await {
            DashboardState::SignedOut => {
                eprintln!("Not signed in. Run `studymind login <email>` first.");
                ExitCode::FAILURE
            }
            DashboardState::Loaded { stats: None, .. } => {
                eprintln!("Stats are unavailable right now.");
                ExitCode::SUCCESS
            }
            DashboardState::Loaded { .. } => ExitCode::SUCCESS,
        }
    }

    async fn materials(&self, action: MaterialsCommand) -> anyhow::Result<()> {
        let materials = self.client.materials();
        match action {
            MaterialsCommand::List {
                status,
                file_type,
                limit,
            } => {
                let filter = MaterialFilter {
                    status,
                    file_type,
                    limit,
                };
                let list = materials.get_all(&filter).await?;
                self.print(&list, |list| {
                    print_rows(
                        list,
                        &[
                            ("ID", "id", 6),
                            ("Name", "name", 30),
                            ("Type", "file_type", 6),
                            ("Status", "status", 12),
                            ("Subject", "subject", 0),
                        ],
                        "No materials yet.",
                    )
                })?;
            }
            MaterialsCommand::Show { id } => {
                let material = materials.get(id).await?;
                self.print(&material, print_record)?;
            }
            MaterialsCommand::Upload {
                path,
                name,
                subject,
                tags,
            } => {
                let mut upload = MaterialUpload::from_path(&path).await?;
                upload.name = name;
                upload.subject = subject;
                upload.tags = tags;
                let material = materials.upload(upload).await?;
                self.print(&material, |m| {
                    println!(
                        "Uploaded {} (id {})",
                        m["name"].as_str().unwrap_or("-"),
                        m["id"]
                    )
                })?;
            }
            MaterialsCommand::Update {
                id,
                name,
                subject,
                tags,
                status,
            } => {
                let update = MaterialUpdate {
                    name,
                    subject,
                    tags,
                    status,
                };
                let material = materials.update(id, &update).await?;
                self.print(&material, print_record)?;
            }
            MaterialsCommand::Delete { id } => {
                let result = materials.delete(id).await?;
                self.print(&result, print_message)?;
            }
        }
        Ok(())
    }

    async fn tasks(&self, action: TasksCommand) -> anyhow::Result<()> {
        let tasks = self.client.tasks();
        match action {
            TasksCommand::List { completed, limit } => {
                let list = tasks.get_all(&TaskFilter { completed, limit }).await?;
                self.print(&list, print_task_rows)?;
            }
            TasksCommand::Show { id } => {
                let task = tasks.get(id).await?;
                self.print(&task, print_record)?;
            }
            TasksCommand::Add {
                title,
                description,
                task_type,
                due,
                estimated,
                priority,
                material,
            } => {
                let task = NewTask {
                    title,
                    description,
                    task_type,
                    due_date: due.as_deref().map(parse_due_date).transpose()?,
                    estimated_time: estimated,
                    priority,
                    material_id: material,
                };
                let created = tasks.create(&task).await?;
                self.print(&created, |t| {
                    println!(
                        "Created task {}: {}",
                        t["id"],
                        t["title"].as_str().unwrap_or("-")
                    )
                })?;
            }
            TasksCommand::Update {
                id,
                title,
                description,
                task_type,
                priority,
                estimated,
                due,
                completed,
            } => {
                let update = TaskUpdate {
                    title,
                    description,
                    task_type,
                    priority,
                    estimated_time: estimated,
                    due_date: due.as_deref().map(parse_due_date).transpose()?,
                    completed,
                };
                let task = tasks.update(id, &update).await?;
                self.print(&task, print_record)?;
            }
            TasksCommand::Delete { id } => {
                let result = tasks.delete(id).await?;
                self.print(&result, print_message)?;
            }
            TasksCommand::Toggle { id } => {
                let task = tasks.toggle(id).await?;
                self.print(&task, |t| {
                    let state = if t["completed"].as_bool().unwrap_or(false) {
                        "completed"
                    } else {
                        "open"
                    };
                    println!("Task {} is now {}", t["id"], state)
                })?;
            }
        }
        Ok(())
    }

    async fn sessions(&self, action: SessionsCommand) -> anyhow::Result<()> {
        let sessions = self.client.sessions();
        match action {
            SessionsCommand::List { days } => {
                let list = sessions.get_all(&SessionFilter { days }).await?;
                self.print(&list, |list| {
                    print_rows(
                        list,
                        &[
                            ("ID", "id", 6),
                            ("Date", "date", 12),
                            ("Minutes", "duration", 8),
                            ("Pages", "pages_covered", 6),
                            ("Activity", "activity_type", 0),
                        ],
                        "No study sessions in this period.",
                    )
                })?;
            }
            SessionsCommand::Start { material, activity } => {
                let session = NewSession {
                    material_id: material,
                    activity_type: activity,
                };
                let started = sessions.start(&session).await?;
                self.print(&started, |s| println!("Started session {}", s["id"]))?;
            }
            SessionsCommand::End {
                id,
                duration,
                pages,
            } => {
                let end = SessionEnd {
                    duration,
                    pages_covered: pages,
                };
                let ended = sessions.end(id, &end).await?;
                self.print(&ended, print_record)?;
            }
        }
        Ok(())
    }

    async fn notifications(&self, action: NotificationsCommand) -> anyhow::Result<()> {
        let notifications = self.client.notifications();
        match action {
            NotificationsCommand::List { limit, unread } => {
                let filter = NotificationFilter {
                    limit,
                    unread: unread.then_some(true),
                };
                let list = notifications.get_all(&filter).await?;
                let data = serde_json::to_value(&list)?;
                self.print(&data, |data| {
                    println!("{} unread", list.unread_count);
                    println!();
                    print_rows(
                        &data["notifications"],
                        &[
                            ("ID", "id", 6),
                            ("Read", "read", 5),
                            ("Title", "title", 32),
                            ("Text", "text", 0),
                        ],
                        "No notifications.",
                    )
                })?;
            }
            NotificationsCommand::Read { id } => {
                let notification = notifications.mark_read(id).await?;
                self.print(&notification, print_record)?;
            }
            NotificationsCommand::ReadAll => {
                let result = notifications.mark_all_read().await?;
                self.print(&result, print_message)?;
            }
        }
        Ok(())
    }

    async fn progress(&self, action: ProgressCommand) -> anyhow::Result<()> {
        let progress = self.client.progress();
        match action {
            ProgressCommand::Daily { days } => {
                let daily = progress.daily(&ProgressFilter { days }).await?;
                self.print(&daily, print_progress_rows)?;
            }
            ProgressCommand::Weekly => {
                let weekly = progress.weekly().await?;
                self.print(&weekly, |w| {
                    println!("Study time:          {} min", w["total_study_time"]);
                    println!("Tasks completed:     {}", w["total_tasks_completed"]);
                    println!("Materials processed: {}", w["total_materials_processed"]);
                    println!("Pages read:          {}", w["total_pages_read"]);
                    println!("Days goal met:       {}", w["days_goal_met"]);
                    println!();
                    print_progress_rows(&w["daily_breakdown"]);
                })?;
            }
        }
        Ok(())
    }

    async fn ai(&self, action: AiCommand) -> anyhow::Result<()> {
        let ai = self.client.ai();
        let result = match action {
            AiCommand::Process { path, goal } => {
                let upload = ProcessUpload::from_path(&path, goal).await?;
                ai.process(upload).await?
            }
            AiCommand::Compendium { input, goal } => {
                let request = CompendiumRequest {
                    content: input.resolve().await?,
                    goal,
                };
                ai.compendium(&request).await?
            }
            AiCommand::Ask { question, input } => {
                let request = AskRequest {
                    content: input.resolve().await?,
                    question,
                };
                ai.ask(&request).await?
            }
            AiCommand::Explain { concept, context } => {
                ai.explain(&ExplainRequest { concept, context }).await?
            }
            AiCommand::Flashcards { input, count } => {
                let request = GenerateRequest {
                    content: input.resolve().await?,
                    count,
                };
                ai.flashcards(&request).await?
            }
            AiCommand::Quiz { input, count } => {
                let request = GenerateRequest {
                    content: input.resolve().await?,
                    count,
                };
                ai.quiz(&request).await?
            }
        };

        // AI results have no fixed shape, so both formats print the JSON.
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }
}

/// Read one line from stdin after printing `label`.
fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Due date in the form the backend accepts (`YYYY-MM-DDTHH:MM:SS`).
///
/// Supports: "today", "tomorrow", "+Nd", a date, or a date and time.
fn parse_due_date(s: &str) -> anyhow::Result<String> {
    let s = s.trim().to_lowercase();
    let today = Utc::now().date_naive();

    let date = match s.as_str() {
        "today" => today,
        "tomorrow" => today + ChronoDuration::days(1),
        _ => {
            if let Some(days) = s.strip_prefix('+').and_then(|d| d.strip_suffix('d')) {
                let days: i64 = days
                    .parse()
                    .with_context(|| format!("Invalid due date: {}", s))?;
                today + ChronoDuration::days(days)
            } else if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                date
            } else {
                let datetime = NaiveDateTime::parse_from_str(&s, "%Y-%m-%dt%H:%M:%S")
                    .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dt%H:%M"))
                    .with_context(|| {
                        format!(
                            "Invalid due date: {}. Use: today, tomorrow, +3d, 2025-06-01, 2025-06-01T18:00",
                            s
                        )
                    })?;
                return Ok(datetime.format("%Y-%m-%dT%H:%M:%S").to_string());
            }
        }
    };

    Ok(date.format("%Y-%m-%dT00:00:00").to_string())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Print a JSON array as a table. A width of 0 leaves the column unpadded.
fn print_rows(data: &Value, columns: &[(&str, &str, usize)], empty: &str) {
    let rows = match data.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("{}", empty);
            return;
        }
    };

    let line = |cells: Vec<String>| {
        let mut out = String::new();
        for ((_, _, width), text) in columns.iter().zip(cells) {
            out.push_str(&format!("{:<width$} ", text, width = *width));
        }
        println!("{}", out.trim_end());
    };

    line(columns.iter().map(|(header, _, _)| header.to_string()).collect());
    let total: usize = columns.iter().map(|(_, _, width)| width.max(&8) + 1).sum();
    println!("{}", "-".repeat(total));

    for row in rows {
        line(columns.iter().map(|(_, key, _)| cell(&row[*key])).collect());
    }
}

fn print_task_rows(data: &Value) {
    print_rows(
        data,
        &[
            ("ID", "id", 6),
            ("Done", "completed", 5),
            ("Title", "title", 32),
            ("Priority", "priority", 9),
            ("Due", "due_date", 0),
        ],
        "No tasks.",
    )
}

fn print_progress_rows(data: &Value) {
    print_rows(
        data,
        &[
            ("Date", "date", 12),
            ("Minutes", "study_time", 8),
            ("Tasks", "tasks_completed", 6),
            ("Pages", "pages_read", 6),
            ("Goal", "goal_met", 0),
        ],
        "No progress recorded.",
    )
}

/// Print a JSON object as `key: value` lines.
fn print_record(data: &Value) {
    match data.as_object() {
        Some(fields) if !fields.is_empty() => {
            let width = fields.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in fields {
                println!("{:<width$}  {}", key, cell(value), width = width);
            }
        }
        _ => println!("{}", cell(data)),
    }
}

fn print_message(data: &Value) {
    println!("{}", data["message"].as_str().unwrap_or("Done"));
}
