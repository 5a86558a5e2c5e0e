//! xbot: automated posting, following, liking and replying on x.com.

mod commands;
mod config;
mod console;
mod providers;
mod x_platform;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use brain_core::ProviderKind;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use headline_fetcher::{FetcherConfig, HeadlineFetcher};
use orchestrator::{SetupChoice, SignUpForm, Supervisor};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use xbot_database::Database;

use crate::config::BotConfig;
use crate::console::{ConsoleFrontend, SessionPlan};
use crate::providers::EnvBrainFactory;
use crate::x_platform::XSessionFactory;

#[derive(Debug, Parser)]
#[command(name = "xbot")]
#[command(about = "Automate an x.com account: headlines, posts, follows, likes and replies")]
struct Cli {
    /// SQLite database file (overrides XBOT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with a stored account and run the bot
    Run(RunArgs),
    /// Register an account and its first provider key
    Signup(SignupArgs),
    /// Manage personality presets
    #[command(subcommand)]
    Preset(PresetCommand),
    /// Manage provider keys of an account
    #[command(subcommand)]
    ApiKey(ApiKeyCommand),
    /// List stored accounts
    Accounts,
    /// Show recent follows or likes
    History {
        #[command(subcommand)]
        kind: HistoryKind,

        /// Maximum number of rows
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    password: String,

    /// Personality preset to run with (defaults apply when omitted)
    #[arg(long)]
    preset: Option<String>,

    /// Named provider key to use instead of the account default
    #[arg(long)]
    api_key_name: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Number of cycles (overrides the preset)
    #[arg(long)]
    loops: Option<u32>,

    /// Minutes between cycles (overrides the preset)
    #[arg(long)]
    interval: Option<u64>,
}

#[derive(Debug, Args)]
struct SignupArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    password: String,

    /// Email or phone for the identity challenge
    #[arg(long)]
    email: String,

    /// Generation provider: openai or gemini
    #[arg(long, default_value = "openai")]
    provider: ProviderKind,

    #[arg(long)]
    api_key: String,
}

#[derive(Debug, Subcommand)]
enum PresetCommand {
    /// Store a personality JSON file under a name
    Save {
        name: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// List stored presets
    List,
    /// Print a preset as JSON
    Show { name: String },
    /// Delete a preset
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
enum ApiKeyCommand {
    /// Add a named key to an account
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        provider: ProviderKind,
        #[arg(long)]
        key: String,
    },
    /// List the keys of an account
    List {
        #[arg(long)]
        username: String,
    },
    /// Delete a named key
    Delete {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum HistoryKind {
    /// Accounts the bot followed
    Follows,
    /// Posts the bot liked
    Likes,
}

/// Log to stdout and to a timestamped file under the log directory.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(config: &BotConfig) -> Result<WorkerGuard, std::io::Error> {
    fs::create_dir_all(&config.log_dir)?;
    let file_name = format!("bot_log_{}.txt", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let appender = tracing_appender::rolling::never(&config.log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = BotConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    let _guard = init_logging(&config)?;

    let db = Database::open(&config.db_path).await?;
    db.migrate().await?;
    info!("Database ready at {}", config.db_path.display());

    match cli.command {
        Command::Run(args) => run(db.clone(), config, args).await?,
        Command::Signup(args) => signup(db.clone(), config, args).await?,
        Command::Preset(command) => match command {
            PresetCommand::Save { name, file } => commands::save_preset(&db, &name, &file).await?,
            PresetCommand::List => commands::list_presets(&db).await?,
            PresetCommand::Show { name } => commands::show_preset(&db, &name).await?,
            PresetCommand::Delete { name } => commands::delete_preset(&db, &name).await?,
        },
        Command::ApiKey(command) => match command {
            ApiKeyCommand::Add {
                username,
                name,
                provider,
                key,
            } => commands::add_api_key(&db, &username, &name, provider, &key).await?,
            ApiKeyCommand::List { username } => commands::list_api_keys(&db, &username).await?,
            ApiKeyCommand::Delete { username, name } => {
                commands::delete_api_key(&db, &username, &name).await?
            }
        },
        Command::Accounts => commands::list_accounts(&db).await?,
        Command::History { kind, limit } => {
            let lines = match kind {
                HistoryKind::Follows => commands::follow_history(&db, limit).await?,
                HistoryKind::Likes => commands::like_history(&db, limit).await?,
            };
            if lines.is_empty() {
                println!("Nothing recorded yet");
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }

    db.close().await;
    Ok(())
}

async fn run(db: Database, config: BotConfig, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let personality = commands::load_personality(&db, args.preset.as_deref()).await?;
    let api_key = match args.api_key_name.as_deref() {
        Some(name) => Some(commands::load_api_key(&db, &args.username, name).await?),
        None => None,
    };

    let plan = SessionPlan {
        personality,
        api_key,
        headless: args.headless.then_some(true),
        loop_count: args.loops,
        schedule_interval: args.interval,
    };
    let frontend = ConsoleFrontend::new(
        SetupChoice::SignIn {
            username: args.username,
            password: args.password,
        },
        Some(plan),
    );

    supervise(db, config, frontend).await
}

async fn signup(db: Database, config: BotConfig, args: SignupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let username = args.username.clone();
    let frontend = ConsoleFrontend::new(
        SetupChoice::SignUp(SignUpForm {
            username: args.username,
            password: args.password,
            email: args.email,
            provider: args.provider,
            api_key: args.api_key,
        }),
        None,
    );

    supervise(db.clone(), config, frontend).await?;

    if xbot_database::credential::get_credential(db.pool(), username.trim())
        .await
        .is_ok()
    {
        println!("Account '{}' is ready. Start it with `xbot run`.", username.trim());
    }
    Ok(())
}

async fn supervise(
    db: Database,
    config: BotConfig,
    frontend: ConsoleFrontend,
) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HeadlineFetcher::new(FetcherConfig::default())?;
    let supervisor = Supervisor::new(
        db,
        frontend,
        XSessionFactory::new(config),
        Arc::new(EnvBrainFactory),
        Arc::new(fetcher),
    );

    supervisor.run().await?;
    Ok(())
}
