//! Command-line front end for the roadmap core.
//!
//! # Responsibility
//! - Compose config, logging, storage, transport and session from flags.
//! - Run one command per invocation and print the resulting day view.
//!
//! # Invariants
//! - Without `database_path` the store lives under the platform data
//!   directory, so progress and position survive between runs.
//! - Sessions always resume the stored last position, so navigation
//!   commands chain across invocations.
//! - An installed cache generation is activated at startup.

use clap::{Parser, Subcommand};
use log::{info, warn};
use roadmap_core::assistant::AssistantApi;
use roadmap_core::cache::{OfflineCache, SqliteCacheStorage};
use roadmap_core::db::{open_store, StoreLocation};
use roadmap_core::notes::NoteStore;
use roadmap_core::{
    init_logging, load_curriculum, ApiClient, ClearScope, CoreConfig, DayView, HttpTransport,
    RoadmapSession, SessionServices, SqliteStateRepository, StepDirection,
};
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn Error>>;
type StateRepo = Rc<SqliteStateRepository>;

#[derive(Debug, Parser)]
#[command(name = "roadmap", version, about = "Curriculum roadmap tracker")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the active day.
    Show,
    /// Step to the next day.
    Next,
    /// Step to the previous day.
    Prev,
    /// Jump to a month and 1-based day number.
    Goto { month: String, day: usize },
    /// Mark the active day complete and step forward.
    Complete,
    /// Clear progress for day, week, month or year.
    Clear { scope: ClearScope },
    /// Search titles, topics and descriptions.
    Search { query: Vec<String> },
    /// Read or write the active day's note.
    Note {
        #[command(subcommand)]
        action: NoteCommand,
    },
    /// Ask a question about the active day's topic.
    Ask { question: Vec<String> },
    /// Show, cycle (`next`) or select (by index) the theme.
    Theme { choice: Option<String> },
    /// Write the progress ledger as JSON into a directory.
    Export { dir: PathBuf },
    /// Manage the offline resource cache.
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
enum NoteCommand {
    /// Save text as the active day's note.
    Save { text: Vec<String> },
    /// Print the latest stored note for the active day.
    Show,
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Fetch the manifest into the configured generation.
    Install,
    /// Purge every other generation.
    Activate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = match cli.config.as_ref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let location = StoreLocation::resolve(config.database_path.clone(), dirs::data_dir());
    if location == StoreLocation::Memory {
        warn!("event=store_resolve module=cli status=skipped reason=no_data_dir");
    }
    let repo: StateRepo = Rc::new(SqliteStateRepository::try_new(open_store(&location)?)?);
    let cache = Arc::new(OfflineCache::new(
        HttpTransport::new(config.http_timeout())?,
        SqliteCacheStorage::try_new(open_store(&location)?)?,
        config.cache_policy(),
    )?);

    if let Command::Cache { action } = &cli.command {
        return match action {
            CacheCommand::Install => {
                let report = cache.install().await?;
                println!("Installed {} ({} entries)", report.generation, report.stored);
                if let Some(activated) = cache.activate_if_installed()? {
                    println!("Activated (purged {})", activated.purged.len());
                }
                Ok(())
            }
            CacheCommand::Activate => {
                let report = cache.activate()?;
                println!(
                    "Activated {} (purged {})",
                    report.generation,
                    report.purged.len()
                );
                Ok(())
            }
        };
    }

    if let Some(report) = cache.activate_if_installed()? {
        info!(
            "event=cache_activate module=cli status=ok generation={} purged={}",
            report.generation,
            report.purged.len()
        );
    }

    let api = Arc::new(ApiClient::new(Arc::clone(&cache), config.api_base.clone()));
    let source = load_curriculum(api.as_ref(), &repo).await;
    let notes: Arc<dyn NoteStore> = api.clone();
    let assistant: Arc<dyn AssistantApi> = api;
    let mut settings = config.session_settings();
    settings.resume_last_position = true;

    let today = chrono::Local::now().date_naive();
    let mut session = RoadmapSession::open(
        source,
        SessionServices {
            repo,
            notes,
            assistant,
        },
        settings,
        config.note_settings(),
        today,
    )
    .await?;

    dispatch(&mut session, cli.command, today).await
}

async fn dispatch(
    session: &mut RoadmapSession<StateRepo>,
    command: Command,
    today: chrono::NaiveDate,
) -> CliResult<()> {
    match command {
        Command::Show => {}
        Command::Next => {
            session.step(StepDirection::Forward).await;
        }
        Command::Prev => {
            session.step(StepDirection::Backward).await;
        }
        Command::Goto { month, day } => {
            if !session.goto(&month, day.saturating_sub(1)).await.moved() {
                println!("Unknown month: {month}");
            }
        }
        Command::Complete => {
            session.complete().await?;
        }
        Command::Clear { scope } => {
            let removed = session.clear_progress(scope)?;
            println!("Cleared {removed} entries ({})", scope.as_str());
        }
        Command::Search { query } => {
            let hits = session.search(&query.join(" "));
            if hits.is_empty() {
                println!("No matches.");
            }
            for hit in hits {
                println!("{} {}: {} [{}]", hit.month, hit.day, hit.title, hit.topic);
            }
            return Ok(());
        }
        Command::Note { action } => match action {
            NoteCommand::Save { text } => {
                let status = session.save_note(&text.join(" ")).await;
                println!("{}", status.label());
                return Ok(());
            }
            NoteCommand::Show => {
                let notes = session.notes();
                println!("[{}] {}", notes.status().label(), notes.draft());
                return Ok(());
            }
        },
        Command::Ask { question } => {
            match session.ask(&question.join(" ")).await {
                Some(answer) => println!("{answer}"),
                None => println!("Nothing to ask."),
            }
            return Ok(());
        }
        Command::Theme { choice } => {
            let theme = match choice.as_deref() {
                None => session.theme(),
                Some("next") => session.cycle_theme()?,
                Some(index) => session.select_theme(index.parse()?)?,
            };
            println!("{} ({})", theme.id, theme.preview_color);
            return Ok(());
        }
        Command::Export { dir } => {
            let path = session.export(today)?.write_to(&dir)?;
            println!("Exported {}", path.display());
            return Ok(());
        }
        Command::Cache { .. } => return Ok(()),
    }

    print_view(&session.view());
    info!("event=cli_command module=cli status=ok");
    Ok(())
}

fn print_view(view: &DayView) {
    if let Some(notice) = view.notice {
        println!("! {notice}");
    }
    match view.position.as_ref() {
        Some(position) => println!(
            "{} day {}: {} [{}]",
            position.month,
            position.day_number(),
            view.day.title,
            view.day.topic
        ),
        None => println!("{} [{}]", view.day.title, view.day.topic),
    }
    println!("{}", view.day.description);
    println!("Quote: {}", view.quote);
    println!("Tip: {}", view.tip);
    println!("Completion: {}%", view.completion);
    let progress = &view.progress;
    println!(
        "Progress: daily {}% | weekly {}% | monthly {}% | yearly {}%",
        progress.daily, progress.weekly, progress.monthly, progress.yearly
    );
    println!("Note [{}]: {}", view.note_status.label(), view.note_draft);
}
