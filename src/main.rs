mod app;
mod editor;
mod event;
mod ui;

/// Version injected at compile time via CATADMIN_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CATADMIN_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::Result;
use app::App;
use catadmin::api::format_api_error;
use catadmin::config::Config;
use catadmin::resource::get_resource;
use catadmin::{ResourceClient, ResourceManager};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use ui::splash::{render as render_splash, SplashState};

const DEFAULT_RESOURCE: &str = "bootcamps";

/// Terminal admin console for the catalog backend
#[derive(Parser, Debug)]
#[command(name = "catadmin", version, about, long_about = None)]
struct Args {
    /// Backend base URL (e.g. https://api.example.com/api)
    #[arg(short, long, env = "CATADMIN_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(short, long, env = "CATADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Resource to open first (bootcamps, categories, services)
    #[arg(short, long)]
    resource: Option<String>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Run in read-only mode (block all write operations)
    #[arg(long)]
    readonly: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("catadmin started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("catadmin.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".catadmin").join("catadmin.log");
    }
    PathBuf::from("catadmin.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initialize and run
    let result = initialize_with_splash(&mut terminal, &args).await;

    match result {
        Ok(Some(mut app)) => {
            let run_result = run_app(&mut terminal, &mut app).await;
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        }
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        }
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        }
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    args: &Args,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new();

    // Render initial splash
    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    // Step 1: Load configuration
    let config = Config::load();
    let api_config = config.api_config(args.base_url.as_deref(), args.token.as_deref())?;
    let page_size = config.effective_page_size(args.page_size);

    let resource_key = args
        .resource
        .clone()
        .or_else(|| config.last_resource.clone())
        .unwrap_or_else(|| DEFAULT_RESOURCE.to_string());
    let schema = match get_resource(&resource_key) {
        Some(schema) => schema,
        None if args.resource.is_some() => {
            return Err(anyhow::anyhow!(
                "Unknown resource '{}'. Expected bootcamps, categories or services",
                resource_key
            ));
        }
        None => {
            tracing::warn!("Ignoring unknown last resource '{}'", resource_key);
            get_resource(DEFAULT_RESOURCE)
                .ok_or_else(|| anyhow::anyhow!("Missing {} schema", DEFAULT_RESOURCE))?
        }
    };

    tracing::info!("Using backend: {}", api_config.base_url);

    splash.begin(api_config.base_url.as_str());
    terminal.draw(|f| render_splash(f, &splash))?;
    splash.finish(true);

    if check_abort()? {
        return Ok(None);
    }

    // Step 2: Initialize API client
    splash.begin(if api_config.token.is_some() { "bearer token" } else { "no token" });
    terminal.draw(|f| render_splash(f, &splash))?;

    let client = ResourceClient::new(api_config)?;
    splash.finish(true);

    if check_abort()? {
        return Ok(None);
    }

    // Step 3: Fetch initial list
    splash.begin(&schema.key);
    terminal.draw(|f| render_splash(f, &splash))?;

    let mut manager = ResourceManager::new(schema, client.clone()).with_page_size(page_size);
    let loaded = manager.refresh().await;
    if let Err(e) = &loaded {
        tracing::warn!("Initial load failed: {}", format_api_error(e));
    }
    splash.finish(loaded.is_ok());

    if check_abort()? {
        return Ok(None);
    }

    // Step 4: Fetch relation options (category names for the filter and forms)
    splash.begin(&schema.relation_sources().join(", "));
    terminal.draw(|f| render_splash(f, &splash))?;

    let related = manager.load_relation_options().await;
    if let Err(e) = &related {
        tracing::warn!("Relation options incomplete: {}", format_api_error(e));
    }
    splash.finish(related.is_ok());
    terminal.draw(|f| render_splash(f, &splash))?;

    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(Some(App::from_initialized(
        client,
        manager,
        config,
        page_size,
        args.readonly,
    )))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app).await? {
            return Ok(());
        }
    }
}
