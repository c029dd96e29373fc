//! nregadash - a terminal dashboard for MGNREGA district performance.
//!
//! Shows households employed, person-days, expenditure and wages for a
//! district, pulled from data.gov.in when reachable and from the local
//! cache or bundled dataset when not.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nregadash_core::credentials::CredentialStore;
use nregadash_core::report::write_report;
use nregadash_core::suggest::suggest_sub_regions;
use nregadash_core::Config;

use app::{open_service, App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the log directory
const LOG_FILE: &str = "nregadash.log";

/// Initialize file logging. The terminal belongs to the UI, so log lines go
/// to `<cache dir>/logs`. The returned guard flushes on drop.
fn init_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config
        .cache_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| PathBuf::from("./logs"));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

fn load_config() -> Config {
    match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config ({}), using defaults", e);
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = load_config();
    let _guard = init_tracing(&config)?;

    // Check for CLI commands
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("--fetch") => return fetch_command(&config, &args[1..]).await,
        Some("--report") => return report_command(&config, &args[1..]).await,
        Some("--suggest") => return suggest_command(&config, &args[1..]),
        Some("--set-api-key") => return set_api_key_command(&args[1..]),
        Some("--clear-api-key") => return clear_api_key_command(),
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some(other) => {
            print_usage();
            bail!("Unknown argument: {}", other);
        }
        None => {}
    }

    info!("nregadash starting");

    // Create app before touching the terminal so setup errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = app.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("nregadash shutting down");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  nregadash                                   Launch the dashboard");
    eprintln!("  nregadash --fetch REGION SUB_REGION         Print district data as JSON");
    eprintln!("  nregadash --report REGION SUB_REGION [DIR]  Write a Markdown report");
    eprintln!("  nregadash --suggest REGION PLACE            Suggest districts for a place name");
    eprintln!("  nregadash --set-api-key KEY                 Store the data.gov.in API key");
    eprintln!("  nregadash --clear-api-key                   Remove the stored API key");
}

/// Run the retrieval policy once and print the result as JSON
async fn fetch_command(config: &Config, args: &[String]) -> Result<()> {
    let [region, sub_region, ..] = args else {
        print_usage();
        bail!("--fetch needs REGION and SUB_REGION");
    };

    let service = open_service(config)?;
    let data = service.fetch(region, sub_region).await;
    eprintln!(
        "{} record(s), {}",
        data.records.len(),
        data.provenance.as_str()
    );

    let json = serde_json::to_string_pretty(&data)?;
    println!("{}", json);
    Ok(())
}

/// Fetch a district and write its report
async fn report_command(config: &Config, args: &[String]) -> Result<()> {
    let [region, sub_region, rest @ ..] = args else {
        print_usage();
        bail!("--report needs REGION and SUB_REGION");
    };
    let out_dir = rest
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("reports"));

    let service = open_service(config)?;
    let data = service.fetch(region, sub_region).await;

    match write_report(&out_dir, region, sub_region, &data.records, config.language)? {
        Some(path) => println!("{}", path.display()),
        None => bail!("No data available for {}, {}", sub_region, region),
    }
    Ok(())
}

/// Print the districts of REGION that match a city, town or landmark
fn suggest_command(config: &Config, args: &[String]) -> Result<()> {
    let [region, place @ ..] = args else {
        print_usage();
        bail!("--suggest needs REGION and PLACE");
    };
    let place = place.join(" ");
    if place.trim().is_empty() {
        print_usage();
        bail!("--suggest needs REGION and PLACE");
    }

    let service = open_service(config)?;
    let suggestions = suggest_sub_regions(&place, &service.sub_regions(region));
    if suggestions.is_empty() {
        bail!("No matching district found for {} in {}", place, region);
    }
    for district in suggestions {
        println!("{}", district);
    }
    Ok(())
}

fn set_api_key_command(args: &[String]) -> Result<()> {
    let Some(key) = args.first().filter(|k| !k.trim().is_empty()) else {
        print_usage();
        bail!("--set-api-key needs KEY");
    };
    CredentialStore::store_api_key(key.trim())?;
    eprintln!("API key stored in the system keychain");
    Ok(())
}

fn clear_api_key_command() -> Result<()> {
    CredentialStore::delete_api_key()?;
    eprintln!("API key removed from the system keychain");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
