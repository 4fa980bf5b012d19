//! PokeBase - a terminal client for a self-hosted Pokédex
//!
//! Search with live suggestions, browse Pokémon pages, and step through the
//! dex from the terminal.

mod api;
mod app;
mod cli;
mod clipboard;
mod config;
mod error;
mod events;
mod logging;
mod suggest;
mod tasks;
mod ui;

use std::io::{self, Stdout};
use std::panic;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::api::PokedexClient;
use crate::app::{App, AppCommand};
use crate::cli::Cli;
use crate::config::{PreferenceStore, Settings};
use crate::error::AppError;
use crate::events::EventHandler;
use crate::suggest::NavigationTarget;
use crate::tasks::{create_task_channel, ApiMessage, TaskSpawner};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let settings = cli.resolve_settings().context("Failed to load settings")?;

    if let Err(e) = logging::init(cli.log_filter(&settings)) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    debug!(?settings, "Effective settings");

    if cli.write_config {
        let path = cli.settings_path()?;
        settings.save_to(&path)?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }

    let store = PreferenceStore::open_default()?;
    debug!(path = %store.path().display(), "Preferences file");
    let preferences = store.load();
    let client = PokedexClient::new(&settings)?;
    info!(base_url = %client.base_url(), "Using PokeBase server");

    let mut app = App::new(client.base_url(), preferences);
    if let Some(target) = cli.pokemon.as_deref().and_then(NavigationTarget::from_search) {
        app.navigate(target);
    }

    let mut terminal = setup_terminal()?;
    install_panic_hook();

    let result = run(&mut terminal, &mut app, &settings, &client, &store);

    restore_terminal(&mut terminal)?;
    info!("PokeBase shutting down");

    if let Err(e) = &result {
        error!(error = %e, "Exited with error");
        if let Some(dir) = logging::log_directory() {
            eprintln!("Logs: {}", dir.display());
        }
    }
    result
}

/// The main loop: draw, wait for one event, apply finished tasks, then run
/// the side effects the update queued.
fn run(
    terminal: &mut Tui,
    app: &mut App,
    settings: &Settings,
    client: &PokedexClient,
    store: &PreferenceStore,
) -> anyhow::Result<()> {
    let (mut rx, spawner) = create_task_channel();
    let events = EventHandler::with_tick_rate(settings.tick_rate_ms);

    loop {
        dispatch(app, &spawner, client, store);

        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);
        drain_messages(app, &mut rx);

        if app.should_quit() {
            info!("Leaving main loop");
            return Ok(());
        }
    }
}

fn drain_messages(app: &mut App, rx: &mut mpsc::UnboundedReceiver<ApiMessage>) {
    while let Ok(message) = rx.try_recv() {
        app.handle_api_message(message);
    }
}

fn dispatch(app: &mut App, spawner: &TaskSpawner, client: &PokedexClient, store: &PreferenceStore) {
    for command in app.take_commands() {
        match command {
            AppCommand::FetchSuggestions(ticket) => spawner.spawn_suggest(client, ticket),
            AppCommand::LoadPage(target) => {
                spawner.spawn_fetch_page(client, target.identifier().to_string())
            }
            AppCommand::PickRandom => spawner.spawn_random(client),
            AppCommand::CopyToClipboard(url) => match clipboard::copy(&url) {
                Ok(backend) => {
                    debug!(?backend, "Link copied");
                    app.notify_success("Link copied");
                }
                Err(e) => app.handle_error(&AppError::from(e)),
            },
            AppCommand::OpenInBrowser(url) => match open::that_detached(&url) {
                Ok(()) => app.notify_info(format!("Opened {}", url)),
                Err(e) => app.handle_error(&AppError::from(e)),
            },
            AppCommand::SavePreferences(preferences) => {
                if let Err(e) = store.save(&preferences) {
                    app.handle_error(&AppError::from(e));
                }
            }
        }
    }
}

fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Restore the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));
}
