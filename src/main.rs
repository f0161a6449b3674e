use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod app;
mod campus;
mod config;
mod handler;
mod history;
mod responses;
mod theme;
mod tui;
mod ui;

use app::App;
use config::Config;
use history::ConversationStore;
use tui::EventHandler;

/// Logs go to a file under the data directory; the alternate screen owns
/// the terminal, so nothing may print to stdout or stderr while running.
fn init_logging() -> Result<()> {
    let dir = dirs::data_dir()
        .context("could not determine data directory")?
        .join("adtu-campus-chat");
    fs::create_dir_all(&dir)?;
    let log_file = File::create(dir.join("campus.log"))
        .with_context(|| format!("could not create log file in {}", dir.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "campus=info".into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config_path = Config::default_path()?;
    let config = Config::load(&config_path).unwrap_or_else(|_| Config::new());
    let store = ConversationStore::load(ConversationStore::default_path()?);
    let mut app = App::new(config, config_path, store)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
        app.poll_background().await;
    }
    Ok(())
}
