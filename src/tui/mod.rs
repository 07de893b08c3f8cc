//! Terminal UI thin client.

mod app;
mod input;
mod ui;

pub use app::{App, Flow};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::client::GameClient;
use crate::view::Controller;

/// Log file used while the terminal is in raw mode.
pub const LOG_FILE: &str = "tictactoe_tui.log";

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Runs the TUI client against a game server until the user quits.
pub async fn run_tui(server_url: String) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %server_url, "Starting Tic Tac Toe TUI");

    let mut terminal = setup_terminal()?;

    let api = Arc::new(GameClient::new(&server_url));
    let mut app = App::new(Controller::new(api));
    app.start();

    let res = run_app(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;

    if let Err(err) = &res {
        error!(error = ?err, "UI loop error");
    }
    res
}

fn setup_terminal() -> Result<CrosstermTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draw, apply finished requests, read input; repeat.
#[instrument(skip_all)]
async fn run_app(terminal: &mut CrosstermTerminal, app: &mut App<GameClient>) -> Result<()> {
    loop {
        app.tick();

        let mut cell_areas = None;
        terminal.draw(|f| cell_areas = Some(ui::draw(f, app.view(), app.cursor())))?;
        if let Some(areas) = cell_areas {
            app.set_cell_areas(areas);
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code) == Flow::Quit {
                        info!("User quit");
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        } else {
            // Let spawned request tasks make progress between polls.
            tokio::task::yield_now().await;
        }
    }
}
