mod api;
mod app;
mod config;
mod controller;
mod dispatch;
mod filters;
mod format;
mod logging;
mod ui;

use api::{CatalogApi, HttpCatalog};
use app::{App, InputMode, View};
use clap::Parser;
use controller::SortOrder;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dispatch::{Dispatcher, FetchEvent};
use filters::EditorField;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

/// TUI browser for a paginated, filterable movie catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the catalog API (e.g. http://localhost:8000/api)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to a config.toml (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of the platform cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?.with_overrides(cli.api_url, cli.log_level);
    let _log_guard = logging::init(cli.log_file.as_deref(), &config.log_level)?;
    info!(api = %config.api_base_url, "movie-browser v{} starting", env!("CARGO_PKG_VERSION"));

    let api = Arc::new(HttpCatalog::new(config.api_base_url.clone(), config.request_timeout())?);
    let (dispatcher, mut events) = Dispatcher::new(api);

    let mut app = App::new(dispatcher);
    app.init();

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app, &mut events).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = &result {
        error!("terminal loop failed: {e}");
    }
    info!("exiting");
    result
}

async fn run_app<A: CatalogApi>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App<A>,
    events: &mut UnboundedReceiver<FetchEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = terminal.size()?;
    app.update_layout(size.width);

    loop {
        while let Ok(fetched) = events.try_recv() {
            app.handle_fetch_event(fetched);
        }

        terminal.draw(|frame| ui::render(app, frame))?;
        app.tick = app.tick.wrapping_add(1);

        if app.should_quit {
            return Ok(());
        }

        // Short timeout keeps spinners moving and fetch results flowing in
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(width, _) => {
                    app.update_layout(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key<A: CatalogApi>(app: &mut App<A>, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_editor_key(app, key);
        return;
    }

    if key.code == KeyCode::Char('?') {
        app.show_help = true;
        return;
    }

    match app.view {
        View::Grid => handle_grid_key(app, key),
        View::Detail => handle_detail_key(app, key),
    }
}

fn handle_grid_key<A: CatalogApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('f') | KeyCode::Char('/') => app.open_editor(),
        KeyCode::Char('x') => app.clear_filters(),
        KeyCode::Char('s') => app.cycle_sort_field(),
        KeyCode::Char('o') => app.toggle_order(),
        KeyCode::Char('a') => app.set_order(SortOrder::Asc),
        KeyCode::Char('d') => app.set_order(SortOrder::Desc),
        KeyCode::Right | KeyCode::Char('l') => app.select_right(),
        KeyCode::Left | KeyCode::Char('h') => app.select_left(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('p') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Char('g') | KeyCode::Home => app.first_page(),
        KeyCode::Char('G') | KeyCode::End => app.last_page(),
        KeyCode::Enter => app.open_detail(),
        _ => {}
    }
}

fn handle_editor_key<A: CatalogApi>(app: &mut App<A>, key: KeyEvent) {
    let on_genres = app.editor.focus == EditorField::Genres;
    match key.code {
        KeyCode::Esc => app.close_editor(),
        KeyCode::Enter => app.submit_editor(),
        KeyCode::Tab | KeyCode::Down => app.editor.focus = app.editor.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.editor.focus = app.editor.focus.prev(),
        KeyCode::Right if on_genres => app.editor.genre_cursor_next(&app.genre_options),
        KeyCode::Left if on_genres => app.editor.genre_cursor_prev(&app.genre_options),
        KeyCode::Char(' ') if on_genres => app.editor.toggle_genre_at_cursor(&app.genre_options),
        KeyCode::Backspace => app.editor.backspace(),
        KeyCode::Char(c) => app.editor.input_char(c),
        _ => {}
    }
}

fn handle_detail_key<A: CatalogApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.view = View::Grid;
        }
        KeyCode::Char('o') => {
            if let Some(link) = app.selected_movie().map(|m| m.imdb_link()) {
                let _ = Command::new("xdg-open")
                    .arg(&link)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn();
                app.status_msg = format!("Opening: {}", link);
            }
        }
        KeyCode::Char('y') => {
            if let Some(link) = app.selected_movie().map(|m| m.imdb_link()) {
                app.status_msg = if copy_to_clipboard(&link) {
                    format!("Copied: {}", link)
                } else {
                    format!("Link: {} (clipboard not available)", link)
                };
            }
        }
        _ => {}
    }
}

/// Pipe `text` into the first available clipboard tool.
fn copy_to_clipboard(text: &str) -> bool {
    let tools: [(&str, &[&str]); 2] = [("xclip", &["-selection", "clipboard"]), ("wl-copy", &[])];
    for (program, args) in tools {
        if let Ok(mut child) = Command::new(program).args(args).stdin(Stdio::piped()).spawn() {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
            return true;
        }
    }
    false
}
