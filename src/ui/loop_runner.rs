//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events, and periodic ticks.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::{spawn_fetch, spawn_location_search};
use super::input::handle_input;
use super::render::render;

/// Tick period. Bounds how late a settled debounce can fire.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = 10;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex:
/// - **Signals**: SIGTERM/SIGINT shut down gracefully
/// - **Terminal input**: key presses from crossterm's async event stream
/// - **Background tasks**: page fetches and location searches via `AppEvent`
/// - **Periodic tick**: status expiry, settled debounces, spinner animation
///
/// The initial page fetch is issued before the first frame.
///
/// Installs a panic hook that restores terminal state before unwinding.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    let ticket = app.view.on_mount();
    spawn_fetch(app, ticket, &event_tx);

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending results before waiting on input so fetch results
        // are not starved by fast typing.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {e}")),
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app, &event_tx);
            }
        }
    }

    app.teardown();
    restore_terminal(terminal)?;
    Ok(())
}

/// Fire settled debounces and animate the spinner.
pub(super) fn handle_tick(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.view.is_loading() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }

    if let Some(ticket) = app.view.poll_debounce() {
        app.needs_redraw = true;
        spawn_fetch(app, ticket, event_tx);
    }

    let had_results = !app.locations.results().is_empty();
    if let Some(ticket) = app.locations.poll_debounce() {
        app.needs_redraw = true;
        spawn_location_search(app, ticket, event_tx);
    } else if had_results && app.locations.results().is_empty() {
        // blank input cleared the suggestions
        app.needs_redraw = true;
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use crate::config::Config;

    fn test_app() -> App {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".into(),
            search_debounce_ms: 200,
            ..Config::default()
        };
        App::new(&config, Resource::Posts, None).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_fires_settled_search() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        app.view.on_mount();
        app.view.on_search_input("garden");

        handle_tick(&mut app, &tx);
        assert_eq!(app.view.query().search_text(), "");

        tokio::time::advance(Duration::from_millis(200)).await;
        handle_tick(&mut app, &tx);
        assert_eq!(app.view.query().search_text(), "garden");
        assert!(app.fetch_handle.is_some());
        app.teardown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_animates_spinner_only_while_loading() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        handle_tick(&mut app, &tx);
        assert_eq!(app.spinner_frame, 0);

        app.view.on_mount();
        handle_tick(&mut app, &tx);
        assert_eq!(app.spinner_frame, 1);
        app.teardown();
    }
}
