use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::FeedSource;
use crate::app::{handle_key, Command, Dashboard};
use crate::event::{execute_command, AppMessage};
use crate::ui;

/// Run the main dashboard event loop
///
/// One cycle fires immediately, then one per `refresh_interval` whether or not
/// the previous cycle has settled.
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    dashboard: &mut Dashboard,
    source: Arc<dyn FeedSource>,
    refresh_interval: Duration,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    dashboard.render();
    execute_command(Command::Refresh, dashboard, &source, &tx);
    let mut next_tick = Instant::now() + refresh_interval;

    while dashboard.running {
        // Apply everything that settled since the last frame
        while let Ok(message) = rx.try_recv() {
            dashboard.handle_message(message);
        }

        if Instant::now() >= next_tick {
            execute_command(Command::Refresh, dashboard, &source, &tx);
            next_tick = Instant::now() + refresh_interval;
        }

        dashboard.update();

        if let Err(e) = terminal.draw(|f| ui::ui(dashboard, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // crossterm polling blocks, so keep it off the runtime's worker
        let polled = tokio::task::block_in_place(|| {
            if matches!(
                event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
                Ok(true)
            ) {
                event::read().ok()
            } else {
                None
            }
        });

        match polled {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if let Some(command) = handle_key(dashboard, key.code) {
                    debug!(event = "command", command = ?command);
                    execute_command(command, dashboard, &source, &tx);
                }
            }
            Some(Event::Resize(_, _)) => {
                // Force a redraw after resize
                if terminal.draw(|f| ui::ui(dashboard, f)).is_err() {
                    // Non-fatal redraw error
                }
            }
            _ => {
                // Ignore non-key events
            }
        }
    }

    info!(event = "app.stop");
    Ok(())
}
