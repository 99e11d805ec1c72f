pub mod helpers;
pub mod screens;

use crate::app::state::{Command, Dashboard};
use crossterm::event::KeyCode;

/// Applies a key press to the dashboard and returns any work the event loop must start.
pub fn handle_key(dashboard: &mut Dashboard, key: KeyCode) -> Option<Command> {
    screens::dispatch_input(dashboard, key)
}
