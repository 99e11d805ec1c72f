use crate::app::state::{Command, Dashboard};
use crossterm::event::KeyCode;

pub fn handle_dashboard_input(dashboard: &mut Dashboard, key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Char('q') => {
            dashboard.running = false;
            None
        }
        KeyCode::Char('r') => Some(Command::Refresh),
        KeyCode::Char('c') => {
            dashboard.toggle_chat();
            None
        }
        KeyCode::Up => {
            dashboard.select_prev_race();
            None
        }
        KeyCode::Down => {
            dashboard.select_next_race();
            None
        }
        KeyCode::Left => {
            dashboard.cycle_filter(false);
            None
        }
        KeyCode::Right => {
            dashboard.cycle_filter(true);
            None
        }
        KeyCode::Char('b') => {
            dashboard.place_bet();
            None
        }
        KeyCode::Enter | KeyCode::Char('d') => {
            dashboard.show_details();
            None
        }
        KeyCode::Char('a') => dashboard.request_ai_prediction(),
        _ => None,
    }
}
