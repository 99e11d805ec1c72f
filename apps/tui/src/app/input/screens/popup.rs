use crate::app::state::Dashboard;
use crossterm::event::KeyCode;

pub fn handle_popup_input(dashboard: &mut Dashboard, key: KeyCode) {
    if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
        dashboard.dismiss_popup();
    }
}
