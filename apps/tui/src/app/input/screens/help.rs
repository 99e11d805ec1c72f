use crate::app::state::Dashboard;
use crossterm::event::KeyCode;

pub fn handle_help_toggle(dashboard: &mut Dashboard, key: KeyCode) -> bool {
    if matches!(key, KeyCode::F(1) | KeyCode::Char('?')) {
        dashboard.ui.show_help = !dashboard.ui.show_help;
        return true;
    }

    if dashboard.ui.show_help {
        if key == KeyCode::Esc {
            dashboard.ui.show_help = false;
        }
        return true;
    }

    false
}
