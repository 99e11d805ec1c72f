use crate::app::state::{Command, Dashboard};
use crossterm::event::KeyCode;

mod chat;
mod dashboard;
mod help;
mod popup;

pub fn dispatch_input(dashboard: &mut Dashboard, key: KeyCode) -> Option<Command> {
    if dashboard.ui.show_help {
        help::handle_help_toggle(dashboard, key);
        return None;
    }

    if dashboard.ui.popup.is_some() {
        popup::handle_popup_input(dashboard, key);
        return None;
    }

    if dashboard.ui.chat_open {
        return chat::handle_chat_input(dashboard, key);
    }

    if help::handle_help_toggle(dashboard, key) {
        return None;
    }

    dashboard::handle_dashboard_input(dashboard, key)
}
