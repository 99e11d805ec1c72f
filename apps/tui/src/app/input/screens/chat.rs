use crate::app::state::{Command, Dashboard};
use crossterm::event::KeyCode;

pub fn handle_chat_input(dashboard: &mut Dashboard, key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Esc => {
            dashboard.toggle_chat();
            None
        }
        KeyCode::F(1) => {
            dashboard.ui.show_help = true;
            None
        }
        KeyCode::Enter => dashboard.submit_chat(),
        KeyCode::Backspace => {
            dashboard.ui.chat_input.pop();
            None
        }
        KeyCode::Char(ch) => {
            dashboard.ui.chat_input.push(ch);
            None
        }
        _ => None,
    }
}
