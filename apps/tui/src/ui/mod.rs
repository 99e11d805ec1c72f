// UI module for race_dash
// Builds the view model and paints it

pub mod screens;
pub mod text;
pub mod view;
pub mod widgets;

use crate::app::Dashboard;
use ratatui::Frame;

pub fn ui(dashboard: &mut Dashboard, f: &mut Frame<'_>) {
    screens::dashboard::render_dashboard(dashboard, f);

    let area = f.area();
    if let Some(popup) = &dashboard.ui.popup {
        widgets::popup::render_popup(popup, f, area);
    }
    if dashboard.ui.show_help {
        screens::help::render_help_popup(f, area);
    }
}
