use color_eyre::Result;
use serde::Serialize;

use crate::api::FeedSource;
use crate::app::Dashboard;
use crate::event::refresh::run_cycle;
use crate::event::AppMessage;
use crate::ui::text::render_text;
use crate::ui::view::DashboardView;

/// Run a single refresh cycle and print the dashboard (no UI)
pub async fn run_headless(
    dashboard: &mut Dashboard,
    source: &dyn FeedSource,
    json: bool,
) -> Result<()> {
    let report = build_headless_report(dashboard, source).await;

    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        if !report.failed_feeds.is_empty() {
            println!("Failed feeds: {}\n", report.failed_feeds.join(", "));
        }
        print!("{}", render_text(&report.view));
    }

    Ok(())
}

pub async fn build_headless_report(
    dashboard: &mut Dashboard,
    source: &dyn FeedSource,
) -> HeadlessReport {
    let generation = dashboard.begin_refresh();
    let outcome = run_cycle(source, generation).await;
    let failed_feeds = outcome
        .failed_feeds()
        .into_iter()
        .map(|feed| feed.label().to_string())
        .collect();

    dashboard.handle_message(AppMessage::CycleSettled(outcome));

    HeadlessReport {
        failed_feeds,
        view: dashboard.view().clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    pub failed_feeds: Vec<String>,
    #[serde(flatten)]
    pub view: DashboardView,
}
