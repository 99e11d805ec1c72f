use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use race_dash::api::{FeedSource, HttpFeedClient};
use race_dash::cli::CliArgs;
use race_dash::config::AppConfig;
use race_dash::logging::{init_logging, log_app_start};
use race_dash::{event, terminal, Dashboard};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    // Piped output gets the headless report
    let headless = args.headless || !is_terminal();
    let config = AppConfig::load(headless);

    init_logging(&config.logging)?;
    log_app_start(&config.logging, &config.api_base, headless);

    let source: Arc<dyn FeedSource> = Arc::new(HttpFeedClient::new(&config.api_base)?);
    let mut dashboard = Dashboard::new(config.initial_filter.clone());

    if headless {
        return event::run_headless(&mut dashboard, source.as_ref(), args.json).await;
    }

    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut dashboard, source, config.refresh_interval).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
