use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "race_dash", version, about = "Horse racing odds dashboard")]
pub struct CliArgs {
    /// Fetch once, print the dashboard and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Backend base URL, e.g. http://127.0.0.1:8000/api
    #[arg(long = "api-base", value_name = "URL")]
    pub api_base: Option<String>,

    /// Initial race filter: all, featured or a track slug
    #[arg(long, value_name = "KEY")]
    pub filter: Option<String>,

    /// Write logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    /// Flags win over `.env` and the environment because config reads the environment afterwards.
    pub fn apply_env_overrides(&self) {
        if let Some(api_base) = &self.api_base {
            std::env::set_var("RACE_DASH_API_BASE", api_base);
        }
        if let Some(filter) = &self.filter {
            std::env::set_var("RACE_DASH_FILTER", filter);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("RACE_DASH_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("RACE_DASH_LOG_LEVEL", "debug");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_flag() {
        let args = CliArgs::parse_from([
            "race_dash",
            "--headless",
            "--json",
            "--debug",
            "--api-base",
            "http://localhost:9000/api",
            "--filter",
            "moonee-valley",
            "--log-file",
            "/tmp/dash.log",
        ]);

        assert!(args.headless);
        assert!(args.json);
        assert!(args.debug);
        assert_eq!(args.api_base.as_deref(), Some("http://localhost:9000/api"));
        assert_eq!(args.filter.as_deref(), Some("moonee-valley"));
        assert_eq!(args.log_file.as_deref(), Some("/tmp/dash.log"));
    }

    #[test]
    fn flags_default_to_interactive_mode() {
        let args = CliArgs::parse_from(["race_dash"]);

        assert!(!args.headless);
        assert!(!args.json);
        assert!(args.api_base.is_none());
        assert!(args.filter.is_none());
    }
}
