use std::path::PathBuf;

use clap::Parser;

use crate::platform::config::{ConsoleConfig, LogDestination};

/// Console for browsing and managing ingested job listings per company.
#[derive(Debug, Parser)]
#[command(name = "listings-console", version, about)]
pub struct Cli {
    /// RON config file; defaults apply when it does not exist.
    #[arg(long, default_value = "listings_console.ron")]
    pub config: PathBuf,

    /// Backend base URL, e.g. https://jobs.example.com/api
    #[arg(long)]
    pub base_url: Option<String>,

    /// Company to open on startup.
    #[arg(long)]
    pub company: Option<String>,

    /// Listings per page.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=500))]
    pub page_size: Option<u32>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
}

impl Cli {
    /// Flags win over values read from the config file.
    pub fn apply_overrides(&self, config: &mut ConsoleConfig) {
        if let Some(base_url) = &self.base_url {
            config.backend.base_url = base_url.clone();
        }
        if let Some(company) = &self.company {
            config.company = Some(company.clone());
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(destination) = self.log {
            config.log.destination = destination;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "listings-console",
            "--base-url",
            "https://jobs.example.com/api",
            "--company",
            "acme",
            "--page-size",
            "25",
            "--log",
            "terminal",
        ]);
        let mut config = ConsoleConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.backend.base_url, "https://jobs.example.com/api");
        assert_eq!(config.company.as_deref(), Some("acme"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log.destination, LogDestination::Terminal);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["listings-console", "--page-size", "0"]).is_err());
    }
}
