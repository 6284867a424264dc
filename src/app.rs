use crate::browser::SessionOptions;
use crate::catalog::Catalog;
use crate::cli::{Command, ResolveArgs, ScrapeArgs};
use crate::config::Config;
use crate::scraper::{ScrapeOptions, scrape};
use crate::utils::fmt_duration;
use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Main application struct: resolved configuration plus the command to run
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one command and map the outcome to a process exit code
    pub async fn run(&self, command: Command) -> ExitCode {
        let result = match command {
            Command::Scrape(args) => self.scrape(&args).await,
            Command::Resolve(args) => self.resolve(&args),
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = format!("{e:#}"), "command failed");
                ExitCode::FAILURE
            }
        }
    }

    /// Build scrape options from config, with CLI flags taking precedence
    pub fn scrape_options(&self, args: &ScrapeArgs) -> ScrapeOptions {
        ScrapeOptions {
            session: SessionOptions {
                webdriver_url: self.config.webdriver_url.clone(),
                headless: args.headless.unwrap_or(self.config.headless),
            },
            listing_url: self.config.listing_url.clone(),
            ready_timeout: self.config.ready_timeout,
            output_path: args
                .output
                .clone()
                .unwrap_or_else(|| self.config.output_path.clone()),
            policy: args.policy.unwrap_or(self.config.name_policy),
        }
    }

    async fn scrape(&self, args: &ScrapeArgs) -> anyhow::Result<()> {
        let options = self.scrape_options(args);
        info!(
            listing_url = %options.listing_url,
            ready_timeout = fmt_duration(options.ready_timeout),
            policy = options.policy.as_str(),
            "starting scrape"
        );

        let report = scrape(&options).await.context("Scrape failed")?;
        if report.count == 0 {
            warn!("listing contained no badges, wrote an empty badge file");
        }

        info!(
            count = report.count,
            path = %report.output_path.display(),
            duration = fmt_duration(report.duration),
            "scrape complete"
        );
        Ok(())
    }

    fn resolve(&self, args: &ResolveArgs) -> anyhow::Result<()> {
        let path = args.input.as_ref().unwrap_or(&self.config.output_path);
        let catalog = Catalog::load(path)?;

        let resolved = catalog.resolve_tag(&args.tag, &args.size);
        info!(
            tag = %args.tag,
            matched = resolved.len(),
            catalog = catalog.len(),
            "badges resolved"
        );

        for badge in resolved {
            println!("{}\t{}", badge.name, badge.url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::NamePolicy;
    use figment::Figment;
    use figment::providers::{Format, Toml};
    use std::path::PathBuf;

    fn app() -> App {
        App::new(Config::from_figment(Figment::new()).unwrap())
    }

    #[test]
    fn config_values_used_without_flags() {
        let options = app().scrape_options(&ScrapeArgs::default());

        assert_eq!(options.output_path, PathBuf::from("twitch/json/twitch_badges.json"));
        assert_eq!(options.policy, NamePolicy::Basic);
        assert!(!options.session.headless);
    }

    #[test]
    fn flags_override_config() {
        let options = app().scrape_options(&ScrapeArgs {
            policy: Some(NamePolicy::Strict),
            output: Some(PathBuf::from("elsewhere.json")),
            headless: Some(true),
        });

        assert_eq!(options.output_path, PathBuf::from("elsewhere.json"));
        assert_eq!(options.policy, NamePolicy::Strict);
        assert!(options.session.headless);
    }

    #[test]
    fn headless_flag_can_disable_configured_headless() {
        let config = Config::from_figment(Figment::from(Toml::string("headless = true"))).unwrap();
        let app = App::new(config);

        assert!(app.scrape_options(&ScrapeArgs::default()).session.headless);

        let visible = app.scrape_options(&ScrapeArgs {
            headless: Some(false),
            ..ScrapeArgs::default()
        });
        assert!(!visible.session.headless);
    }

    #[test]
    fn resolve_with_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = app().resolve(&ResolveArgs {
            tag: "vip/1".into(),
            size: "3".into(),
            input: Some(dir.path().join("missing.json")),
        });
        assert!(result.is_err());
    }

    #[test]
    fn resolve_reads_given_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badges.json");
        std::fs::write(&path, r#"[{"index": 1, "name": "vip", "url": "x/{SIZE}"}]"#).unwrap();

        let result = app().resolve(&ResolveArgs {
            tag: "vip/1".into(),
            size: "2".into(),
            input: Some(path),
        });
        assert!(result.is_ok());
    }
}
