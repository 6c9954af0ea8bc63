use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::Parser;
use engine::{Currency, EngineError};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/pennywise.toml";
const ENV_PREFIX: &str = "PENNYWISE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted PostgREST + GoTrue backend.
    Supabase,
    /// In-process store, lost on exit.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub currency: String,
    pub timezone: String,
    pub export_dir: String,
    pub state_path: String,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Supabase,
            supabase_url: None,
            supabase_anon_key: None,
            currency: "IDR".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            export_dir: ".".to_string(),
            state_path: "config/pennywise_state.json".to_string(),
            log_level: "info".to_string(),
            log_file: "logs/pennywise.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Backend URL and anon key, required by the hosted backend.
    pub fn supabase_credentials(&self) -> std::result::Result<(&str, &str), EngineError> {
        let url = non_blank(self.supabase_url.as_deref());
        let key = non_blank(self.supabase_anon_key.as_deref());
        match (url, key) {
            (Some(url), Some(key)) => Ok((url, key)),
            (None, None) => Err(EngineError::MissingConfiguration(
                "supabase_url and supabase_anon_key are not set".to_string(),
            )),
            (None, _) => Err(EngineError::MissingConfiguration(
                "supabase_url is not set".to_string(),
            )),
            (_, None) => Err(EngineError::MissingConfiguration(
                "supabase_anon_key is not set".to_string(),
            )),
        }
    }

    /// Display currency; unknown codes fall back to IDR.
    pub fn currency(&self) -> Currency {
        Currency::try_from(self.currency.as_str()).unwrap_or_else(|_| {
            tracing::warn!(currency = %self.currency, "unknown currency, using IDR");
            Currency::Idr
        })
    }

    /// Timezone deciding the current month; unknown names fall back to UTC.
    pub fn timezone(&self) -> Tz {
        self.timezone.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(timezone = %self.timezone, "unknown timezone, using UTC");
            Tz::UTC
        })
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone()).date_naive()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "pennywise", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override backend (`supabase` or `memory`).
    #[arg(long)]
    backend: Option<String>,
    /// Override backend URL (e.g. https://xyz.supabase.co).
    #[arg(long)]
    supabase_url: Option<String>,
    /// Override display currency (IDR, EUR, USD).
    #[arg(long)]
    currency: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the directory CSV exports are written to.
    #[arg(long)]
    export_dir: Option<String>,
    /// Override log level / filter directive.
    #[arg(long)]
    log_level: Option<String>,
}

/// Reads the configuration layers again on every [`ConfigLoader::load`], so
/// a fixed file or environment can be picked up without a restart.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    args: Args,
}

impl ConfigLoader {
    pub fn from_args() -> Self {
        Self {
            args: Args::parse(),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let config_path = self.args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX));
        self.apply(builder)
    }

    /// Layers CLI overrides on top of `builder`.
    fn apply(
        &self,
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<AppConfig> {
        let mut builder = builder;
        let overrides = [
            ("backend", &self.args.backend),
            ("supabase_url", &self.args.supabase_url),
            ("currency", &self.args.currency),
            ("timezone", &self.args.timezone),
            ("export_dir", &self.args.export_dir),
            ("log_level", &self.args.log_level),
        ];
        for (key, value) in overrides {
            builder = builder.set_override_option(key, value.clone())?;
        }
        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn load(toml: &str, args: Args) -> AppConfig {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        ConfigLoader { args }.apply(builder).unwrap()
    }

    #[test]
    fn defaults_apply_when_empty() {
        let config = load("", Args::default());
        assert_eq!(config.backend, BackendKind::Supabase);
        assert_eq!(config.currency(), Currency::Idr);
        assert!(matches!(
            config.supabase_credentials(),
            Err(EngineError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn file_values_and_cli_overrides() {
        let config = load(
            r#"
            backend = "memory"
            supabase_url = "https://example.supabase.co"
            supabase_anon_key = "anon"
            currency = "EUR"
            timezone = "Europe/Rome"
            "#,
            Args {
                currency: Some("usd".to_string()),
                ..Args::default()
            },
        );
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.currency(), Currency::Usd);
        assert_eq!(config.timezone(), chrono_tz::Europe::Rome);
        assert_eq!(
            config.supabase_credentials().unwrap(),
            ("https://example.supabase.co", "anon")
        );
    }

    #[test]
    fn blank_credentials_are_missing() {
        let config = load(
            r#"
            supabase_url = "  "
            supabase_anon_key = "anon"
            "#,
            Args::default(),
        );
        assert_eq!(
            config.supabase_credentials(),
            Err(EngineError::MissingConfiguration(
                "supabase_url is not set".to_string()
            ))
        );
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        let config = load(r#"timezone = "Mars/Olympus""#, Args::default());
        assert_eq!(config.timezone(), Tz::UTC);
    }
}
