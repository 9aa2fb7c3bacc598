use std::time::Duration;
use std::{env, path::PathBuf};

use config::{ConfigBuilder, ConfigError, Environment, FileFormat, builder::DefaultState};
use directories::ProjectDirs;
use donation::{ReportMode, StalePolicy};
use geography::{DEFAULT_BASE_URL, GeographyConfig};
use lazy_static::lazy_static;
use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::warn;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GeographySettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for GeographySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SelectionSettings {
    #[serde(default)]
    pub stale_responses: StalePolicy,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValidationSettings {
    #[serde(default)]
    pub report: ReportMode,
}

/// How a failed geography lookup is surfaced on the form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoticeMode {
    #[default]
    Banner,
    /// Only the log file records the failure.
    Silent,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NoticeSettings {
    #[serde(default)]
    pub network_errors: NoticeMode,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub geography: GeographySettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub notices: NoticeSettings,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Defaults, then `config.json5` / `config.toml` from the config
    /// directory, then `CHECKOUT__SECTION__KEY` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = get_config_dir();
        let mut builder = Self::defaults()?;

        let config_files = [
            ("config.json5", FileFormat::Json5),
            ("config.toml", FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            warn!("No configuration file found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(&PROJECT_NAME)
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())
    }

    /// Defaults overlaid with a single in-memory document.
    pub fn from_document(text: &str, format: FileFormat) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(config::File::from_str(text, format))
            .build()?
            .try_deserialize()
    }

    pub fn geography_config(&self) -> GeographyConfig {
        GeographyConfig {
            base_url: self.geography.base_url.clone(),
            timeout: self.geography.timeout_secs.map(Duration::from_secs),
        }
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("br", "adfoz", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = Config::from_document("{}", FileFormat::Json5).unwrap();
        assert_eq!(cfg.geography.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.geography.timeout_secs, None);
        assert_eq!(cfg.selection.stale_responses, StalePolicy::Discard);
        assert_eq!(cfg.validation.report, ReportMode::All);
        assert_eq!(cfg.notices.network_errors, NoticeMode::Banner);
        assert_eq!(cfg.geography_config().timeout, None);
    }

    #[test]
    fn json5_overrides_every_section() {
        let cfg = Config::from_document(
            r#"{
                // local mirror
                geography: { base_url: "http://localhost:8080/api/v1", timeout_secs: 5 },
                selection: { stale_responses: "last_write_wins" },
                validation: { report: "missing_only" },
                notices: { network_errors: "silent" },
            }"#,
            FileFormat::Json5,
        )
        .unwrap();
        assert_eq!(cfg.geography.base_url, "http://localhost:8080/api/v1");
        assert_eq!(cfg.geography_config().timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.selection.stale_responses, StalePolicy::LastWriteWins);
        assert_eq!(cfg.validation.report, ReportMode::MissingOnly);
        assert_eq!(cfg.notices.network_errors, NoticeMode::Silent);
    }

    #[test]
    fn toml_is_accepted() {
        let cfg = Config::from_document(
            "[validation]\nreport = \"missing_only\"\n",
            FileFormat::Toml,
        )
        .unwrap();
        assert_eq!(cfg.validation.report, ReportMode::MissingOnly);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let res = Config::from_document(
            r#"{ selection: { stale_responses: "sometimes" } }"#,
            FileFormat::Json5,
        );
        assert!(res.is_err());
    }
}
