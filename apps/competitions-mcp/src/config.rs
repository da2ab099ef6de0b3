//! # Configuration
//!
//! Settings are read from, highest precedence first:
//! 1. the process environment
//! 2. a `.env` file (skipped entirely when the process environment already
//!    sets a non-blank `COMPETITIONS_API_KEY`)
//! 3. an optional TOML file passed with `--config`
//! 4. built-in defaults
//!
//! ## Keys
//!
//! - `COMPETITIONS_API_KEY`: Bearer token (required)
//! - `COMPETITIONS_API_URL`: API base URL
//! - `COMPETITIONS_PAGE_SIZE`: page size used by `fetchAll` drains
//! - `COMPETITIONS_MAX_PAGES`: page cap per drain (`0` or unset: unbounded)
//! - `COMPETITIONS_TIMEOUT_SECS`: per-request timeout
//! - `COMPETITIONS_LOG_FORMAT`: `json` for machine-parseable logs
//! - `DEBUG`: `true` enables debug logging

use competitions_core::{CompetitionsError, DEFAULT_PAGE_SIZE, Drain};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Production API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.competitions.recall.network";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_VAR: &str = "COMPETITIONS_API_KEY";
pub const API_URL_VAR: &str = "COMPETITIONS_API_URL";
pub const PAGE_SIZE_VAR: &str = "COMPETITIONS_PAGE_SIZE";
pub const MAX_PAGES_VAR: &str = "COMPETITIONS_MAX_PAGES";
pub const TIMEOUT_VAR: &str = "COMPETITIONS_TIMEOUT_SECS";
pub const LOG_FORMAT_VAR: &str = "COMPETITIONS_LOG_FORMAT";
pub const DEBUG_VAR: &str = "DEBUG";

const KNOWN_VARS: [&str; 7] = [
    API_KEY_VAR,
    API_URL_VAR,
    PAGE_SIZE_VAR,
    MAX_PAGES_VAR,
    TIMEOUT_VAR,
    LOG_FORMAT_VAR,
    DEBUG_VAR,
];

// =============================================================================
// LOGGING SETTINGS
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings needed before the subscriber is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogSettings {
    pub debug: bool,
    pub format: LogFormat,
}

// =============================================================================
// TOML FILE
// =============================================================================

/// Contents of the optional `--config` TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api: ApiSection,
    pub pagination: PaginationSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSection {
    pub url: Option<String>,
    pub key: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationSection {
    pub page_size: Option<NonZeroU64>,
    pub max_pages: Option<u64>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self, CompetitionsError> {
        toml::from_str(text).map_err(|e| CompetitionsError::Config(format!("invalid TOML: {e}")))
    }

    pub fn read(path: &Path) -> Result<Self, CompetitionsError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CompetitionsError::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }
}

// =============================================================================
// DOTENV
// =============================================================================

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, values may contain `=`, and a
/// leading and/or trailing quote is stripped from each value. Lines with an
/// empty key or value are ignored.
pub fn parse_dotenv(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                return None;
            }
            let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
            let value = value.strip_suffix(['"', '\'']).unwrap_or(value);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// What happened to the `.env` file during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvOrigin {
    /// The API key came from the process environment; the file was not read.
    External,
    /// The file was read.
    Loaded(PathBuf),
    /// The file could not be read.
    Missing { path: PathBuf, reason: String },
}

// =============================================================================
// SOURCES
// =============================================================================

/// Raw configuration sources, merged on demand.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    process: BTreeMap<String, String>,
    dotenv: BTreeMap<String, String>,
    file: FileConfig,
    dotenv_origin: Option<DotenvOrigin>,
}

impl ConfigSources {
    /// Snapshot the process environment and read the `.env` and TOML files.
    pub fn load(env_file: &Path, config_file: Option<&Path>) -> Result<Self, CompetitionsError> {
        let process: BTreeMap<String, String> = KNOWN_VARS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::load_with(process, env_file, config_file)
    }

    /// Like [`ConfigSources::load`], with an explicit process environment.
    ///
    /// `.env` is only skipped when the process environment already carries
    /// a non-blank API key.
    pub fn load_with(
        process: BTreeMap<String, String>,
        env_file: &Path,
        config_file: Option<&Path>,
    ) -> Result<Self, CompetitionsError> {
        let external_key = process
            .get(API_KEY_VAR)
            .is_some_and(|key| !key.trim().is_empty());

        let (dotenv, origin) = if external_key {
            (BTreeMap::new(), DotenvOrigin::External)
        } else {
            match std::fs::read_to_string(env_file) {
                Ok(content) => (
                    parse_dotenv(&content),
                    DotenvOrigin::Loaded(env_file.to_path_buf()),
                ),
                Err(e) => (
                    BTreeMap::new(),
                    DotenvOrigin::Missing {
                        path: env_file.to_path_buf(),
                        reason: e.to_string(),
                    },
                ),
            }
        };

        let file = config_file.map(FileConfig::read).transpose()?.unwrap_or_default();

        Ok(Self {
            process,
            dotenv,
            file,
            dotenv_origin: Some(origin),
        })
    }

    /// Build sources from explicit parts.
    pub fn from_parts(
        process: BTreeMap<String, String>,
        dotenv: BTreeMap<String, String>,
        file: FileConfig,
    ) -> Self {
        Self {
            process,
            dotenv,
            file,
            dotenv_origin: None,
        }
    }

    #[must_use]
    pub fn dotenv_origin(&self) -> Option<&DotenvOrigin> {
        self.dotenv_origin.as_ref()
    }

    /// Environment lookup: process first, then `.env`. Empty values count
    /// as unset.
    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.process
            .get(key)
            .or_else(|| self.dotenv.get(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            debug: self.var(DEBUG_VAR) == Some("true"),
            format: match self.var(LOG_FORMAT_VAR) {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    /// Optional settings that fall back to defaults.
    #[must_use]
    pub fn unset_optional(&self) -> Vec<&'static str> {
        let mut unset = Vec::new();
        if self.var(API_URL_VAR).is_none() && self.file.api.url.is_none() {
            unset.push(API_URL_VAR);
        }
        if self.var(DEBUG_VAR).is_none() {
            unset.push(DEBUG_VAR);
        }
        unset
    }

    /// Merge all sources into a validated [`Config`].
    pub fn resolve(&self) -> Result<Config, CompetitionsError> {
        let api_key = self
            .var(API_KEY_VAR)
            .map(str::to_string)
            .or_else(|| self.file.api.key.clone())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CompetitionsError::Config(format!(
                    "Missing required environment variables: {API_KEY_VAR}. Please set {API_KEY_VAR}."
                ))
            })?;

        let api_url = self
            .var(API_URL_VAR)
            .map(str::to_string)
            .or_else(|| self.file.api.url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let page_size = match self.var(PAGE_SIZE_VAR) {
            Some(raw) => parse_number::<NonZeroU64>(PAGE_SIZE_VAR, raw)?,
            None => self.file.pagination.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let max_pages = match self.var(MAX_PAGES_VAR) {
            Some(raw) => parse_number::<u64>(MAX_PAGES_VAR, raw)?,
            None => self.file.pagination.max_pages.unwrap_or(0),
        };

        let timeout_secs = match self.var(TIMEOUT_VAR) {
            Some(raw) => parse_number::<u64>(TIMEOUT_VAR, raw)?,
            None => self.file.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            api_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            drain: Drain::new(page_size).with_max_pages(NonZeroU64::new(max_pages)),
            log: self.log_settings(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, CompetitionsError>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| CompetitionsError::Config(format!("{key}='{raw}' is not valid: {e}")))
}

// =============================================================================
// CONFIG
// =============================================================================

/// Fully resolved runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
    /// Drain settings used by `fetchAll` tools.
    pub drain: Drain,
    pub log: LogSettings,
}

impl Config {
    /// Configuration with defaults for everything but URL and key.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            drain: Drain::default(),
            log: LogSettings::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("drain", &self.drain)
            .field("log", &self.log)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn dotenv_parsing_rules() {
        let parsed = parse_dotenv(
            "# comment\n\
             \n\
             COMPETITIONS_API_KEY=\"abc=123\"\n\
             COMPETITIONS_API_URL = 'http://localhost:3000'\n\
             EMPTY=\n\
             =orphan\n\
             NOEQUALS\n",
        );
        assert_eq!(
            parsed,
            map(&[
                ("COMPETITIONS_API_KEY", "abc=123"),
                ("COMPETITIONS_API_URL", "http://localhost:3000"),
            ])
        );
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let sources = ConfigSources::from_parts(BTreeMap::new(), BTreeMap::new(), FileConfig::default());
        let err = sources.resolve().expect_err("key required");
        assert!(err.to_string().contains("COMPETITIONS_API_KEY"));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let sources = ConfigSources::from_parts(
            map(&[(API_KEY_VAR, "k")]),
            BTreeMap::new(),
            FileConfig::default(),
        );
        let config = sources.resolve().expect("config");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.drain, Drain::default());
        assert_eq!(config.log, LogSettings::default());
        assert_eq!(sources.unset_optional(), vec![API_URL_VAR, DEBUG_VAR]);
    }

    #[test]
    fn process_beats_dotenv_beats_file() {
        let file = FileConfig::from_toml(
            r#"
            [api]
            url = "http://file"
            key = "file-key"
            timeout_secs = 5

            [pagination]
            page_size = 25
            max_pages = 9
            "#,
        )
        .expect("toml");

        let sources = ConfigSources::from_parts(
            map(&[(API_URL_VAR, "http://process")]),
            map(&[(API_URL_VAR, "http://dotenv"), (API_KEY_VAR, "dotenv-key")]),
            file,
        );
        let config = sources.resolve().expect("config");

        assert_eq!(config.api_url, "http://process");
        assert_eq!(config.api_key, "dotenv-key");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.drain.page_size().get(), 25);
        assert_eq!(config.drain.max_pages().map(NonZeroU64::get), Some(9));
    }

    #[test]
    fn zero_max_pages_means_unbounded() {
        let sources = ConfigSources::from_parts(
            map(&[(API_KEY_VAR, "k"), (MAX_PAGES_VAR, "0"), (PAGE_SIZE_VAR, "50")]),
            BTreeMap::new(),
            FileConfig::default(),
        );
        let config = sources.resolve().expect("config");
        assert_eq!(config.drain.max_pages(), None);
        assert_eq!(config.drain.page_size().get(), 50);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let sources = ConfigSources::from_parts(
            map(&[(API_KEY_VAR, "k"), (PAGE_SIZE_VAR, "0")]),
            BTreeMap::new(),
            FileConfig::default(),
        );
        let err = sources.resolve().expect_err("page size must be positive");
        assert!(err.to_string().contains(PAGE_SIZE_VAR));
    }

    #[test]
    fn log_settings_from_env() {
        let sources = ConfigSources::from_parts(
            map(&[(DEBUG_VAR, "true"), (LOG_FORMAT_VAR, "json")]),
            BTreeMap::new(),
            FileConfig::default(),
        );
        assert_eq!(
            sources.log_settings(),
            LogSettings {
                debug: true,
                format: LogFormat::Json,
            }
        );
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        assert!(FileConfig::from_toml("[api]\nendpoint = \"x\"\n").is_err());
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = Config::new("http://localhost", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn load_reads_env_and_toml_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env_path = dir.path().join(".env");
        let toml_path = dir.path().join("competitions.toml");
        std::fs::write(&env_path, "COMPETITIONS_PAGE_SIZE=40\n").expect("write env");
        std::fs::write(&toml_path, "[pagination]\nmax_pages = 3\n").expect("write toml");

        let sources = ConfigSources::load(&env_path, Some(&toml_path)).expect("load");
        assert!(matches!(
            sources.dotenv_origin(),
            Some(DotenvOrigin::Loaded(_) | DotenvOrigin::External)
        ));
        assert_eq!(sources.file.pagination.max_pages, Some(3));
    }

    #[test]
    fn blank_process_key_falls_through_to_dotenv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "COMPETITIONS_API_KEY=from-dotenv\n").expect("write env");

        let sources =
            ConfigSources::load_with(map(&[(API_KEY_VAR, "")]), &env_path, None).expect("load");
        assert_eq!(
            sources.dotenv_origin(),
            Some(&DotenvOrigin::Loaded(env_path.clone()))
        );
        assert_eq!(sources.resolve().expect("config").api_key, "from-dotenv");
    }

    #[test]
    fn process_key_skips_dotenv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "COMPETITIONS_API_URL=http://dotenv\n").expect("write env");

        let sources =
            ConfigSources::load_with(map(&[(API_KEY_VAR, "k")]), &env_path, None).expect("load");
        assert_eq!(sources.dotenv_origin(), Some(&DotenvOrigin::External));
        assert_eq!(sources.var(API_URL_VAR), None);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = ConfigSources::load(
            &dir.path().join(".env"),
            Some(&dir.path().join("absent.toml")),
        );
        assert!(matches!(result, Err(CompetitionsError::Config(_))));
    }
}
