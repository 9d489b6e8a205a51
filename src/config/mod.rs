//! Configuration module for the pbinfo client.
//!
//! Values come from an optional `bmoisil.toml` in the working directory,
//! overridden by `PBINFO_*` environment variables.

use std::fmt;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use fundu::DurationParser;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Optional configuration file name.
pub const CONFIG_FILE: &str = "bmoisil.toml";

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "PBINFO_";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Log level for the `bmoisil` target
    ///
    /// Defaults to "info" if not specified
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Site root; problem pages and download links are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Root of the test listing endpoint, `{base_url}/ajx-module` when unset
    #[serde(default)]
    pub ajax_url: Option<Url>,
    /// Per-request timeout, zero disables it
    ///
    /// Accepts a number of seconds or a string such as "500ms" or "1m".
    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Upper bound on simultaneous test downloads for one retrieval
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> Url {
    Url::parse("https://www.pbinfo.ro").expect("default base URL is valid")
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (X11; Linux x86_64) bmoisil/{}",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_max_concurrent_downloads() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            base_url: default_base_url(),
            ajax_url: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

impl Config {
    /// Load from [`CONFIG_FILE`] and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let config: Self = figment.extract()?;
        if config.base_url.cannot_be_a_base() {
            return Err(figment::Error::from(format!(
                "base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }
        Ok(config)
    }

    /// Root of the test listing endpoint.
    pub fn ajax_url(&self) -> Url {
        if let Some(url) = &self.ajax_url {
            return url.clone();
        }
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("ajx-module");
        }
        url
    }
}

/// Accepts whole or fractional seconds, or any duration string `fundu` understands.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, Visitor};

    struct DurationVisitor;

    impl Visitor<'_> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string or a number of seconds")
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Duration, E> {
            Ok(Duration::from_secs(value))
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Duration, E> {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom(format!("negative duration: {value}")))
        }

        fn visit_f64<E: Error>(self, value: f64) -> Result<Duration, E> {
            Duration::try_from_secs_f64(value)
                .map_err(|e| E::custom(format!("invalid duration {value}: {e}")))
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Duration, E> {
            let parsed = DurationParser::with_all_time_units()
                .parse(value.trim())
                .map_err(|e| E::custom(format!("invalid duration '{value}': {e}")))?;
            Duration::try_from(parsed)
                .map_err(|e| E::custom(format!("invalid duration '{value}': {e}")))
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}
