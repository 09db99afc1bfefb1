//! Runtime configuration: API location, credential and request timeout.
//!
//! Resolution order, later wins: built-in defaults, `.env`, process
//! environment, command-line flags.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

/// Collection URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://todo-app-server-d4zf.onrender.com/api/todos";
/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming the collection URL.
pub const ENV_API_URL: &str = "TASKLIST_API_URL";
/// Environment variable holding a fixed bearer token.
pub const ENV_TOKEN: &str = "TASKLIST_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TASKLIST_TIMEOUT_SECS";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The task collection, e.g. `https://host/api/todos`.
    pub api_url: Url,
    /// Fixed bearer token; a session token is generated when absent.
    pub token: Option<String>,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--api-url`
    pub api_url: Option<String>,
    /// `--token`
    pub token: Option<String>,
    /// `--timeout`
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Loads `.env` if present, then resolves against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured value is invalid.
    pub fn load(overrides: &Overrides) -> Result<Self, String> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::resolve(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolves configuration from an environment lookup and CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL or the
    /// timeout is not a positive number of seconds.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, String> {
        let raw_url = overrides
            .api_url
            .clone()
            .or_else(|| env(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&raw_url)?;

        let token = overrides
            .token
            .clone()
            .or_else(|| env(ENV_TOKEN))
            .filter(|token| !token.trim().is_empty());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| format!("{ENV_TIMEOUT_SECS}={raw:?} is not a number: {e}"))?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err("request timeout must be at least one second".to_string());
        }

        Ok(Self { api_url, token, timeout: Duration::from_secs(timeout_secs) })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("invalid API URL {raw:?}: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("API URL must use http or https, got {raw:?}"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_env_or_flags() {
        let config = Config::resolve(env_of(&[]), &Overrides::default()).unwrap();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = env_of(&[
            (ENV_API_URL, "http://localhost:3000/api/todos"),
            (ENV_TOKEN, "secret"),
            (ENV_TIMEOUT_SECS, " 5 "),
        ]);
        let config = Config::resolve(env, &Overrides::default()).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:3000/api/todos");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn flags_override_environment() {
        let env = env_of(&[(ENV_API_URL, "http://env/api/todos"), (ENV_TOKEN, "env-token")]);
        let overrides = Overrides {
            api_url: Some("http://flag/api/todos".into()),
            token: Some("flag-token".into()),
            timeout_secs: Some(2),
        };
        let config = Config::resolve(env, &overrides).unwrap();
        assert_eq!(config.api_url.host_str(), Some("flag"));
        assert_eq!(config.token.as_deref(), Some("flag-token"));
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn blank_token_means_generate_one() {
        let config = Config::resolve(env_of(&[(ENV_TOKEN, "  ")]), &Overrides::default()).unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_scheme = Overrides { api_url: Some("ftp://x/y".into()), ..Overrides::default() };
        assert!(Config::resolve(env_of(&[]), &bad_scheme).is_err());

        let relative = Overrides { api_url: Some("/api/todos".into()), ..Overrides::default() };
        assert!(Config::resolve(env_of(&[]), &relative).is_err());

        assert!(Config::resolve(env_of(&[(ENV_TIMEOUT_SECS, "soon")]), &Overrides::default())
            .is_err());

        let zero = Overrides { timeout_secs: Some(0), ..Overrides::default() };
        assert!(Config::resolve(env_of(&[]), &zero).is_err());
    }
}
