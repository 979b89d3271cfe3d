//! Server configuration read from the environment.
//!
//! | variable                | default                                                   |
//! |-------------------------|-----------------------------------------------------------|
//! | `XLQUERY_HOST`          | `127.0.0.1`                                               |
//! | `XLQUERY_PORT`          | `8080`                                                    |
//! | `EPRINTS_SEARCH_URL`    | `http://authors.library.caltech.edu/cgi/search/advanced/` |
//! | `XLQUERY_ENGINE`        | `xlquery`                                                 |
//! | `XLQUERY_JSON_LIMIT_MB` | `25`                                                      |
//! | `XLQUERY_OPEN_BROWSER`  | `true`                                                    |
//!
//! `XLQUERY_ENGINE` is split on whitespace: the first word is the program, the
//! rest are passed before the query arguments (e.g. `sh /opt/xlquery/run.sh`).

use thiserror::Error;

pub const DEFAULT_SEARCH_URL: &str = "http://authors.library.caltech.edu/cgi/search/advanced/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
    #[error("{name} must be true or false, got {value:?}")]
    NotABool { name: &'static str, value: String },
    #[error("XLQUERY_ENGINE must name a program")]
    MissingEngineProgram,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub search_url: String,
    pub engine_program: String,
    pub engine_args: Vec<String>,
    pub json_limit_mb: usize,
    pub open_browser: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any name -> value lookup. Unset and blank
    /// values take the default, except `XLQUERY_ENGINE`, which must not be blank
    /// when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("XLQUERY_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::NotANumber { name: "XLQUERY_PORT", value: v })?,
            None => 8080,
        };
        let json_limit_mb = match get("XLQUERY_JSON_LIMIT_MB") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::NotANumber { name: "XLQUERY_JSON_LIMIT_MB", value: v })?,
            None => 25,
        };
        let open_browser = match get("XLQUERY_OPEN_BROWSER") {
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::NotABool { name: "XLQUERY_OPEN_BROWSER", value: v }),
            },
            None => true,
        };

        let engine = lookup("XLQUERY_ENGINE").unwrap_or_else(|| "xlquery".to_string());
        let mut words = engine.split_whitespace().map(str::to_string);
        let engine_program = words.next().ok_or(ConfigError::MissingEngineProgram)?;
        let engine_args = words.collect();

        Ok(Config {
            host: get("XLQUERY_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            search_url: get("EPRINTS_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            engine_program,
            engine_args,
            json_limit_mb,
            open_browser,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn json_limit_bytes(&self) -> usize {
        self.json_limit_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.url(), "http://127.0.0.1:8080");
        assert_eq!(c.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(c.engine_program, "xlquery");
        assert!(c.engine_args.is_empty());
        assert_eq!(c.json_limit_bytes(), 25 * 1024 * 1024);
        assert!(c.open_browser);
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("XLQUERY_HOST", "0.0.0.0"),
            ("XLQUERY_PORT", "9000"),
            ("EPRINTS_SEARCH_URL", "http://eprints.example.org/cgi/search/advanced"),
            ("XLQUERY_ENGINE", "sh /opt/xlquery/run.sh"),
            ("XLQUERY_JSON_LIMIT_MB", "5"),
            ("XLQUERY_OPEN_BROWSER", "off"),
        ])
        .unwrap();
        assert_eq!(c.url(), "http://0.0.0.0:9000");
        assert_eq!(c.search_url, "http://eprints.example.org/cgi/search/advanced");
        assert_eq!(c.engine_program, "sh");
        assert_eq!(c.engine_args, vec!["/opt/xlquery/run.sh"]);
        assert_eq!(c.json_limit_mb, 5);
        assert!(!c.open_browser);
    }

    #[test]
    fn blank_values_take_the_default() {
        let c = config(&[("XLQUERY_HOST", " "), ("XLQUERY_PORT", "")]).unwrap();
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 8080);
    }

    #[test]
    fn bad_values_are_reported() {
        assert_eq!(
            config(&[("XLQUERY_PORT", "http")]),
            Err(ConfigError::NotANumber { name: "XLQUERY_PORT", value: "http".to_string() })
        );
        assert!(matches!(
            config(&[("XLQUERY_OPEN_BROWSER", "maybe")]),
            Err(ConfigError::NotABool { .. })
        ));
        assert_eq!(config(&[("XLQUERY_ENGINE", "  ")]), Err(ConfigError::MissingEngineProgram));
    }
}
