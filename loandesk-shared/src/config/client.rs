use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use url::Url;

/// Configuration for the LoanDesk client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the LoanDesk server.
    pub server_url: Url,

    /// Seconds between unread-count poller ticks.
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Logging level filter.
    pub log_level: String,
}

impl ClientConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            server_url: Url::parse("http://localhost:8080").expect("default URL is valid"),
            poll_interval_secs: 30,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Precedence, lowest to highest: defaults, configuration file, `LOANDESK_*`
    /// environment variables, then the explicit `server_override`.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a `yaml` or `json` configuration file.
    /// * `server_override` - Optional server URL that wins over everything else.
    ///
    /// # Returns
    /// A resolved [`ClientConfig`], or an error if loading or validation fails.
    pub fn load_config(
        config_path: Option<PathBuf>,
        server_override: Option<Url>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::with_defaults();

        // Load from file if provided
        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)?;
            let file_config: Self = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => {
                    return Err("Unsupported configuration format. Use 'yaml' or 'json'.".into());
                }
            };
            config = file_config;
        }

        // Use environment variables only if values are not already set
        let defaults = Self::with_defaults();
        if config.server_url == defaults.server_url {
            if let Ok(server_url) = env::var("LOANDESK_SERVER_URL") {
                config.server_url = Url::parse(&server_url)
                    .map_err(|_| "Invalid LOANDESK_SERVER_URL value: must be an absolute URL")?;
            }
        }
        if config.poll_interval_secs == defaults.poll_interval_secs {
            if let Ok(interval) = env::var("LOANDESK_POLL_INTERVAL_SECS") {
                config.poll_interval_secs = interval.parse().map_err(|_| {
                    "Invalid LOANDESK_POLL_INTERVAL_SECS value: must be a whole number of seconds"
                })?;
            }
        }
        if config.request_timeout_secs == defaults.request_timeout_secs {
            if let Ok(timeout) = env::var("LOANDESK_REQUEST_TIMEOUT_SECS") {
                config.request_timeout_secs = timeout.parse().map_err(|_| {
                    "Invalid LOANDESK_REQUEST_TIMEOUT_SECS value: must be a whole number of seconds"
                })?;
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(log_level) = env::var("LOANDESK_LOG_LEVEL") {
                config.log_level = log_level;
            }
        }

        // Override with command-line arguments if provided
        if let Some(server_url) = server_override {
            config.server_url = server_url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.poll_interval_secs == 0 {
            return Err("Invalid poll interval. Must be greater than 0.".into());
        }
        if self.request_timeout_secs == 0 {
            return Err("Invalid request timeout. Must be greater than 0.".into());
        }
        if self.server_url.cannot_be_a_base() {
            return Err("Invalid server URL. Must be an absolute http(s) URL.".into());
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "LOANDESK_SERVER_URL",
            "LOANDESK_POLL_INTERVAL_SECS",
            "LOANDESK_REQUEST_TIMEOUT_SECS",
            "LOANDESK_LOG_LEVEL",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ClientConfig::load_config(None, None).unwrap();
        assert_eq!(config.server_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_load_from_yaml_file() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "server_url: https://desk.example.com\npoll_interval_secs: 10\nrequest_timeout_secs: 5\nlog_level: debug"
        )
        .unwrap();

        let config = ClientConfig::load_config(Some(file.path().to_path_buf()), None).unwrap();
        assert_eq!(config.server_url.as_str(), "https://desk.example.com/");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_unsupported_format_rejected() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "server_url = \"https://desk.example.com\"").unwrap();

        let result = ClientConfig::load_config(Some(file.path().to_path_buf()), None);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_override() {
        clear_env();
        unsafe { env::set_var("LOANDESK_SERVER_URL", "https://env.example.com") };
        unsafe { env::set_var("LOANDESK_POLL_INTERVAL_SECS", "7") };

        let config = ClientConfig::load_config(None, None).unwrap();
        assert_eq!(config.server_url.as_str(), "https://env.example.com/");
        assert_eq!(config.poll_interval_secs, 7);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_server_override_wins() {
        clear_env();
        unsafe { env::set_var("LOANDESK_SERVER_URL", "https://env.example.com") };

        let flag = Url::parse("https://flag.example.com").unwrap();
        let config = ClientConfig::load_config(None, Some(flag.clone())).unwrap();
        assert_eq!(config.server_url, flag);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_poll_interval_rejected() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(
            file,
            r#"{{"server_url":"http://localhost:8080","poll_interval_secs":0,"request_timeout_secs":30,"log_level":"info"}}"#
        )
        .unwrap();

        let result = ClientConfig::load_config(Some(file.path().to_path_buf()), None);
        assert!(result.is_err());
    }
}
