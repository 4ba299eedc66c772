pub const DEFAULT_API_ENDPOINT: &str = "https://api.scraperapi.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 70;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Settings for talking to the scraping proxy.
#[derive(Debug)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Reads `SCRAPER_API`, `SCRAPER_API_ENDPOINT` and `SCRAPER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("SCRAPER_API")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("SCRAPER_API"))?;

        let api_endpoint =
            lookup("SCRAPER_API_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let timeout_secs = match lookup("SCRAPER_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SCRAPER_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            api_endpoint,
            timeout_secs,
        })
    }
}
