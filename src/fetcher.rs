use std::path::PathBuf;
use std::time::Duration;

use reqwest::redirect;

use crate::config::Config;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid proxy URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to read saved page: {0}")]
    Io(#[from] std::io::Error),

    #[error("scraping proxy returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Source of raw search-result HTML for a marketplace URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages through the scraping proxy, which renders the target for us.
pub struct ProxyFetcher {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl ProxyFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let custom_redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > 10 {
                attempt.error("Too many redirects (>10)")
            } else {
                attempt.follow()
            }
        });

        let client = reqwest::blocking::Client::builder()
            .redirect(custom_redirect_policy)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn proxy_url(&self, target: &str) -> Result<url::Url, FetchError> {
        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[("api_key", self.api_key.as_str()), ("url", target)],
        )?;
        Ok(url)
    }
}

impl Fetcher for ProxyFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let proxy_url = self.proxy_url(url)?;
        tracing::info!(target_url = %url, "fetching through scraping proxy");

        let resp = self.client.get(proxy_url).send()?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text()?;
        tracing::debug!(bytes = body.len(), "proxy response received");
        Ok(body)
    }
}

/// Serves a previously saved results page, whatever URL is asked for.
pub struct SavedPageFetcher {
    path: PathBuf,
}

impl SavedPageFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetcher for SavedPageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!(path = %self.path.display(), target_url = %url, "reading saved page");
        Ok(std::fs::read_to_string(&self.path)?)
    }
}
