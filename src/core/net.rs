// src/core/net.rs
// Blocking page fetch with bounded retries.

use reqwest::blocking::Client;

use crate::config::options::CatalogConfig;
use crate::error::FetchError;
use crate::progress::StatusFn;

/// Anything that can turn a URL into page text.
pub trait Fetch {
    /// Non-empty body of `url`, or `FetchError::EmptyResponse` once every
    /// attempt came back empty or failed.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// HTTPS fetcher: one timeout per attempt, `retries + 1` attempts.
pub struct HttpFetcher {
    client: Client,
    retries: u32,
    status: Option<StatusFn>,
}

impl HttpFetcher {
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, retries: config.retries, status: None })
    }

    /// Report every attempt to `status` as well as to the log (verbose mode).
    pub fn with_status(mut self, status: StatusFn) -> Self {
        self.status = Some(status);
        self
    }

    fn attempt(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send()?.error_for_status()?.text()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let status = self.status.as_deref().map(|f| f as &dyn Fn(&str));
        fetch_with_retries(url, self.retries + 1, |u| self.attempt(u).map_err(|e| e.to_string()), status)
    }
}

/// The retry loop. An error or a blank body is an empty attempt.
fn fetch_with_retries<A>(
    url: &str,
    attempts: u32,
    mut attempt: A,
    status: Option<&dyn Fn(&str)>,
) -> Result<String, FetchError>
where
    A: FnMut(&str) -> Result<String, String>,
{
    let say = |msg: &str| {
        if let Some(f) = status {
            f(msg);
        }
    };
    say(&format!("fetching {url}"));
    for n in 1..=attempts {
        match attempt(url) {
            Ok(body) if !body.trim().is_empty() => {
                logd!("GET {url}: ok ({} bytes, attempt {n})", body.len());
                say("response received");
                say("success: nonempty response");
                return Ok(body);
            }
            Ok(_) => {
                logd!("GET {url}: empty body (attempt {n}/{attempts})");
                say(&format!("empty response (attempt {n}/{attempts})"));
            }
            Err(e) => {
                logd!("GET {url}: {e} (attempt {n}/{attempts})");
                say(&format!("timeout: {e} (attempt {n}/{attempts})"));
            }
        }
    }
    loge!("GET {url}: empty responses in all {attempts} attempts");
    say(&format!("{url} gave empty responses in all {attempts} attempts"));
    Err(FetchError::EmptyResponse { url: s!(url), attempts })
}
