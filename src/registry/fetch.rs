// src/registry/fetch.rs

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use super::RegistryError;

/// Retrieves a page body. The registry only ever needs GET-as-text.
pub trait Fetch {
    fn get(&self, url: &Url) -> Result<String, RegistryError>;
}

/// Blocking `reqwest` fetcher with the client's default settings.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &Url) -> Result<String, RegistryError> {
        debug!("Fetching text from {}", url);
        let transport = |source: reqwest::Error| RegistryError::Transport {
            url: url.to_string(),
            source: Box::new(source),
        };

        let resp = self.client.get(url.clone()).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().map_err(transport)
    }
}
