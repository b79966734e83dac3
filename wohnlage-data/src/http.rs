//! Blocking JSON-over-HTTP client shared by the Overpass and Nominatim
//! adapters.
//!
//! The collaborator traits in `wohnlage-core` are synchronous. This client
//! bridges them to async `reqwest` by blocking on a Tokio runtime it owns,
//! or on the caller's runtime when one is already running.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;
use wohnlage_core::UpstreamError;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "wohnlage/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
    /// The base URL could not be parsed or cannot carry a path.
    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser error, when parsing failed.
        #[source]
        source: Option<url::ParseError>,
    },
}

/// Connection settings for an HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the service, for example `"https://overpass-api.de"`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Configuration for `base_url` with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Blocking GET-and-decode client bound to one base URL.
pub(crate) struct JsonClient {
    client: Client,
    runtime: Runtime,
    base_url: Url,
    timeout: Duration,
}

impl std::fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl JsonClient {
    pub(crate) fn new(config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source: Some(source),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source: None,
            });
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Append `path` to the base URL and set the query parameters.
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url.query_pairs_mut().clear().extend_pairs(query);
        url
    }

    /// Fetch `url` and decode the body as JSON, blocking until done.
    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, UpstreamError> {
        let future = self.fetch(url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &Url) -> Result<T, UpstreamError> {
        log::debug!("GET {}", redact_query(url));
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_error(&err, url))?;
        response.json().await.map_err(|err| {
            if err.is_timeout() {
                self.convert_error(&err, url)
            } else {
                UpstreamError::Parse {
                    message: err.to_string(),
                }
            }
        })
    }

    fn convert_error(&self, error: &reqwest::Error, url: &Url) -> UpstreamError {
        let url = redact_query(url);
        if error.is_timeout() {
            return UpstreamError::Timeout {
                url,
                timeout_secs: self.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return UpstreamError::Http {
                url,
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        UpstreamError::Network {
            url,
            message: error.to_string(),
        }
    }
}

/// Drop the query string, which may hold a long Overpass query or a user's
/// address.
fn redact_query(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/api/interpreter?data=x")]
    #[case("http://localhost:8080/", "http://localhost:8080/api/interpreter?data=x")]
    #[case("http://proxy.local/overpass/", "http://proxy.local/overpass/api/interpreter?data=x")]
    fn endpoint_joins_paths(#[case] base: &str, #[case] expected: &str) {
        let client = JsonClient::new(&HttpClientConfig::new(base)).expect("client builds");
        let url = client.endpoint("api/interpreter", &[("data", "x")]);
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn endpoint_encodes_query_values() {
        let client =
            JsonClient::new(&HttpClientConfig::new("https://nominatim.example")).expect("client");
        let url = client.endpoint("search", &[("q", "Karlstraße 5, München")]);
        assert_eq!(
            url.as_str(),
            "https://nominatim.example/search?q=Karlstra%C3%9Fe+5%2C+M%C3%BCnchen"
        );
        assert_eq!(redact_query(&url), "https://nominatim.example/search");
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    fn rejects_unusable_base_urls(#[case] base: &str) {
        let err = JsonClient::new(&HttpClientConfig::new(base)).expect_err("base rejected");
        assert!(matches!(err, ClientBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(
            HttpClientConfig::new("x").timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }
}
