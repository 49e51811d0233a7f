//! HTTP product source
//!
//! Fetches the catalog from the product API (`GET {base}/api/products?category=`),
//! the same endpoint the storefront server exposes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;
use url::{Host, Url};

use crate::application::product_source::{FetchError, ProductSource};
use crate::domain::{constants::catalog::PRODUCTS_PATH, product::Product};
use crate::infrastructure::config::ClientConfig;

/// HTTP client configuration for the product API
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        ClientConfig::default().into()
    }
}

impl From<ClientConfig> for HttpClientConfig {
    fn from(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url,
            user_agent: config.user_agent,
            timeout_seconds: config.timeout_seconds,
        }
    }
}

pub struct HttpProductSource {
    client: Client,
    base_url: Url,
}

impl HttpProductSource {
    pub fn new(config: HttpClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::InvalidUrl(format!("Invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let base_url = parse_base_url(&config.base_url)?;

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers);
        // Local catalogs never go through a system proxy
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Products endpoint for an optional category filter
    pub fn products_url(&self, category: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(PRODUCTS_PATH)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category);
        }
        Ok(url)
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, FetchError> {
        let url = self.products_url(category)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

// `Url::join` drops the last path segment unless the base ends with a slash.
fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
