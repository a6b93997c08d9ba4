//! Real transport backed by reqwest.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{HttpResponse, PreparedRequest, Transport, TransportError};

/// HTTP transport with one shared cookie-keeping client for direct
/// requests and lazily built clients per proxy endpoint.
///
/// reqwest attaches proxies at client construction, so per-attempt proxy
/// rotation needs a small client cache rather than a per-request option.
pub struct ReqwestTransport {
    direct: Client,
    proxied: Mutex<HashMap<String, Client>>,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Build the transport with the given request timeout.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            direct: Self::builder(timeout).build()?,
            proxied: Mutex::new(HashMap::new()),
            timeout,
        })
    }

    fn builder(timeout: Duration) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
    }

    fn client_for(&self, proxy: Option<&str>) -> Result<Client, TransportError> {
        let Some(endpoint) = proxy else {
            return Ok(self.direct.clone());
        };

        let mut cache = self
            .proxied
            .lock()
            .map_err(|_| TransportError("proxy client cache poisoned".to_string()))?;
        if let Some(client) = cache.get(endpoint) {
            return Ok(client.clone());
        }

        let proxy = reqwest::Proxy::all(endpoint)
            .map_err(|error| TransportError(format!("invalid proxy {endpoint}: {error}")))?;
        let client = Self::builder(self.timeout)
            .proxy(proxy)
            .build()
            .map_err(|error| TransportError(error.to_string()))?;
        cache.insert(endpoint.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, TransportError> {
        let mut url = Url::parse(&request.url)
            .map_err(|error| TransportError(format!("invalid url {}: {error}", request.url)))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }

        let client = self.client_for(request.proxy.as_deref())?;
        let mut builder = client.get(url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|error| TransportError(error.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| TransportError(error.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
