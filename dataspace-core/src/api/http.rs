use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder, Method,
    header::{COOKIE, HeaderMap, HeaderValue},
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{ApiError, Settings, UserSession};

use super::{DEFAULT_SOURCE, DataProductApi};

const DATA_PRODUCT_PATH: &str = "api/data-product";
const DATA_PRODUCT_SIG_PATH: &str = "api/data-product-sig";
const ME_PATH: &str = "api/me";

/// `DataProductApi` over HTTP, talking to the demo backend.
#[derive(Debug, Clone)]
pub struct HttpDataProductClient {
    base_url: String,
    http_sig_source: String,
    http: Client,
}

impl HttpDataProductClient {
    pub fn with_client(
        base_url: impl Into<String>,
        http_sig_source: impl Into<String>,
        http: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http_sig_source: http_sig_source.into(), http }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = client_builder(settings)?
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(settings.api_origin(), settings.http_sig_source.clone(), http))
    }

    async fn post_data_product(
        &self,
        path: &str,
        definition: &str,
        source: &str,
        params: &Value,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{path}/{}", self.base_url, definition.trim_start_matches('/'));
        debug!(%url, source, "POST data product");

        let res = self
            .http
            .post(&url)
            .query(&[("source", source)])
            .json(params)
            .send()
            .await?;

        read_json(res, Method::POST, &url, "a data product").await
    }
}

/// Reqwest client builder carrying the session cookie and timeout from
/// `settings`.
pub fn client_builder(settings: &Settings) -> anyhow::Result<ClientBuilder> {
    let mut builder = Client::builder();

    if let Some(cookie) = &settings.session_cookie {
        let mut value = HeaderValue::from_str(cookie)
            .context("Configured session cookie is not a valid header value")?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, value);
        builder = builder.default_headers(headers);
    }

    if let Some(timeout) = settings.request_timeout() {
        builder = builder.timeout(timeout);
    }

    Ok(builder)
}

async fn read_json(
    res: reqwest::Response,
    method: Method,
    url: &str,
    operation: &'static str,
) -> Result<Value, ApiError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        warn!(%method, url, %status, "request failed");
        return Err(ApiError::RequestFailed { operation });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl DataProductApi for HttpDataProductClient {
    async fn fetch_data_product(
        &self,
        definition: &str,
        params: &Value,
    ) -> Result<Value, ApiError> {
        self.post_data_product(DATA_PRODUCT_PATH, definition, DEFAULT_SOURCE, params).await
    }

    async fn fetch_data_product_with_http_sig(
        &self,
        definition: &str,
        params: &Value,
    ) -> Result<Value, ApiError> {
        self.post_data_product(DATA_PRODUCT_SIG_PATH, definition, &self.http_sig_source, params)
            .await
    }

    async fn get_user(&self) -> Result<UserSession, ApiError> {
        let url = format!("{}/{ME_PATH}", self.base_url);
        debug!(%url, "GET current user");

        let res = self.http.get(&url).send().await?;
        let body = read_json(res, Method::GET, &url, "the current user").await?;

        Ok(serde_json::from_value(body)?)
    }
}
