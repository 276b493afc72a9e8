use crate::{ApiError, Settings, UserSession, api::http::HttpDataProductClient};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod http;

/// Source used for every data product requested over the session path.
pub const DEFAULT_SOURCE: &str = "ioxio";

/// The backend endpoints a view container talks to.
///
/// Each call issues exactly one request: no retries, no caching.
#[async_trait]
pub trait DataProductApi: Send + Sync + Debug {
    /// `POST /api/data-product/{definition}?source=ioxio`, authenticated by
    /// the login session (if any).
    async fn fetch_data_product(&self, definition: &str, params: &Value)
    -> Result<Value, ApiError>;

    /// `POST /api/data-product-sig/{definition}?source={configured}`. The
    /// backend signs the forwarded request with HTTP Message Signatures.
    async fn fetch_data_product_with_http_sig(
        &self,
        definition: &str,
        params: &Value,
    ) -> Result<Value, ApiError>;

    /// `GET /api/me`.
    async fn get_user(&self) -> Result<UserSession, ApiError>;
}

/// Browser-navigation endpoint that starts the login flow.
pub fn login_url(settings: &Settings) -> String {
    format!("{}/api/login", settings.api_origin())
}

/// Browser-navigation endpoint that ends the session.
pub fn logout_url(settings: &Settings) -> String {
    format!("{}/api/logout", settings.api_origin())
}

/// Construct the HTTP client from settings.
pub fn client_from_settings(settings: &Settings) -> anyhow::Result<Box<dyn DataProductApi>> {
    Ok(Box::new(HttpDataProductClient::from_settings(settings)?))
}
