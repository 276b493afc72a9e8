//! Scripted `DataProductApi` for container tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::{ApiError, DataProductApi, UserSession};

/// Replies with the configured values; `None` answers like a non-2xx response.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub session: Option<UserSession>,
    pub person: Option<Value>,
    pub weather: Option<Value>,
    /// Never resolve any call.
    pub hang: bool,
    pub calls: Mutex<Vec<(&'static str, Value)>>,
}

impl FakeApi {
    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    pub fn last_params(&self) -> Option<Value> {
        self.calls.lock().unwrap().last().map(|(_, params)| params.clone())
    }

    async fn reply<T: Clone>(
        &self,
        call: &'static str,
        params: Value,
        reply: &Option<T>,
        operation: &'static str,
    ) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push((call, params));
        if self.hang {
            std::future::pending::<()>().await;
        }
        reply.clone().ok_or(ApiError::RequestFailed { operation })
    }
}

#[async_trait]
impl DataProductApi for FakeApi {
    async fn fetch_data_product(&self, definition: &str, params: &Value) -> Result<Value, ApiError> {
        assert_eq!(definition, crate::model::PERSON_DEFINITION);
        self.reply("person", params.clone(), &self.person, "a data product").await
    }

    async fn fetch_data_product_with_http_sig(
        &self,
        definition: &str,
        params: &Value,
    ) -> Result<Value, ApiError> {
        assert_eq!(definition, crate::model::WEATHER_DEFINITION);
        self.reply("weather", params.clone(), &self.weather, "a data product").await
    }

    async fn get_user(&self) -> Result<UserSession, ApiError> {
        self.reply("me", Value::Null, &self.session, "the current user").await
    }
}
