//! Generalized web API surface with desktop headers.

use async_trait::async_trait;
use serde_json::Value;

use super::{headers, ProfileStrategy};
use crate::client::{RequestExecutor, RequestSpec};
use crate::error::StrategyError;

/// The web host's profile-info endpoint with desktop XHR headers. Last in
/// the cascade; same data as the mobile surface behind different
/// gatekeeping.
pub struct WebApi;

#[async_trait]
impl ProfileStrategy for WebApi {
    fn name(&self) -> &'static str {
        "web-api"
    }

    async fn attempt(
        &self,
        handle: &str,
        executor: &mut RequestExecutor,
    ) -> Result<Value, StrategyError> {
        let spec = RequestSpec {
            url: "https://www.instagram.com/api/v1/users/web_profile_info/".to_string(),
            headers: headers::web_api(),
            query: vec![("username".to_string(), urlencoding::encode(handle).into_owned())],
            user_agent: None,
        };

        let response = executor.execute(&spec).await?;
        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|error| StrategyError::Parse(error.to_string()))?;

        if payload.pointer("/data/user").map(Value::is_object) == Some(true) {
            Ok(payload)
        } else {
            Err(StrategyError::MissingUser)
        }
    }
}
