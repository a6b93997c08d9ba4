//! Mobile-client flavored API surface.

use async_trait::async_trait;
use serde_json::Value;

use super::{headers, ProfileStrategy};
use crate::client::{RequestExecutor, RequestSpec};
use crate::error::StrategyError;

/// The mobile host's profile-info endpoint, addressed with the mobile
/// client signature.
pub struct MobileApi;

#[async_trait]
impl ProfileStrategy for MobileApi {
    fn name(&self) -> &'static str {
        "mobile-api"
    }

    async fn attempt(
        &self,
        handle: &str,
        executor: &mut RequestExecutor,
    ) -> Result<Value, StrategyError> {
        let spec = RequestSpec {
            url: "https://i.instagram.com/api/v1/users/web_profile_info/".to_string(),
            headers: headers::mobile(),
            query: vec![("username".to_string(), urlencoding::encode(handle).into_owned())],
            user_agent: Some(headers::MOBILE_AGENT.to_string()),
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
