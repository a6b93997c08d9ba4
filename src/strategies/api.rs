//! Direct public data endpoint, addressed by handle.

use async_trait::async_trait;
use serde_json::Value;

use super::{headers, ProfileStrategy};
use crate::client::{RequestExecutor, RequestSpec};
use crate::error::StrategyError;

/// The `?__a=1` JSON endpoint. Cheapest surface and first in the cascade.
pub struct ApiEndpoint;

#[async_trait]
impl ProfileStrategy for ApiEndpoint {
    fn name(&self) -> &'static str {
        "api-endpoint"
    }

    async fn attempt(
        &self,
        handle: &str,
        executor: &mut RequestExecutor,
    ) -> Result<Value, StrategyError> {
        let spec = RequestSpec {
            url: format!("https://www.instagram.com/{handle}/"),
            headers: headers::json("https://www.instagram.com/"),
            query: vec![
                ("__a".to_string(), "1".to_string()),
                ("__d".to_string(), "dis".to_string()),
            ],
            user_agent: None,
        };

        let response = executor.execute(&spec).await?;
        serde_json::from_str(&response.body)
            .map_err(|error| StrategyError::Parse(error.to_string()))
    }
}
