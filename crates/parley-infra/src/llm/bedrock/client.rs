//! BedrockClient -- concrete [`LlmProvider`] implementation for AWS Bedrock.
//!
//! Sends non-streaming `invoke` requests to the Bedrock Runtime API using
//! Bearer token authentication. Request shaping and reply parsing come from
//! `parley_core::llm::payload`; when the endpoint rejects a ref demanding
//! an inference profile, the client retries exactly once with a derived
//! profile id (`parley_core::llm::routing`).
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::payload::{build_invoke_body, parse_reply, InvokeBody};
use parley_core::llm::provider::LlmProvider;
use parley_core::llm::routing::{derive_profile_ref, is_routing_profile_error};
use parley_types::llm::{LlmError, Turn};

/// AWS Bedrock Runtime client.
///
/// One HTTP invocation per chat turn. The api key is only exposed when
/// constructing request headers.
pub struct BedrockClient {
    client: reqwest::Client,
    api_key: SecretString,
    region: String,
}

// BedrockClient intentionally does NOT derive Debug to prevent accidental
// exposure of the api key.

impl BedrockClient {
    pub fn new(api_key: SecretString, region: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            region,
        })
    }

    /// Build the Bedrock Runtime invoke URL for a model ref.
    fn url(&self, model_ref: &str) -> String {
        format!(
            "https://bedrock-runtime.{}.amazonaws.com/model/{}/invoke",
            self.region, model_ref
        )
    }

    /// Send one invoke request and return the raw JSON response body.
    async fn invoke_once(
        &self,
        model_ref: &str,
        body: &InvokeBody,
    ) -> Result<serde_json::Value, LlmError> {
        let url = self.url(model_ref);

        tracing::debug!(url = %url, model_ref = %model_ref, "Bedrock invoke request");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, model_ref = %model_ref, "Bedrock API error response");
            return Err(LlmError::Provider {
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))
    }
}

impl LlmProvider for BedrockClient {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn invoke(&self, model_ref: &str, turns: &[Turn]) -> Result<String, LlmError> {
        let body = build_invoke_body(model_ref, turns);

        match self.invoke_once(model_ref, &body).await {
            Ok(value) => parse_reply(model_ref, &value),
            Err(LlmError::Provider { message }) if is_routing_profile_error(&message) => {
                let Some(profile_ref) = derive_profile_ref(model_ref) else {
                    return Err(LlmError::RoutingProfileRequired {
                        model_ref: model_ref.to_string(),
                    });
                };

                tracing::info!(
                    model_ref = %model_ref,
                    profile_ref = %profile_ref,
                    "retrying with derived inference profile"
                );

                match self.invoke_once(&profile_ref, &body).await {
                    // Reply shape follows the original ref's family, not
                    // the profile id.
                    Ok(value) => parse_reply(model_ref, &value),
                    Err(LlmError::Provider { message }) if is_routing_profile_error(&message) => {
                        Err(LlmError::RoutingProfileRequired {
                            model_ref: model_ref.to_string(),
                        })
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}
