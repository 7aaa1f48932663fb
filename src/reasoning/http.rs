use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::reasoning::{CredentialRef, ReasoningError, ReasoningPort, ReasoningRequest};

/// Non-streaming client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiCompatibleReasoner {
    client: Client,
    endpoint: String,
    model: String,
    credential: CredentialRef,
    request_timeout: Duration,
}

impl OpenAiCompatibleReasoner {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        credential: CredentialRef,
        request_timeout: Duration,
    ) -> Result<Self, ReasoningError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ReasoningError::Transient(format!("http client failed to build: {err}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            credential,
            request_timeout,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReasoningPort for OpenAiCompatibleReasoner {
    async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError> {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_prompt},
            ],
            "stream": false,
            "max_tokens": request.max_output_tokens,
            "temperature": request.temperature,
        });
        if let Some(seed) = request.seed {
            body["seed"] = Value::from(seed);
        }

        let mut builder = self
            .client
            .post(self.completions_url())
            .timeout(self.request_timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", request.request_id.as_str())
            .json(&body);
        if let Some(auth_header) = self.credential.resolve()? {
            builder = builder.header(header::AUTHORIZATION, auth_header);
        }

        let response = builder.send().await.map_err(|err| {
            ReasoningError::Transient(format!("openai-compatible request failed: {err}"))
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::from_status(status, &body));
        }

        let payload: Value = response.json().await.map_err(|err| {
            ReasoningError::Protocol(format!("failed to decode completion payload: {err}"))
        })?;

        extract_message_content(&payload)
    }
}

fn extract_message_content(payload: &Value) -> Result<String, ReasoningError> {
    payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ReasoningError::Protocol("completion payload has no choices[0].message.content".into())
        })
}
