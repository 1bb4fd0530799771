use medcheck_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatModel};

/// Chat client for any OpenAI-compatible completions endpoint. The base
/// URL selects the provider; no provider-string parsing happens here.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    base_url: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl ChatModel for OpenAiChat {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, AppError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let req = CompletionRequest {
            model,
            messages,
            stream: false,
        };

        let resp = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(std::time::Duration::from_secs(30))
            .send_json(serde_json::to_value(req).map_err(|e| {
                AppError::new(codes::CHAT_FAILED, "Failed to encode chat request")
                    .with_details(e.to_string())
            })?);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: CompletionResponse = r.into_json().map_err(|e| {
                    AppError::new(codes::CHAT_FAILED, "Failed to decode chat response")
                        .with_details(e.to_string())
                })?;
                let content = v
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .unwrap_or_default();
                if content.trim().is_empty() {
                    return Err(AppError::new(codes::CHAT_FAILED, "Chat response was empty"));
                }
                Ok(content)
            }
            Ok(r) => Err(AppError::new(codes::CHAT_FAILED, "Chat request failed")
                .with_details(format!("status={}", r.status()))),
            Err(e) => Err(AppError::new(codes::CHAT_FAILED, "Failed to call chat endpoint")
                .with_details(e.to_string())
                .with_retryable(true)),
        }
    }
}
