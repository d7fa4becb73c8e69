use reqwest::Response;
use serde::{Deserialize, Serialize};

use super::error::GenerationError;

pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

pub fn build_request(model: &str, system: &str, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: system.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            },
        ],
    }
}

pub async fn parse_response(response: Response) -> Result<String, GenerationError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GenerationError::from_status(status.as_u16(), body));
    }

    let completion: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response did not contain any choices".into())
        })?;

    choice
        .message
        .and_then(|msg| msg.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response missing message content".into())
        })
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}
