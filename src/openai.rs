use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Custom error types for chat-completions API interactions
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("Servers are currently busy. Please try again in a few moments.")]
    ServerBusy,

    #[error("Network connection failed: {message}")]
    NetworkError { message: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl OpenAiError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            OpenAiError::ServerBusy => {
                "🚫 The model servers are currently busy. Please try again in a few moments."
                    .to_string()
            }
            OpenAiError::NetworkError { .. } => {
                "🌐 Network connection failed. Please check your internet connection and try again."
                    .to_string()
            }
            OpenAiError::Timeout { seconds } => {
                format!(
                    "⏰ Request timed out after {} seconds. The server might be overloaded.",
                    seconds
                )
            }
            OpenAiError::ApiError { status, .. } => match *status {
                429 => {
                    "🚫 Rate limit exceeded. Please wait a moment before trying again.".to_string()
                }
                503 => "🚫 Service temporarily unavailable. Please try again later.".to_string(),
                502 | 504 => {
                    "🚫 Server gateway error. Please try again in a few moments.".to_string()
                }
                _ => format!("❌ API error ({}). Please try again later.", status),
            },
            OpenAiError::ParseError { .. } => {
                "⚠️ Failed to parse server response. Please try again.".to_string()
            }
            OpenAiError::ConfigError { message } => {
                format!("⚙️ Configuration error: {}", message)
            }
        }
    }
}

/// API request/response structures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Completion payload body. Exactly three shapes exist on the wire: a plain
/// string, a list of structured content parts, or an absent body (the
/// `Option` around this enum).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One entry of a structured content list. Only parts tagged `text`
/// contribute to the extracted text.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Pull the completion text out of a message body. Total over all three
/// payload shapes and never fails: a plain string is returned as-is, a parts
/// list concatenates its `text` parts in order, an absent body is empty.
pub fn extract_text(content: Option<&MessageContent>) -> String {
    match content {
        None => String::new(),
        Some(MessageContent::Text(text)) => text.trim().to_string(),
        Some(MessageContent::Parts(parts)) => {
            let mut combined = String::new();
            for part in parts {
                if let ContentPart::Text { text } = part {
                    combined.push_str(text);
                }
            }
            combined.trim().to_string()
        }
    }
}

/// Chat-completions API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: Config,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self, OpenAiError> {
        config.validate().map_err(|e| OpenAiError::ConfigError {
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent("supermarket_agents/0.1.0")
            .build()
            .map_err(|e| OpenAiError::ConfigError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Send chat messages and return the assistant content as plain text.
    pub async fn send_messages_raw(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<String, OpenAiError> {
        self.send(messages, None).await
    }

    /// Send chat messages requesting a JSON object response, to encourage
    /// strict JSON outputs the caller can deserialize.
    pub async fn send_messages_json(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<String, OpenAiError> {
        self.send(
            messages,
            Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        )
        .await
    }

    async fn send(
        &self,
        messages: Vec<ChatMessage>,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            OpenAiError::ParseError {
                message: format!("Failed to parse API response: {}", e),
            }
        })?;

        let first_choice = api_response
            .choices
            .first()
            .ok_or_else(|| OpenAiError::ParseError {
                message: "No choices in API response".to_string(),
            })?;

        Ok(extract_text(
            first_choice
                .message
                .as_ref()
                .and_then(|message| message.content.as_ref()),
        ))
    }

    /// Map reqwest errors to our custom error types
    fn map_reqwest_error(&self, error: reqwest::Error) -> OpenAiError {
        if error.is_timeout() {
            return OpenAiError::Timeout {
                seconds: self.config.timeout,
            };
        }

        if error.is_connect() {
            return OpenAiError::NetworkError {
                message: "Failed to connect to server".to_string(),
            };
        }

        if error.is_request() {
            return OpenAiError::NetworkError {
                message: "Request failed".to_string(),
            };
        }

        OpenAiError::NetworkError {
            message: format!("Request error: {}", error),
        }
    }

    /// Handle error responses from the server
    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> OpenAiError {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match status {
            StatusCode::TOO_MANY_REQUESTS => OpenAiError::ServerBusy,
            StatusCode::SERVICE_UNAVAILABLE => OpenAiError::ServerBusy,
            StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => OpenAiError::ServerBusy,
            _ => OpenAiError::ApiError {
                status: status.as_u16(),
                message: error_text,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parse_content(raw: serde_json::Value) -> Option<MessageContent> {
        serde_json::from_value::<AssistantMessage>(raw)
            .expect("message should deserialize")
            .content
    }

    #[test]
    fn extract_text_handles_plain_string_body() {
        let content = parse_content(json!({"content": "  hello deals  "}));
        assert_eq!(extract_text(content.as_ref()), "hello deals");
    }

    #[test]
    fn extract_text_concatenates_only_text_parts_in_order() {
        let content = parse_content(json!({
            "content": [
                {"type": "text", "text": "SELECT "},
                {"type": "image_url", "image_url": {"url": "ignored"}},
                {"type": "text", "text": "1;"}
            ]
        }));
        assert_eq!(extract_text(content.as_ref()), "SELECT 1;");
    }

    #[test]
    fn extract_text_normalizes_absent_body_to_empty() {
        let content = parse_content(json!({"content": null}));
        assert_eq!(extract_text(content.as_ref()), "");
        assert_eq!(extract_text(None), "");
    }

    fn user_message(content: &str) -> Vec<ChatMessage> {
        vec![ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }]
    }

    #[tokio::test]
    async fn send_messages_raw_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "SELECT 1;"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(Config::for_tests(server.uri())).unwrap();
        let reply = client.send_messages_raw(user_message("sql please")).await;
        assert_eq!(reply.unwrap(), "SELECT 1;");
    }

    #[tokio::test]
    async fn send_handles_structured_content_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": [
                    {"type": "text", "text": "part one "},
                    {"type": "text", "text": "part two"}
                ]}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(Config::for_tests(server.uri())).unwrap();
        let reply = client.send_messages_raw(user_message("hi")).await;
        assert_eq!(reply.unwrap(), "part one part two");
    }

    #[tokio::test]
    async fn rate_limited_responses_map_to_server_busy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(Config::for_tests(server.uri())).unwrap();
        let err = client
            .send_messages_raw(user_message("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAiError::ServerBusy));
    }

    #[tokio::test]
    async fn empty_choices_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(Config::for_tests(server.uri())).unwrap();
        let err = client
            .send_messages_raw(user_message("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAiError::ParseError { .. }));
    }
}
