use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::config::{AppConfig, REQUEST_TIMEOUT};
use crate::engine::error::GatewayError;
use crate::model::message::{to_wire_role, Message, WireMessage};

/* =========================
   Wire types
   ========================= */

#[derive(Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [WireMessage],
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Legacy single-prompt request. Note `max_new_tokens`, not `max_tokens`.
#[derive(Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: String,
    pub temperature: f64,
    pub max_new_tokens: u32,
}

#[derive(Deserialize, Default)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Default)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/* =========================
   Transport
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POSTs a JSON body and hands back status and raw body.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpReply, GatewayError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        // The builder only fails if the TLS backend cannot start. The blocking
        // default client still carries a 30 s timeout in that case.
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpReply, GatewayError> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| GatewayError::transport(url, e))?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| GatewayError::transport(url, e))?;

        Ok(HttpReply { status, body })
    }
}

/* =========================
   Gateway contract
   ========================= */

/// A bare prompt or a full message sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmInput {
    Prompt(String),
    Messages(Vec<Message>),
}

impl LlmInput {
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            LlmInput::Prompt(text) => vec![Message::user(text)],
            LlmInput::Messages(messages) => messages,
        }
    }
}

impl From<&str> for LlmInput {
    fn from(prompt: &str) -> Self {
        LlmInput::Prompt(prompt.to_string())
    }
}

impl From<String> for LlmInput {
    fn from(prompt: String) -> Self {
        LlmInput::Prompt(prompt)
    }
}

impl From<Vec<Message>> for LlmInput {
    fn from(messages: Vec<Message>) -> Self {
        LlmInput::Messages(messages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl GenerationOptions {
    /// Shorter budget for chat turns.
    pub fn conversational() -> Self {
        Self::default().with_max_tokens(400)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Anything that turns messages into generated text.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator: Send + Sync {
    fn generate(&self, input: LlmInput, options: GenerationOptions) -> Result<String, GatewayError>;
}

/* =========================
   Gateway
   ========================= */

/// Client for an OpenAI-style chat endpoint with a legacy completions fallback.
pub struct LlmGateway {
    transport: Box<dyn HttpTransport>,
    base_url: String,
    model: String,
}

impl LlmGateway {
    pub fn new(transport: Box<dyn HttpTransport>, base_url: &str, model: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(ReqwestTransport::new(REQUEST_TIMEOUT)),
            &config.api_base,
            &config.model,
        )
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url)
    }

    fn post<T: Serialize>(&self, url: &str, payload: &T) -> Result<HttpReply, GatewayError> {
        let body =
            serde_json::to_value(payload).map_err(|e| GatewayError::invalid_response(url, e))?;
        self.transport.post_json(url, &body)
    }
}

impl TextGenerator for LlmGateway {
    fn generate(&self, input: LlmInput, options: GenerationOptions) -> Result<String, GatewayError> {
        let messages = sanitize(&input.into_messages());

        let chat_url = self.chat_url();
        tracing::debug!(
            url = %chat_url,
            messages = messages.len(),
            max_tokens = options.max_tokens,
            "sending chat completion"
        );

        let reply = self.post(
            &chat_url,
            &ChatCompletionRequest {
                model: &self.model,
                messages: &messages,
                temperature: options.temperature,
                max_tokens: options.max_tokens,
            },
        )?;

        if reply.is_success() {
            return extract_text(&chat_url, &reply.body, FieldOrder::MessageFirst);
        }

        let url = self.completions_url();
        tracing::warn!(
            status = reply.status,
            fallback = %url,
            "chat endpoint refused request, falling back to completions"
        );

        let reply = self.post(
            &url,
            &CompletionRequest {
                model: &self.model,
                prompt: join_for_completion(&messages),
                temperature: options.temperature,
                max_new_tokens: options.max_tokens,
            },
        )?;

        if !reply.is_success() {
            return Err(GatewayError::Status {
                url,
                status: reply.status,
                body: reply.body,
            });
        }

        extract_text(&url, &reply.body, FieldOrder::TextFirst)
    }
}

/// Flatten every non-wire role into user text prefixed with `SYSTEM: `.
pub fn sanitize(messages: &[Message]) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|m| {
            let content = if m.role.is_wire_valid() {
                m.content.clone()
            } else {
                format!("SYSTEM: {}", m.content)
            };
            WireMessage {
                role: to_wire_role(m.role),
                content,
            }
        })
        .collect()
}

/// Re-serialise messages as one prompt: `"{ROLE}:\n{content}\n"` per message.
pub fn join_for_completion(messages: &[WireMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}:\n{}\n", m.role.as_str().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Copy)]
enum FieldOrder {
    MessageFirst,
    TextFirst,
}

fn extract_text(url: &str, body: &str, order: FieldOrder) -> Result<String, GatewayError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::invalid_response(url, e))?;

    let choice = parsed.choices.into_iter().next().unwrap_or_default();
    let from_message = choice
        .message
        .and_then(|m| m.content)
        .filter(|s| !s.is_empty());
    let from_text = choice.text.filter(|s| !s.is_empty());

    let text = match order {
        FieldOrder::MessageFirst => from_message.or(from_text),
        FieldOrder::TextFirst => from_text.or(from_message),
    };

    match text {
        Some(t) => Ok(t.trim().to_string()),
        None => {
            tracing::warn!(url, "completion contained no text");
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::Speaker;
    use mockall::Sequence;
    use serde_json::json;

    fn gateway(transport: MockHttpTransport) -> LlmGateway {
        LlmGateway::new(Box::new(transport), "http://llm.local/v1/", "test-model")
    }

    fn ok(body: serde_json::Value) -> Result<HttpReply, GatewayError> {
        Ok(HttpReply {
            status: 200,
            body: body.to_string(),
        })
    }

    #[test]
    fn sanitize_flattens_non_wire_roles() {
        let wire = sanitize(&[
            Message::system("Stay in character."),
            Message::user("Hi"),
            Message::assistant("Hail!"),
            Message::new(Speaker::Npc1, "I am first."),
        ]);

        assert_eq!(wire[0].role.as_str(), "user");
        assert_eq!(wire[0].content, "SYSTEM: Stay in character.");
        assert_eq!(wire[1].content, "Hi");
        assert_eq!(wire[2].role.as_str(), "assistant");
        assert_eq!(wire[3].content, "SYSTEM: I am first.");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize(&[
            Message::system("rules"),
            Message::context("tavern"),
            Message::assistant("hello"),
        ]);
        let back: Vec<Message> = once.iter().cloned().map(Message::from).collect();
        assert_eq!(sanitize(&back), once);
    }

    #[test]
    fn bare_prompt_becomes_single_user_message() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_post_json()
            .withf(|url, body| {
                url == "http://llm.local/v1/chat/completions"
                    && body["messages"] == json!([{"role": "user", "content": "Who rules?"}])
                    && body["model"] == "test-model"
                    && body["max_tokens"] == 1000
                    && body["temperature"] == 0.7
            })
            .times(1)
            .returning(|_, _| ok(json!({"choices": [{"message": {"content": "  The Queen.\n"}}]})));

        let text = gateway(transport)
            .generate("Who rules?".into(), GenerationOptions::default())
            .unwrap();
        assert_eq!(text, "The Queen.");
    }

    #[test]
    fn chat_reply_falls_back_to_text_field() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_post_json()
            .returning(|_, _| ok(json!({"choices": [{"text": "plain"}]})));

        let text = gateway(transport)
            .generate("x".into(), GenerationOptions::default())
            .unwrap();
        assert_eq!(text, "plain");
    }

    #[test]
    fn non_success_chat_issues_exactly_one_completion_request() {
        let messages = vec![
            Message::system("You are Thorn."),
            Message::user("Hello"),
            Message::assistant("Hmph."),
        ];
        let expected_prompt = "USER:\nSYSTEM: You are Thorn.\n\nUSER:\nHello\n\nASSISTANT:\nHmph.\n";

        let mut seq = Sequence::new();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_post_json()
            .withf(|url, _| url == "http://llm.local/v1/chat/completions")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(HttpReply {
                    status: 404,
                    body: "not found".into(),
                })
            });
        transport
            .expect_post_json()
            .withf(move |url, body| {
                url == "http://llm.local/v1/completions"
                    && body["prompt"] == expected_prompt
                    && body["max_new_tokens"] == 400
                    && body.get("max_tokens").is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ok(json!({"choices": [{"text": " Begone. "}]})));

        let text = gateway(transport)
            .generate(messages.into(), GenerationOptions::conversational())
            .unwrap();
        assert_eq!(text, "Begone.");
    }

    #[test]
    fn failing_fallback_is_an_error() {
        let mut transport = MockHttpTransport::new();
        transport.expect_post_json().times(2).returning(|_, _| {
            Ok(HttpReply {
                status: 500,
                body: "boom".into(),
            })
        });

        let err = gateway(transport)
            .generate("x".into(), GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500, .. }));
    }

    #[test]
    fn transport_failure_is_not_retried() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_post_json()
            .times(1)
            .returning(|url, _| Err(GatewayError::transport(url, "operation timed out")));

        let err = gateway(transport)
            .generate("x".into(), GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport { .. }));
    }

    #[test]
    fn empty_choices_yield_empty_text() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_post_json()
            .returning(|_, _| ok(json!({"choices": []})));

        let text = gateway(transport)
            .generate("x".into(), GenerationOptions::default())
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn join_uses_uppercase_role_headers() {
        let wire = sanitize(&[Message::user("a"), Message::assistant("b")]);
        assert_eq!(join_for_completion(&wire), "USER:\na\n\nASSISTANT:\nb\n");
    }
}
