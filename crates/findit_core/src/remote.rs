//! Remote parsing fallback - tiered free/paid model escalation
//!
//! When heuristics cannot split a transcript, the raw text goes to an
//! OpenAI-compatible chat endpoint with an instruction to answer in compact
//! JSON. The free-tier model is best effort; rate limiting or a transport
//! failure escalates exactly once to the paid model with the identical
//! prompt. A reply that carries no parsable JSON is a contract violation and
//! is never escalated. Successful parses are memoized in [`ParseCache`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::ParseCache;
use crate::config::RemoteConfig;
use crate::error::RemoteParseError;
use crate::types::{Intent, RemoteParse};

/// A chat completion backend: one prompt in, the model's raw text out.
///
/// The HTTP implementation is [`OpenRouterBackend`]; tests substitute
/// call-counting fakes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, RemoteParseError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

/// HTTP backend against an OpenAI-compatible chat completions endpoint
pub struct OpenRouterBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenRouterBackend {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenRouterBackend {
    async fn complete(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, RemoteParseError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 100,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("X-Title", "FindIt")
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteParseError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(RemoteParseError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteParseError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| RemoteParseError::Transport(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RemoteParseError::Transport("empty choices in response".to_string()))?;

        debug!("[<] model reply ({} chars)", content.len());
        Ok(content)
    }
}

/// Remote parser with free-to-paid tier escalation
pub struct RemoteParser {
    backend: Box<dyn ChatBackend>,
    config: RemoteConfig,
}

impl RemoteParser {
    /// Build against the real HTTP backend described by `config`
    pub fn new(config: RemoteConfig) -> Self {
        let backend = OpenRouterBackend::new(config.endpoint.clone(), config.timeout_secs);
        Self {
            backend: Box::new(backend),
            config,
        }
    }

    /// Build with an injected backend (tests)
    pub fn with_backend(backend: Box<dyn ChatBackend>, config: RemoteConfig) -> Self {
        Self { backend, config }
    }

    /// Whether the remote stage can run at all
    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Parse `raw_text` (pre-correction) into the intent-appropriate payload.
    ///
    /// Cache hits return without any network traffic. Escalation to the paid
    /// model happens at most once per call: the single `match` below is the
    /// whole tier chain.
    pub async fn parse_intent(
        &self,
        cache: &mut ParseCache,
        raw_text: &str,
        intent: Intent,
    ) -> Result<RemoteParse, RemoteParseError> {
        let key = ParseCache::key(intent, raw_text);
        if let Some(hit) = cache.get(&key) {
            debug!("Parse cache hit for {:?}", key);
            return Ok(hit.clone());
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RemoteParseError::NoCredential)?;

        let prompt = build_prompt(raw_text, intent);
        debug!("[>] {} model: {}", intent.as_str(), self.config.free_model);

        let reply = match self
            .backend
            .complete(&self.config.free_model, api_key, &prompt)
            .await
        {
            Ok(reply) => reply,
            Err(RemoteParseError::RateLimited) => {
                info!(
                    "Free tier rate limited, escalating to {}",
                    self.config.paid_model
                );
                self.backend
                    .complete(&self.config.paid_model, api_key, &prompt)
                    .await?
            }
            Err(RemoteParseError::Transport(e)) => {
                warn!(
                    "Free tier failed ({}), escalating to {}",
                    e, self.config.paid_model
                );
                self.backend
                    .complete(&self.config.paid_model, api_key, &prompt)
                    .await?
            }
            Err(RemoteParseError::Http { status, body }) => {
                warn!(
                    "Free tier returned {} ({}), escalating to {}",
                    status, body, self.config.paid_model
                );
                self.backend
                    .complete(&self.config.paid_model, api_key, &prompt)
                    .await?
            }
            Err(e) => return Err(e),
        };

        let parse = payload_from_reply(&reply, intent)?;
        cache.put(key, parse.clone());
        Ok(parse)
    }
}

/// Single-instruction prompt asking for a compact JSON object only
fn build_prompt(text: &str, intent: Intent) -> String {
    match intent {
        Intent::Log => format!(
            "Parse this into item and location. User said: \"{}\". \
             Respond ONLY with JSON: {{\"item\":\"...\",\"location\":\"...\"}}",
            text
        ),
        Intent::Find => format!(
            "Extract what the user is looking for. User said: \"{}\". \
             Respond ONLY with JSON: {{\"search\":\"...\"}}",
            text
        ),
    }
}

/// First brace-delimited object substring of `text`, if any.
///
/// The expected payloads are flat, so this scans to the first closing brace
/// rather than balancing nesting.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text[start..].find('}')? + start;
    Some(&text[start..=end])
}

/// Extract and validate the payload for `intent` from a free-form reply
fn payload_from_reply(reply: &str, intent: Intent) -> Result<RemoteParse, RemoteParseError> {
    let object = extract_json_object(reply).ok_or(RemoteParseError::InvalidModelResponse)?;
    let parse: RemoteParse =
        serde_json::from_str(object).map_err(|_| RemoteParseError::InvalidModelResponse)?;

    match (&parse, intent) {
        (RemoteParse::Log { item, location }, Intent::Log)
            if !item.trim().is_empty() && !location.trim().is_empty() =>
        {
            Ok(parse)
        }
        (RemoteParse::Find { search }, Intent::Find) if !search.trim().is_empty() => Ok(parse),
        _ => Err(RemoteParseError::InvalidModelResponse),
    }
}
