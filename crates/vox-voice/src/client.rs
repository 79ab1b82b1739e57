//! Voice platform REST client.
//!
//! Bearer-key authenticated calls against the platform's `/assistant` and
//! `/call` endpoints. The platform's error bodies carry a `message` or
//! `error` JSON field (or plain text); the most specific one is surfaced.
//! 401 and 404 map to their own variants because callers treat them
//! differently from generic failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vox_config::VoicePlatformConfig;
use vox_core::{AssistantId, AssistantRecord, CallRecord, ModelProfile, TranscriberProfile, VoiceProfile};

use crate::error::VoiceError;

/// Greeting every newly created assistant starts a call with.
pub const DEFAULT_FIRST_MESSAGE: &str = "Hello! How can I help you today?";

/// Server-side events every assistant subscribes to.
pub const DEFAULT_SERVER_MESSAGES: &[&str] =
    &["end-of-call-report", "status-update", "hang", "function-call"];

#[derive(Debug, Clone)]
pub struct VoiceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Assistant shape accepted by create/update calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSpec {
    pub name: String,
    pub model: WireModel,
    pub voice: WireVoice,
    pub transcriber: WireTranscriber,
    pub first_message: String,
    pub server_messages: Vec<String>,
}

impl AssistantSpec {
    /// Build the wire shape from a local record, with the platform's fixed
    /// defaults for first-message and event subscriptions.
    #[must_use]
    pub fn from_record(record: &AssistantRecord) -> Self {
        Self {
            name: record.name.clone(),
            model: WireModel {
                provider: record.model.provider.clone(),
                model: record.model.model.clone(),
                messages: vec![WireMessage {
                    role: "system".into(),
                    content: record.model.system_prompt.clone(),
                }],
                temperature: record.model.temperature,
            },
            voice: WireVoice {
                provider: record.voice.provider.clone(),
                voice_id: record.voice.voice_id.clone(),
            },
            transcriber: WireTranscriber {
                provider: record.transcriber.provider.clone(),
                language: record.transcriber.language.clone(),
            },
            first_message: DEFAULT_FIRST_MESSAGE.to_string(),
            server_messages: DEFAULT_SERVER_MESSAGES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireModel {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVoice {
    pub provider: String,
    pub voice_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTranscriber {
    pub provider: String,
    pub language: String,
}

/// Assistant record as the platform returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAssistant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub model: Option<WireModel>,
    pub voice: Option<WireVoice>,
    pub transcriber: Option<WireTranscriber>,
    /// The platform's own ownership tag. Meaningless for console tenancy —
    /// the local mapping table supersedes it whenever an entry exists.
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RemoteAssistant {
    /// Convert into the console's record type. The system prompt is the
    /// first system message, when one exists.
    #[must_use]
    pub fn into_record(self) -> AssistantRecord {
        let model = self.model.unwrap_or(WireModel {
            provider: String::new(),
            model: String::new(),
            messages: Vec::new(),
            temperature: 0.0,
        });
        let system_prompt = model
            .messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.clone())
            .unwrap_or_default();

        AssistantRecord {
            id: AssistantId::persisted(self.id),
            name: self.name,
            model: ModelProfile {
                provider: model.provider,
                model: model.model,
                system_prompt,
                temperature: model.temperature,
            },
            voice: self.voice.map_or_else(
                || VoiceProfile {
                    provider: String::new(),
                    voice_id: String::new(),
                },
                |v| VoiceProfile {
                    provider: v.provider,
                    voice_id: v.voice_id,
                },
            ),
            transcriber: self.transcriber.map_or_else(
                || TranscriberProfile {
                    provider: String::new(),
                    language: String::new(),
                },
                |t| TranscriberProfile {
                    provider: t.provider,
                    language: t.language,
                },
            ),
            org_id: self.org_id,
            created_at: self.created_at,
        }
    }
}

impl VoiceClient {
    /// Build a client from config, failing fast on a missing API key.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` when the section is incomplete.
    pub fn new(config: &VoicePlatformConfig) -> Result<Self, VoiceError> {
        config.require()?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// A sibling client with a different API key — used for the single
    /// retry after an unauthorized response.
    #[must_use]
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: api_key.into(),
        }
    }

    /// Fetch the platform's full (globally namespaced) assistant list.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` per the crate's error contract.
    pub async fn list_assistants(&self) -> Result<Vec<RemoteAssistant>, VoiceError> {
        let url = format!("{}/assistant", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("list assistants: {e}")))?;
        let resp = check_status(resp, "list assistants").await?;
        resp.json()
            .await
            .map_err(|e| VoiceError::ApiError(format!("parse assistants: {e}")))
    }

    /// Create an assistant.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` per the crate's error contract.
    pub async fn create_assistant(&self, spec: &AssistantSpec) -> Result<RemoteAssistant, VoiceError> {
        let url = format!("{}/assistant", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(spec)
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("create assistant: {e}")))?;
        let resp = check_status(resp, "create assistant").await?;
        resp.json()
            .await
            .map_err(|e| VoiceError::ApiError(format!("parse created assistant: {e}")))
    }

    /// Update an assistant in place (PATCH by id, same shape as create).
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` per the crate's error contract.
    pub async fn update_assistant(
        &self,
        id: &str,
        spec: &AssistantSpec,
    ) -> Result<RemoteAssistant, VoiceError> {
        let url = format!("{}/assistant/{id}", self.base_url);
        let resp = self
            .http
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(spec)
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("update assistant: {e}")))?;
        let resp = check_status(resp, "update assistant").await?;
        resp.json()
            .await
            .map_err(|e| VoiceError::ApiError(format!("parse updated assistant: {e}")))
    }

    /// Rename an assistant without touching the rest of its config.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` per the crate's error contract.
    pub async fn rename_assistant(&self, id: &str, name: &str) -> Result<(), VoiceError> {
        let url = format!("{}/assistant/{id}", self.base_url);
        let resp = self
            .http
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({"name": name}))
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("rename assistant: {e}")))?;
        check_status(resp, "rename assistant").await?;
        Ok(())
    }

    /// Delete an assistant by id.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::NotFound` on 404 (callers treat it as already
    /// gone), `VoiceError` otherwise per the crate's error contract.
    pub async fn delete_assistant(&self, id: &str) -> Result<(), VoiceError> {
        let url = format!("{}/assistant/{id}", self.base_url);
        let resp = self
            .http
            .delete(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("delete assistant: {e}")))?;
        check_status(resp, "delete assistant").await?;
        Ok(())
    }

    /// Fetch the call log, newest first.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` per the crate's error contract.
    pub async fn list_calls(&self, limit: u32) -> Result<Vec<CallRecord>, VoiceError> {
        let url = format!("{}/call?limit={limit}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("list calls: {e}")))?;
        let resp = check_status(resp, "list calls").await?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct WireCall {
            id: String,
            assistant_id: Option<String>,
            #[serde(default)]
            status: String,
            #[serde(default)]
            duration: f64,
            #[serde(default)]
            cost: f64,
            started_at: Option<DateTime<Utc>>,
            #[serde(default)]
            summary: Option<String>,
        }

        let calls: Vec<WireCall> = resp
            .json()
            .await
            .map_err(|e| VoiceError::ApiError(format!("parse calls: {e}")))?;
        Ok(calls
            .into_iter()
            .map(|c| CallRecord {
                id: c.id,
                assistant_id: c.assistant_id,
                status: c.status,
                duration: c.duration,
                cost: c.cost,
                started_at: c.started_at,
                summary: c.summary,
            })
            .collect())
    }
}

/// Map a non-2xx response to the crate's error taxonomy, surfacing the most
/// specific message the platform provided.
async fn check_status(resp: reqwest::Response, context: &str) -> Result<reqwest::Response, VoiceError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = format!("{context}: HTTP {status}: {}", extract_error_message(&body));
    tracing::debug!(%status, context, "voice API call failed");

    match status.as_u16() {
        401 => Err(VoiceError::Unauthorized(message)),
        404 => Err(VoiceError::NotFound(message)),
        _ => Err(VoiceError::ApiError(message)),
    }
}

fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(text)) => return text.clone(),
                // Some endpoints return `message` as an array of strings.
                Some(serde_json::Value::Array(items)) => {
                    let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                    if !parts.is_empty() {
                        return parts.join("; ");
                    }
                }
                _ => {}
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_requires_api_key() {
        let result = VoiceClient::new(&VoicePlatformConfig::default());
        assert!(matches!(result, Err(VoiceError::Config(_))));
    }

    #[test]
    fn error_message_handles_string_and_array_shapes() {
        assert_eq!(
            extract_error_message(r#"{"message":"name must be at most 40 characters"}"#),
            "name must be at most 40 characters"
        );
        assert_eq!(
            extract_error_message(r#"{"message":["name too long","voice missing"]}"#),
            "name too long; voice missing"
        );
        assert_eq!(
            extract_error_message(r#"{"error":"Unauthorized"}"#),
            "Unauthorized"
        );
        assert_eq!(extract_error_message("bad gateway"), "bad gateway");
    }

    #[test]
    fn remote_assistant_converts_to_record() {
        let json = serde_json::json!({
            "id": "asst_abc-123",
            "name": "Support Bot - Acme",
            "model": {
                "provider": "openai",
                "model": "gpt-4o",
                "messages": [{"role": "system", "content": "You help customers."}],
                "temperature": 0.7
            },
            "voice": {"provider": "elevenlabs", "voiceId": "v1"},
            "transcriber": {"provider": "deepgram", "language": "en"},
            "orgId": "platform-org"
        });
        let remote: RemoteAssistant = serde_json::from_value(json).unwrap();
        let record = remote.into_record();
        assert_eq!(record.id, AssistantId::persisted("asst_abc-123"));
        assert_eq!(record.model.system_prompt, "You help customers.");
        assert_eq!(record.org_id.as_deref(), Some("platform-org"));
        assert!(record.id.is_remote());
    }

    #[test]
    fn spec_from_record_applies_platform_defaults() {
        let record = AssistantRecord {
            id: AssistantId::new_draft(),
            name: "Support Bot".into(),
            model: ModelProfile {
                provider: "openai".into(),
                model: "gpt-4o".into(),
                system_prompt: "You help customers.".into(),
                temperature: 0.4,
            },
            voice: VoiceProfile {
                provider: "elevenlabs".into(),
                voice_id: "v1".into(),
            },
            transcriber: TranscriberProfile {
                provider: "deepgram".into(),
                language: "en".into(),
            },
            org_id: None,
            created_at: None,
        };
        let spec = AssistantSpec::from_record(&record);
        assert_eq!(spec.first_message, DEFAULT_FIRST_MESSAGE);
        assert_eq!(spec.server_messages.len(), DEFAULT_SERVER_MESSAGES.len());
        assert_eq!(spec.model.messages[0].role, "system");
    }
}
