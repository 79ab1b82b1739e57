//! Entity structs for the Voxboard domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{OrgRole, OrgStatus, Plan};
use crate::ids::AssistantId;

/// A tenant account: the unit of billing and assistant ownership.
///
/// An organization whose `id` equals a user's id is **owned** by that user
/// (the equality is load-bearing and relied on throughout role resolution).
/// Other users gain access by appearing in `members` — an invited-into
/// relation, never ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Equal to the owning user's id when self-owned.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plan: Plan,
    /// Remaining credit balance.
    #[serde(default)]
    pub credits: f64,
    /// Accumulated usage cost.
    #[serde(default)]
    pub usage_cost: f64,
    #[serde(default)]
    pub status: OrgStatus,
    /// Privilege of the owning user.
    #[serde(default)]
    pub role: OrgRole,
    #[serde(default)]
    pub email: Option<String>,
    /// Cached reference value used only to pre-fill future invite flows.
    /// Not an authentication credential of record.
    #[serde(default)]
    pub password: Option<String>,
    /// Email addresses invited into this organization, in invite order.
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Whether `principal_id` is this organization's owner.
    #[must_use]
    pub fn is_owned_by(&self, principal_id: &str) -> bool {
        self.id == principal_id
    }

    /// Whether `email` has been invited into this organization.
    #[must_use]
    pub fn has_member(&self, email: &str) -> bool {
        self.members.iter().any(|m| m.eq_ignore_ascii_case(email))
    }
}

/// The authenticated identity, as resolved from the backend session.
///
/// Carries only what role resolution needs; no auth logic lives here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

/// Model configuration for an assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub temperature: f64,
}

/// Voice configuration for an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub provider: String,
    pub voice_id: String,
}

/// Transcriber configuration for an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriberProfile {
    pub provider: String,
    pub language: String,
}

/// One configured voice agent.
///
/// The voice platform has no concept of organizations: `org_id` comes from
/// the local mapping table when one exists, else from whatever tag the
/// platform happens to report (possibly none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantRecord {
    pub id: AssistantId,
    pub name: String,
    pub model: ModelProfile,
    pub voice: VoiceProfile,
    pub transcriber: TranscriberProfile,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AssistantRecord {
    /// A fresh local draft, not yet persisted to the voice platform.
    #[must_use]
    pub fn draft(
        name: impl Into<String>,
        model: ModelProfile,
        voice: VoiceProfile,
        transcriber: TranscriberProfile,
    ) -> Self {
        Self {
            id: AssistantId::new_draft(),
            name: name.into(),
            model,
            voice,
            transcriber,
            org_id: None,
            created_at: None,
        }
    }
}

/// One entry from the voice platform's call log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub assistant_id: Option<String>,
    pub status: String,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub cost: f64,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: Option<String>,
}
