//! Shared builders and stubs for this crate's tests.

use std::collections::HashMap;

use chrono::Utc;

use vox_core::{
    AssistantId, AssistantRecord, ModelProfile, OrgRole, OrgStatus, Organization, Plan, Principal,
    TranscriberProfile, VoiceProfile,
};

use crate::bootstrap::BootstrapFetch;
use crate::error::SessionError;

pub(crate) fn org(id: &str, role: OrgRole, members: &[&str]) -> Organization {
    Organization {
        id: id.into(),
        name: format!("org {id}"),
        plan: Plan::Trial,
        credits: 10.0,
        usage_cost: 0.0,
        status: OrgStatus::Active,
        role,
        email: None,
        password: None,
        members: members.iter().map(|m| (*m).to_string()).collect(),
        created_at: Utc::now(),
    }
}

pub(crate) fn assistant(id: &str, org_id: Option<&str>) -> AssistantRecord {
    AssistantRecord {
        id: AssistantId::persisted(id),
        name: format!("assistant {id}"),
        model: ModelProfile {
            provider: "openai".into(),
            model: "gpt-4o".into(),
            system_prompt: String::new(),
            temperature: 0.7,
        },
        voice: VoiceProfile {
            provider: "elevenlabs".into(),
            voice_id: "v1".into(),
        },
        transcriber: TranscriberProfile {
            provider: "deepgram".into(),
            language: "en".into(),
        },
        org_id: org_id.map(str::to_string),
        created_at: None,
    }
}

pub(crate) fn principal(id: &str) -> Principal {
    Principal {
        id: id.into(),
        email: format!("{id}@example.com"),
    }
}

/// Canned bootstrap inputs.
pub(crate) struct StubFetch {
    pub accessible: Result<Vec<Organization>, ()>,
    pub all: Vec<Organization>,
    pub external: Vec<AssistantRecord>,
    pub mappings: HashMap<String, String>,
}

impl BootstrapFetch for StubFetch {
    async fn accessible_organizations(&self) -> Result<Vec<Organization>, SessionError> {
        self.accessible.clone().map_err(|()| {
            SessionError::Directory(vox_directory::DirectoryError::ApiError(
                "list organizations: HTTP 500".into(),
            ))
        })
    }

    async fn all_organizations(&self) -> Result<Vec<Organization>, SessionError> {
        Ok(self.all.clone())
    }

    async fn external_assistants(&self) -> Result<Vec<AssistantRecord>, SessionError> {
        Ok(self.external.clone())
    }

    async fn assistant_mappings(&self) -> Result<HashMap<String, String>, SessionError> {
        Ok(self.mappings.clone())
    }
}
