//! Mutating assistant operations.
//!
//! Create, update, delete, and transfer against the voice platform, keeping
//! the local mapping table authoritative for ownership. Every remote call
//! that comes back unauthorized pauses the operation, asks the caller for a
//! fresh API key, and retries exactly once — it is never silently treated
//! as a different outcome.

use thiserror::Error;

use vox_core::naming::{rename_for_transfer, with_org_suffix};
use vox_core::{AssistantRecord, Organization};
use vox_directory::{DirectoryClient, DirectoryError};
use vox_voice::{AssistantSpec, VoiceClient, VoiceError};

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The remote rename succeeded but recording the new ownership failed.
    /// Ownership is now inconsistent between the platform and the mapping
    /// table; the operator needs this exact picture to reconcile manually.
    #[error(
        "assistant {assistant_id} was renamed to {renamed_to:?} but recording its new owner failed: {source}"
    )]
    TransferInconsistent {
        assistant_id: String,
        renamed_to: String,
        #[source]
        source: DirectoryError,
    },
}

impl AssistantError {
    /// Whether this failure is the platform rejecting the API key.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Voice(VoiceError::Unauthorized(_)))
    }
}

/// Supplies a replacement API key when the platform rejects the current one.
pub trait ReauthSource {
    /// A fresh key, or `None` to give up.
    fn fresh_api_key(&self) -> Option<String>;
}

/// How a delete resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Draft or mock record; no remote call was attempted.
    LocalOnly,
    /// Remote delete succeeded, or the platform had already forgotten the
    /// record (404).
    Deleted,
    /// The remote delete failed, but the record must still leave local
    /// state — the console is never left stuck on a record the operator
    /// asked to remove. The message is a non-fatal warning for the caller.
    RemovedWithWarning(String),
}

/// Assistant operations scoped to one voice client + directory session.
pub struct AssistantService<'a> {
    voice: &'a VoiceClient,
    directory: &'a DirectoryClient,
}

impl<'a> AssistantService<'a> {
    #[must_use]
    pub const fn new(voice: &'a VoiceClient, directory: &'a DirectoryClient) -> Self {
        Self { voice, directory }
    }

    /// Persist a draft to the platform under the given organization.
    ///
    /// The display name gains the `" - <org name>"` suffix if it does not
    /// already carry it, and the new assistant is assigned to `org`
    /// regardless of the owner the platform reports back. The ownership
    /// mapping is written immediately, so a create behaves identically to
    /// a post-create transfer-in-place.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` on remote or mapping-store failure.
    pub async fn create(
        &self,
        draft: &AssistantRecord,
        org: &Organization,
        reauth: Option<&dyn ReauthSource>,
    ) -> Result<AssistantRecord, AssistantError> {
        match self.create_with(self.voice, draft, org).await {
            Err(error) if error.is_unauthorized() => {
                let retry = self.retry_client(reauth, &error)?;
                self.create_with(&retry, draft, org).await
            }
            other => other,
        }
    }

    async fn create_with(
        &self,
        voice: &VoiceClient,
        draft: &AssistantRecord,
        org: &Organization,
    ) -> Result<AssistantRecord, AssistantError> {
        let mut named = draft.clone();
        named.name = with_org_suffix(&draft.name, &org.name);

        let remote = voice.create_assistant(&AssistantSpec::from_record(&named)).await?;
        let mut record = remote.into_record();
        record.org_id = Some(org.id.clone());

        self.directory
            .upsert_assistant_mapping(record.id.as_str(), &org.id)
            .await?;
        Ok(record)
    }

    /// Update an assistant in place.
    ///
    /// The platform is not ownership-aware, so the current organization
    /// context is re-applied to the response. Drafts and mocks are
    /// local-only: they are returned updated without any remote call.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` on remote failure.
    pub async fn update(
        &self,
        record: &AssistantRecord,
        org_id: &str,
        reauth: Option<&dyn ReauthSource>,
    ) -> Result<AssistantRecord, AssistantError> {
        match self.update_with(self.voice, record, org_id).await {
            Err(error) if error.is_unauthorized() => {
                let retry = self.retry_client(reauth, &error)?;
                self.update_with(&retry, record, org_id).await
            }
            other => other,
        }
    }

    async fn update_with(
        &self,
        voice: &VoiceClient,
        record: &AssistantRecord,
        org_id: &str,
    ) -> Result<AssistantRecord, AssistantError> {
        if !record.id.is_remote() {
            let mut updated = record.clone();
            updated.org_id = Some(org_id.to_string());
            return Ok(updated);
        }

        let remote = voice
            .update_assistant(record.id.as_str(), &AssistantSpec::from_record(record))
            .await?;
        let mut updated = remote.into_record();
        updated.org_id = Some(org_id.to_string());
        Ok(updated)
    }

    /// Delete an assistant.
    ///
    /// Classification comes from the id tag, decided at creation time:
    /// drafts and mocks never trigger a remote call. For persisted records
    /// a 404 counts as already gone, and any other remote failure still
    /// resolves to removal from local state with a warning attached.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::Voice(VoiceError::Unauthorized)` only when
    /// re-authentication was declined or the retry failed the same way.
    pub async fn delete(
        &self,
        record: &AssistantRecord,
        reauth: Option<&dyn ReauthSource>,
    ) -> Result<DeleteOutcome, AssistantError> {
        match self.delete_with(self.voice, record).await {
            Err(error) if error.is_unauthorized() => {
                let retry = self.retry_client(reauth, &error)?;
                self.delete_with(&retry, record).await
            }
            other => other,
        }
    }

    async fn delete_with(
        &self,
        voice: &VoiceClient,
        record: &AssistantRecord,
    ) -> Result<DeleteOutcome, AssistantError> {
        if !record.id.is_remote() {
            return Ok(DeleteOutcome::LocalOnly);
        }

        match voice.delete_assistant(record.id.as_str()).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(VoiceError::NotFound(message)) => {
                tracing::debug!(%message, "assistant already gone remotely");
                Ok(DeleteOutcome::Deleted)
            }
            Err(error @ VoiceError::Unauthorized(_)) => Err(error.into()),
            Err(error) => {
                tracing::warn!(%error, assistant = %record.id, "remote delete failed; removing locally anyway");
                Ok(DeleteOutcome::RemovedWithWarning(error.to_string()))
            }
        }
    }

    /// Transfer an assistant to another organization.
    ///
    /// Recomputes the display name (old suffix stripped, base clipped to
    /// the platform's 40-char limit, new suffix appended), renames
    /// remotely, then records the new ownership. Rename and mapping write
    /// are one logical operation: a mapping failure after a successful
    /// rename is reported as [`AssistantError::TransferInconsistent`].
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` on remote failure, or
    /// `TransferInconsistent` for the partial-success case.
    pub async fn transfer(
        &self,
        record: &AssistantRecord,
        from_org: Option<&Organization>,
        to_org: &Organization,
        reauth: Option<&dyn ReauthSource>,
    ) -> Result<AssistantRecord, AssistantError> {
        match self.transfer_with(self.voice, record, from_org, to_org).await {
            Err(error) if error.is_unauthorized() => {
                let retry = self.retry_client(reauth, &error)?;
                self.transfer_with(&retry, record, from_org, to_org).await
            }
            other => other,
        }
    }

    async fn transfer_with(
        &self,
        voice: &VoiceClient,
        record: &AssistantRecord,
        from_org: Option<&Organization>,
        to_org: &Organization,
    ) -> Result<AssistantRecord, AssistantError> {
        let new_name = rename_for_transfer(
            &record.name,
            from_org.map(|org| org.name.as_str()),
            &to_org.name,
        );

        let mut transferred = record.clone();
        transferred.name = new_name.clone();
        transferred.org_id = Some(to_org.id.clone());

        if !record.id.is_remote() {
            return Ok(transferred);
        }

        voice.rename_assistant(record.id.as_str(), &new_name).await?;

        if let Err(source) = self
            .directory
            .upsert_assistant_mapping(record.id.as_str(), &to_org.id)
            .await
        {
            return Err(AssistantError::TransferInconsistent {
                assistant_id: record.id.as_str().to_string(),
                renamed_to: new_name,
                source,
            });
        }

        Ok(transferred)
    }

    /// Resolve the single permitted retry client, or re-raise the original
    /// unauthorized error when the caller has no fresh key to offer.
    fn retry_client(
        &self,
        reauth: Option<&dyn ReauthSource>,
        original: &AssistantError,
    ) -> Result<VoiceClient, AssistantError> {
        match reauth.and_then(ReauthSource::fresh_api_key) {
            Some(key) => {
                tracing::info!("retrying voice API call with a fresh key");
                Ok(self.voice.with_api_key(key))
            }
            None => Err(AssistantError::Voice(VoiceError::Unauthorized(
                original.to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_core::{AssistantId, ModelProfile, TranscriberProfile, VoiceProfile};

    fn record(id: AssistantId) -> AssistantRecord {
        AssistantRecord {
            id,
            name: "Support Bot".into(),
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
            org_id: None,
            created_at: None,
        }
    }

    #[test]
    fn unauthorized_detection_covers_only_401() {
        let unauthorized =
            AssistantError::Voice(VoiceError::Unauthorized("HTTP 401".into()));
        let not_found = AssistantError::Voice(VoiceError::NotFound("HTTP 404".into()));
        assert!(unauthorized.is_unauthorized());
        assert!(!not_found.is_unauthorized());
    }

    #[test]
    fn local_records_are_never_remote_targets() {
        // Delete classification rests on the id tag alone; these two must
        // short-circuit before any client is touched.
        assert!(!record(AssistantId::new_draft()).id.is_remote());
        assert!(!record(AssistantId::Mock("mock1".into())).id.is_remote());
        assert!(record(AssistantId::persisted("asst_1")).id.is_remote());
    }

    #[test]
    fn transfer_inconsistency_message_names_both_sides() {
        let error = AssistantError::TransferInconsistent {
            assistant_id: "asst_1".into(),
            renamed_to: "Support Bot - Globex".into(),
            source: DirectoryError::ApiError("upsert mapping: HTTP 500".into()),
        };
        let text = error.to_string();
        assert!(text.contains("asst_1"));
        assert!(text.contains("Support Bot - Globex"));
    }

    // The clients below point at an unroutable address: any remote call
    // fails with a connection error, so a clean local outcome proves no
    // call was attempted.

    fn dead_end_clients() -> (VoiceClient, DirectoryClient) {
        let voice = VoiceClient::new(&vox_config::VoicePlatformConfig {
            api_base: "http://127.0.0.1:9".into(),
            api_key: "vk_dead".into(),
        })
        .expect("voice client");
        let directory = DirectoryClient::new(
            &vox_config::BackendConfig {
                url: "http://127.0.0.1:9".into(),
                anon_key: "anon_dead".into(),
            },
            "token",
        )
        .expect("directory client");
        (voice, directory)
    }

    #[tokio::test]
    async fn deleting_a_draft_never_calls_the_platform() {
        let (voice, directory) = dead_end_clients();
        let service = AssistantService::new(&voice, &directory);

        let outcome = service
            .delete(&record(AssistantId::new_draft()), None)
            .await
            .expect("local delete");
        assert_eq!(outcome, DeleteOutcome::LocalOnly);
    }

    #[tokio::test]
    async fn deleting_a_mock_never_calls_the_platform() {
        let (voice, directory) = dead_end_clients();
        let service = AssistantService::new(&voice, &directory);

        let outcome = service
            .delete(&record(AssistantId::Mock("mock1".into())), None)
            .await
            .expect("local delete");
        assert_eq!(outcome, DeleteOutcome::LocalOnly);
    }

    #[tokio::test]
    async fn deleting_a_persisted_record_always_attempts_the_remote_call() {
        let (voice, directory) = dead_end_clients();
        let service = AssistantService::new(&voice, &directory);

        // The attempt fails on the dead-end address, which resolves to
        // local removal with a warning rather than a hard failure.
        let outcome = service
            .delete(&record(AssistantId::persisted("asst_1")), None)
            .await
            .expect("remote failure degrades to local removal");
        assert!(matches!(outcome, DeleteOutcome::RemovedWithWarning(_)));
    }

    #[tokio::test]
    async fn transferring_a_draft_is_local_only() {
        let (voice, directory) = dead_end_clients();
        let service = AssistantService::new(&voice, &directory);

        let mut draft = record(AssistantId::new_draft());
        draft.name = "Support Bot - Acme".into();
        let from = crate::test_support::org("acme", vox_core::OrgRole::User, &[]);
        let to = crate::test_support::org("globex", vox_core::OrgRole::User, &[]);

        let transferred = service
            .transfer(&draft, Some(&from), &to, None)
            .await
            .expect("local transfer");
        assert_eq!(transferred.org_id.as_deref(), Some("globex"));
        assert!(transferred.name.ends_with(" - org globex"));
    }
}
