//! Assistant ownership reconciliation.
//!
//! The voice platform is one global namespace with no notion of console
//! organizations. Ownership lives in the local mapping table, and that
//! table wins: on every full refresh, a mapped assistant gets its `org_id`
//! overridden unconditionally. Assistants with no mapping keep whatever
//! tag the platform reported natively, which may be absent or meaningless.

use std::collections::HashMap;

use vox_core::AssistantRecord;

/// Merge the platform's assistant list with the local ownership table.
#[must_use]
pub fn reconcile(
    external: Vec<AssistantRecord>,
    mappings: &HashMap<String, String>,
) -> Vec<AssistantRecord> {
    external
        .into_iter()
        .map(|mut assistant| {
            if let Some(org_id) = mappings.get(assistant.id.as_str()) {
                assistant.org_id = Some(org_id.clone());
            }
            assistant
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vox_core::{AssistantId, ModelProfile, TranscriberProfile, VoiceProfile};

    fn assistant(id: &str, org_id: Option<&str>) -> AssistantRecord {
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

    #[test]
    fn mapping_overrides_native_tag() {
        let mappings = HashMap::from([("a1".to_string(), "Y".to_string())]);
        let merged = reconcile(vec![assistant("a1", Some("X"))], &mappings);
        assert_eq!(merged[0].org_id.as_deref(), Some("Y"));
    }

    #[test]
    fn unmapped_assistant_keeps_native_tag() {
        let mappings = HashMap::new();
        let merged = reconcile(
            vec![assistant("a1", Some("X")), assistant("a2", None)],
            &mappings,
        );
        assert_eq!(merged[0].org_id.as_deref(), Some("X"));
        assert_eq!(merged[1].org_id, None);
    }

    #[test]
    fn override_applies_on_every_refresh() {
        let mappings = HashMap::from([("a1".to_string(), "Y".to_string())]);
        // Even a record that already claims the mapped org gets the override
        // re-applied; the mapping is authoritative, not a one-time fixup.
        let first = reconcile(vec![assistant("a1", Some("stale"))], &mappings);
        let second = reconcile(first, &mappings);
        assert_eq!(second[0].org_id.as_deref(), Some("Y"));
    }
}
