//! Assistant id tagging.
//!
//! The voice platform issues authoritative ids, but two kinds of records
//! never existed remotely: local drafts (created in the console, not yet
//! saved) and seeded mock records (demo data). The distinction is decided
//! once, at creation time, and carried in the id itself — it is never
//! re-derived from the shape of the id string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an assistant record, tagged by provenance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AssistantId {
    /// Created locally, not yet persisted to the voice platform.
    Draft(String),
    /// Pre-seeded demo record; has no remote counterpart.
    Mock(String),
    /// Issued by the voice platform.
    Persisted(String),
}

impl AssistantId {
    /// Mint a new draft id with 8 hex chars of entropy.
    ///
    /// # Panics
    ///
    /// Panics only if the OS entropy source is unavailable, which is not a
    /// recoverable condition for an interactive console.
    #[must_use]
    pub fn new_draft() -> Self {
        let mut bytes = [0u8; 4];
        getrandom::fill(&mut bytes).expect("OS entropy source unavailable");
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self::Draft(format!("draft-{hex}"))
    }

    /// Wrap an id returned by the voice platform.
    #[must_use]
    pub fn persisted(id: impl Into<String>) -> Self {
        Self::Persisted(id.into())
    }

    /// The raw id string, regardless of tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft(id) | Self::Mock(id) | Self::Persisted(id) => id,
        }
    }

    /// Whether this record exists on the voice platform.
    ///
    /// Only persisted records may be the target of remote update/delete
    /// calls; drafts and mocks are local-only.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

impl fmt::Display for AssistantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
