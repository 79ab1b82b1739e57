//! Auth event dedup.
//!
//! The backend fires session events on a timer (token refreshes) independent
//! of any real session change. Acting on each one would wipe and re-fetch
//! console state for no reason, so downstream consumers only hear about an
//! event when the resolved principal id actually changed since the last
//! delivered notification.

use vox_core::Principal;

/// Kind of raw session event emitted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A deduplicated session change worth acting on.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionChange {
    pub kind: AuthEventKind,
    pub principal: Option<Principal>,
}

/// Stateful filter over raw session events.
///
/// [`SessionWatcher::observe`] returns `Some` only when the principal id
/// differs from the one delivered last — repeated refreshes for the same
/// user, and a leading logged-out notification, are suppressed.
#[derive(Debug, Default)]
pub struct SessionWatcher {
    last_delivered: Option<String>,
}

impl SessionWatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw event; get back a change if it is worth delivering.
    pub fn observe(
        &mut self,
        kind: AuthEventKind,
        principal: Option<&Principal>,
    ) -> Option<SessionChange> {
        let id = principal.map(|p| p.id.clone());
        if id == self.last_delivered {
            tracing::trace!(?kind, "suppressing session event for unchanged principal");
            return None;
        }
        self.last_delivered = id;
        Some(SessionChange {
            kind,
            principal: principal.cloned(),
        })
    }

    /// Forget the delivered state, so the next event always fires.
    pub fn reset(&mut self) {
        self.last_delivered = None;
    }
}
