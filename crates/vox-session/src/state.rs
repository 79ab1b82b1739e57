//! Console state and its controller.
//!
//! All mutation happens from the controller's completion handlers and from
//! explicit user-action handlers, as pure replace-by-id operations over the
//! last-known lists. Handlers never assume a list is unchanged since their
//! operation was issued — another completion may have landed in between.

use vox_auth::{AuthEventKind, SessionWatcher};
use vox_core::{AssistantId, AssistantRecord, Organization, Principal};

use crate::bootstrap::{BootstrapFetch, BootstrapResult, run_bootstrap};

/// Where the console is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Authenticated but provisioned with zero organizations. Terminal:
    /// the console never re-enters `Loading` on its own from here, and no
    /// organization-scoped view is available. Sign-out is the only exit.
    NoAccess,
}

/// The working state behind the console views.
#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    pub principal: Option<Principal>,
    /// What the organization views render: the privileged cross-tenant
    /// list for admins, the accessible set otherwise.
    pub organizations: Vec<Organization>,
    /// The organizations the principal can see directly.
    pub accessible: Vec<Organization>,
    pub assistants: Vec<AssistantRecord>,
    pub selected_org_id: Option<String>,
    pub is_admin: bool,
    pub master_mode: bool,
}

impl ConsoleState {
    /// The currently selected organization, if any.
    #[must_use]
    pub fn selected_org(&self) -> Option<&Organization> {
        let id = self.selected_org_id.as_deref()?;
        self.organizations.iter().find(|org| org.id == id)
    }

    /// Assistants owned by the selected organization.
    #[must_use]
    pub fn assistants_for_selected_org(&self) -> Vec<&AssistantRecord> {
        let Some(id) = self.selected_org_id.as_deref() else {
            return Vec::new();
        };
        self.assistants
            .iter()
            .filter(|a| a.org_id.as_deref() == Some(id))
            .collect()
    }

    /// Replace-by-id insert of an assistant (append when new).
    pub fn upsert_assistant(&mut self, record: AssistantRecord) {
        match self.assistants.iter_mut().find(|a| a.id == record.id) {
            Some(slot) => *slot = record,
            None => self.assistants.push(record),
        }
    }

    /// Remove an assistant by id. No-op when absent.
    pub fn remove_assistant(&mut self, id: &AssistantId) {
        self.assistants.retain(|a| &a.id != id);
    }

    /// Replace-by-id insert of an organization (append when new).
    pub fn upsert_organization(&mut self, org: Organization) {
        match self.organizations.iter_mut().find(|o| o.id == org.id) {
            Some(slot) => *slot = org,
            None => self.organizations.push(org),
        }
    }

    /// Remove an organization by id. No-op when absent.
    pub fn remove_organization(&mut self, id: &str) {
        self.organizations.retain(|o| o.id != id);
    }
}

/// Drives the bootstrap state machine off deduplicated session events.
#[derive(Debug, Default)]
pub struct SessionController {
    watcher: SessionWatcher,
    phase: Phase,
    state: ConsoleState,
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn state(&self) -> &ConsoleState {
        &self.state
    }

    #[must_use]
    pub const fn state_mut(&mut self) -> &mut ConsoleState {
        &mut self.state
    }

    /// Feed one raw session event.
    ///
    /// Events whose principal id matches the last delivered one are
    /// swallowed by the watcher — a token refresh never re-runs bootstrap.
    /// A genuine change to a signed-in principal runs the bootstrap
    /// sequence; a change to logged-out clears all state. A bootstrap
    /// failure is logged and leaves the prior state in place (still
    /// retry-eligible), never a partial commit.
    pub async fn handle_event<F: BootstrapFetch>(
        &mut self,
        kind: AuthEventKind,
        principal: Option<&Principal>,
        fetch: &F,
    ) {
        let Some(change) = self.watcher.observe(kind, principal) else {
            return;
        };

        match change.principal {
            None => {
                tracing::info!("session ended; clearing console state");
                self.phase = Phase::Idle;
                self.state = ConsoleState::default();
            }
            Some(principal) => {
                self.phase = Phase::Loading;
                self.state.principal = Some(principal.clone());
                match run_bootstrap(fetch, &principal).await {
                    Ok(BootstrapResult::Ready(outcome)) => {
                        self.state.accessible = outcome.accessible;
                        self.state.organizations = outcome.organizations;
                        self.state.assistants = outcome.assistants;
                        self.state.selected_org_id = Some(outcome.selected_org_id);
                        self.state.is_admin = outcome.is_admin;
                        self.state.master_mode = outcome.master_mode;
                        self.phase = Phase::Ready;
                    }
                    Ok(BootstrapResult::NoAccess) => {
                        self.phase = Phase::NoAccess;
                    }
                    Err(error) => {
                        tracing::error!(%error, "bootstrap failed; keeping prior state");
                    }
                }
            }
        }
    }

    /// Explicitly drill into one tenant, leaving master mode.
    pub fn select_org(&mut self, org_id: &str) {
        if self.state.organizations.iter().any(|o| o.id == org_id) {
            self.state.selected_org_id = Some(org_id.to_string());
            self.state.master_mode = false;
        } else {
            tracing::warn!(org_id, "ignoring selection of unknown organization");
        }
    }

    /// Explicitly return to the aggregate view. Admin only; never happens
    /// automatically once an admin has drilled into a tenant.
    pub fn enter_master_mode(&mut self) {
        if self.state.is_admin {
            self.state.master_mode = true;
        } else {
            tracing::warn!("non-admin attempted to enter master mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use vox_core::OrgRole;

    use crate::test_support::{StubFetch, assistant, org, principal};

    fn ready_fetch() -> StubFetch {
        StubFetch {
            accessible: Ok(vec![org("u1", OrgRole::User, &[])]),
            all: vec![],
            external: vec![assistant("a1", Some("u1")), assistant("a2", Some("other"))],
            mappings: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn token_refresh_does_not_rerun_bootstrap() {
        let mut controller = SessionController::new();
        let p = principal("u1");
        let fetch = ready_fetch();

        controller.handle_event(AuthEventKind::SignedIn, Some(&p), &fetch).await;
        assert_eq!(controller.phase(), Phase::Ready);

        // Mutate state, then deliver a refresh for the same principal: the
        // mutation must survive because nothing re-runs.
        controller.state_mut().assistants.clear();
        controller.handle_event(AuthEventKind::TokenRefreshed, Some(&p), &fetch).await;
        assert!(controller.state().assistants.is_empty());
    }

    #[tokio::test]
    async fn owned_org_flow_end_to_end() {
        let mut controller = SessionController::new();
        let fetch = ready_fetch();

        controller
            .handle_event(AuthEventKind::SignedIn, Some(&principal("u1")), &fetch)
            .await;

        let state = controller.state();
        assert_eq!(controller.phase(), Phase::Ready);
        assert_eq!(state.selected_org_id.as_deref(), Some("u1"));
        assert!(!state.master_mode);
        let visible = state.assistants_for_selected_org();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "a1");
    }

    #[tokio::test]
    async fn no_access_is_terminal() {
        let mut controller = SessionController::new();
        let p = principal("u1");
        let empty = StubFetch {
            accessible: Ok(vec![]),
            all: vec![],
            external: vec![],
            mappings: HashMap::new(),
        };

        controller.handle_event(AuthEventKind::SignedIn, Some(&p), &empty).await;
        assert_eq!(controller.phase(), Phase::NoAccess);

        // Refresh events for the same principal never restart loading.
        controller.handle_event(AuthEventKind::TokenRefreshed, Some(&p), &empty).await;
        assert_eq!(controller.phase(), Phase::NoAccess);
        assert!(controller.state().assistants_for_selected_org().is_empty());
    }

    #[tokio::test]
    async fn bootstrap_failure_keeps_prior_state() {
        let mut controller = SessionController::new();
        let good = ready_fetch();
        controller
            .handle_event(AuthEventKind::SignedIn, Some(&principal("u1")), &good)
            .await;
        assert_eq!(controller.phase(), Phase::Ready);
        let orgs_before = controller.state().organizations.clone();

        let failing = StubFetch {
            accessible: Err(()),
            all: vec![],
            external: vec![],
            mappings: HashMap::new(),
        };
        controller
            .handle_event(AuthEventKind::SignedIn, Some(&principal("u2")), &failing)
            .await;

        // Organizations survive the failed run; no partial commit.
        assert_eq!(controller.state().organizations, orgs_before);
    }

    #[tokio::test]
    async fn sign_out_clears_everything() {
        let mut controller = SessionController::new();
        let fetch = ready_fetch();
        controller
            .handle_event(AuthEventKind::SignedIn, Some(&principal("u1")), &fetch)
            .await;

        controller.handle_event(AuthEventKind::SignedOut, None, &fetch).await;
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.state().principal.is_none());
        assert!(controller.state().organizations.is_empty());
    }

    #[test]
    fn select_org_leaves_master_mode() {
        let mut controller = SessionController::new();
        controller.state_mut().is_admin = true;
        controller.state_mut().master_mode = true;
        controller.state_mut().organizations = vec![org("t1", OrgRole::User, &[])];

        controller.select_org("t1");
        assert!(!controller.state().master_mode);
        assert_eq!(controller.state().selected_org_id.as_deref(), Some("t1"));

        controller.enter_master_mode();
        assert!(controller.state().master_mode);
    }

    #[test]
    fn upserts_replace_by_id() {
        let mut state = ConsoleState::default();
        state.upsert_assistant(assistant("a1", Some("u1")));
        let mut renamed = assistant("a1", Some("u1"));
        renamed.name = "renamed".into();
        state.upsert_assistant(renamed);

        assert_eq!(state.assistants.len(), 1);
        assert_eq!(state.assistants[0].name, "renamed");

        state.remove_assistant(&state.assistants[0].id.clone());
        assert!(state.assistants.is_empty());
    }
}
