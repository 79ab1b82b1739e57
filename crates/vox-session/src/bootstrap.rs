//! Session bootstrap and role resolution.
//!
//! Given an authenticated principal, decide which organizations they can
//! see, which one is selected by default, whether they are an admin, and
//! whether the console opens in aggregate ("master") mode. Runs once per
//! distinct principal id — the session watcher upstream guarantees
//! token-refresh events never reach this code.

use std::collections::HashMap;

use vox_core::{AssistantRecord, Organization, Principal};
use vox_directory::DirectoryClient;
use vox_voice::VoiceClient;

use crate::error::SessionError;
use crate::reconcile::reconcile;

/// The data sources bootstrap draws from. Abstracted so role resolution is
/// testable without a live backend.
pub trait BootstrapFetch {
    fn accessible_organizations(
        &self,
    ) -> impl Future<Output = Result<Vec<Organization>, SessionError>>;
    fn all_organizations(&self) -> impl Future<Output = Result<Vec<Organization>, SessionError>>;
    fn external_assistants(
        &self,
    ) -> impl Future<Output = Result<Vec<AssistantRecord>, SessionError>>;
    fn assistant_mappings(
        &self,
    ) -> impl Future<Output = Result<HashMap<String, String>, SessionError>>;
}

/// Live implementation over the directory and voice clients.
pub struct LiveFetch<'a> {
    pub directory: &'a DirectoryClient,
    pub voice: &'a VoiceClient,
}

impl BootstrapFetch for LiveFetch<'_> {
    async fn accessible_organizations(&self) -> Result<Vec<Organization>, SessionError> {
        Ok(self.directory.accessible_organizations().await?)
    }

    async fn all_organizations(&self) -> Result<Vec<Organization>, SessionError> {
        Ok(self.directory.all_organizations().await?)
    }

    async fn external_assistants(&self) -> Result<Vec<AssistantRecord>, SessionError> {
        let remote = self.voice.list_assistants().await?;
        Ok(remote.into_iter().map(vox_voice::RemoteAssistant::into_record).collect())
    }

    async fn assistant_mappings(&self) -> Result<HashMap<String, String>, SessionError> {
        Ok(self.directory.assistant_mappings().await?)
    }
}

/// Everything a completed bootstrap commits to console state.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    /// Organizations the principal can see directly.
    pub accessible: Vec<Organization>,
    /// The set the console shows: the privileged cross-tenant list for
    /// admins, otherwise exactly `accessible`.
    pub organizations: Vec<Organization>,
    pub selected_org_id: String,
    pub is_admin: bool,
    pub master_mode: bool,
    /// Reconciled working set, independent of the selected organization.
    pub assistants: Vec<AssistantRecord>,
}

/// Terminal result of one bootstrap run.
#[derive(Debug)]
pub enum BootstrapResult {
    Ready(Box<BootstrapOutcome>),
    /// The principal has zero accessible organizations: a provisioning
    /// failure, not a retryable error. Sign-out is the only way forward.
    NoAccess,
}

/// Run the bootstrap sequence for `principal`.
///
/// The organization fetch and the assistant-list + mapping fetches run
/// concurrently; all must succeed before any state is derived. A failure
/// in any of them aborts the whole run — callers keep their prior state.
///
/// # Errors
///
/// Returns `SessionError` from whichever fetch failed first.
pub async fn run_bootstrap<F: BootstrapFetch>(
    fetch: &F,
    principal: &Principal,
) -> Result<BootstrapResult, SessionError> {
    let (accessible, external, mappings) = tokio::try_join!(
        fetch.accessible_organizations(),
        fetch.external_assistants(),
        fetch.assistant_mappings(),
    )?;

    if accessible.is_empty() {
        tracing::warn!(principal = %principal.id, "no accessible organizations");
        return Ok(BootstrapResult::NoAccess);
    }

    // Partition: the principal's own org (id equality, at most one) vs.
    // every org they were invited into, in fetch order.
    let owned = accessible.iter().find(|org| org.is_owned_by(&principal.id));
    let invited: Vec<&Organization> = accessible
        .iter()
        .filter(|org| !org.is_owned_by(&principal.id))
        .collect();

    // Default selection: a user invited into another team lands in that
    // team's context first; owners of nothing but their own org land home.
    let Some(selected) = invited.first().copied().or(owned).or_else(|| accessible.first())
    else {
        // Unreachable past the emptiness guard, but degrade the same way.
        return Ok(BootstrapResult::NoAccess);
    };
    let selected_org_id = selected.id.clone();

    // Admin comes from the owned org when there is one; otherwise from the
    // first accessible org carrying the admin role. Plain invited
    // membership never confers admin by itself.
    let is_admin = owned.map_or_else(
        || accessible.iter().any(|org| org.role.is_admin()),
        |org| org.role.is_admin(),
    );

    let organizations = if is_admin {
        fetch.all_organizations().await?
    } else {
        accessible.clone()
    };

    let assistants = reconcile(external, &mappings);

    tracing::info!(
        principal = %principal.id,
        selected = %selected_org_id,
        is_admin,
        orgs = organizations.len(),
        assistants = assistants.len(),
        "bootstrap complete"
    );

    // An admin login always lands on the master view first; drilling into
    // a tenant is an explicit action afterwards.
    Ok(BootstrapResult::Ready(Box::new(BootstrapOutcome {
        accessible,
        organizations,
        selected_org_id,
        is_admin,
        master_mode: is_admin,
        assistants,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vox_core::OrgRole;

    use crate::test_support::{StubFetch, assistant, org, principal};

    #[tokio::test]
    async fn invited_org_wins_default_selection() {
        let fetch = StubFetch {
            accessible: Ok(vec![
                org("u1", OrgRole::User, &[]),
                org("o2", OrgRole::User, &["u1@example.com"]),
                org("o3", OrgRole::User, &["u1@example.com"]),
            ]),
            all: vec![],
            external: vec![],
            mappings: HashMap::new(),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await.unwrap();
        let BootstrapResult::Ready(outcome) = result else {
            panic!("expected ready");
        };
        assert_eq!(outcome.selected_org_id, "o2");
        assert!(!outcome.master_mode);
    }

    #[tokio::test]
    async fn owned_org_is_default_when_not_invited_anywhere() {
        let fetch = StubFetch {
            accessible: Ok(vec![org("u1", OrgRole::User, &[])]),
            all: vec![],
            external: vec![],
            mappings: HashMap::new(),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await.unwrap();
        let BootstrapResult::Ready(outcome) = result else {
            panic!("expected ready");
        };
        assert_eq!(outcome.selected_org_id, "u1");
    }

    #[tokio::test]
    async fn admin_owner_forces_master_mode_and_global_list() {
        let fetch = StubFetch {
            accessible: Ok(vec![org("u1", OrgRole::Admin, &[])]),
            all: vec![
                org("z9", OrgRole::User, &[]),
                org("u1", OrgRole::Admin, &[]),
                org("a1", OrgRole::User, &[]),
            ],
            external: vec![],
            mappings: HashMap::new(),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await.unwrap();
        let BootstrapResult::Ready(outcome) = result else {
            panic!("expected ready");
        };
        assert!(outcome.is_admin);
        assert!(outcome.master_mode);
        assert_eq!(outcome.organizations.len(), 3);
    }

    #[tokio::test]
    async fn non_admin_sees_only_accessible_set() {
        let fetch = StubFetch {
            accessible: Ok(vec![
                org("u1", OrgRole::User, &[]),
                org("o2", OrgRole::User, &["u1@example.com"]),
            ]),
            all: vec![org("should", OrgRole::User, &[]), org("not", OrgRole::User, &[])],
            external: vec![],
            mappings: HashMap::new(),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await.unwrap();
        let BootstrapResult::Ready(outcome) = result else {
            panic!("expected ready");
        };
        assert_eq!(outcome.organizations.len(), 2);
        assert_eq!(outcome.organizations[0].id, "u1");
    }

    #[tokio::test]
    async fn zero_accessible_orgs_is_no_access() {
        let fetch = StubFetch {
            accessible: Ok(vec![]),
            all: vec![],
            external: vec![],
            mappings: HashMap::new(),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await.unwrap();
        assert!(matches!(result, BootstrapResult::NoAccess));
    }

    #[tokio::test]
    async fn fetch_failure_aborts_without_partial_state() {
        let fetch = StubFetch {
            accessible: Err(()),
            all: vec![],
            external: vec![assistant("a1", None)],
            mappings: HashMap::new(),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn assistants_are_reconciled_against_mappings() {
        let fetch = StubFetch {
            accessible: Ok(vec![org("u1", OrgRole::User, &[])]),
            all: vec![],
            external: vec![assistant("a1", Some("X")), assistant("a2", None)],
            mappings: HashMap::from([("a1".to_string(), "Y".to_string())]),
        };

        let result = run_bootstrap(&fetch, &principal("u1")).await.unwrap();
        let BootstrapResult::Ready(outcome) = result else {
            panic!("expected ready");
        };
        assert_eq!(outcome.assistants[0].org_id.as_deref(), Some("Y"));
        assert_eq!(outcome.assistants[1].org_id, None);
    }
}
