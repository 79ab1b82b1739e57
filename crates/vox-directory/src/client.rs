//! Table and RPC client for the backend data store.
//!
//! Speaks the backend's REST table dialect (`/rest/v1/<table>` with
//! `column=eq.value` filters and `Prefer` headers). Row-level authorization
//! is enforced server-side: a row is readable by its own id-holder or by any
//! principal whose email is in its `members` array. This client never
//! duplicates those rules; it only forwards the session's bearer token.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vox_config::BackendConfig;
use vox_core::{OrgRole, OrgStatus, Organization, Plan};

use crate::error::DirectoryError;

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: String,
}

/// Partial update for an organization row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrgStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<OrgRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl DirectoryClient {
    /// Build a client scoped to one session's bearer token.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Config` when the backend section is
    /// incomplete.
    pub fn new(
        config: &BackendConfig,
        access_token: impl Into<String>,
    ) -> Result<Self, DirectoryError> {
        config.require()?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: access_token.into(),
        })
    }

    /// Every organization the current principal may see: their own (if
    /// owned) plus each org whose `members` lists their email. The store
    /// guarantees nothing about ordering.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn accessible_organizations(&self) -> Result<Vec<Organization>, DirectoryError> {
        self.select_organizations("select=*").await
    }

    /// Privileged listing of every tenant, newest first. Only admins pass
    /// the server's row rules for this query.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn all_organizations(&self) -> Result<Vec<Organization>, DirectoryError> {
        self.select_organizations("select=*&order=created_at.desc")
            .await
    }

    async fn select_organizations(&self, query: &str) -> Result<Vec<Organization>, DirectoryError> {
        let url = format!("{}/rest/v1/organizations?{query}", self.base_url);
        let resp = self
            .request(self.http.get(&url))
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("list organizations: {e}")))?;
        let resp = check_status(resp, "list organizations").await?;
        resp.json()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("parse organizations: {e}")))
    }

    /// Insert a new organization row and return it.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn create_organization(
        &self,
        org: &Organization,
    ) -> Result<Organization, DirectoryError> {
        let url = format!("{}/rest/v1/organizations", self.base_url);
        let resp = self
            .request(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(org)
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("create organization: {e}")))?;
        let resp = check_status(resp, "create organization").await?;
        let mut rows: Vec<Organization> = resp
            .json()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("parse created organization: {e}")))?;
        rows.pop()
            .ok_or_else(|| DirectoryError::ApiError("create organization: empty response".into()))
    }

    /// Apply a partial update to one organization row and return the
    /// updated row.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response or when
    /// no row matched (the id is unknown or not writable by this session).
    pub async fn update_organization(
        &self,
        id: &str,
        patch: &OrganizationPatch,
    ) -> Result<Organization, DirectoryError> {
        let url = format!(
            "{}/rest/v1/organizations?id=eq.{}",
            self.base_url,
            urlencoding::encode(id)
        );
        let resp = self
            .request(self.http.patch(&url))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("update organization: {e}")))?;
        let resp = check_status(resp, "update organization").await?;
        let mut rows: Vec<Organization> = resp
            .json()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("parse updated organization: {e}")))?;
        rows.pop().ok_or_else(|| {
            DirectoryError::ApiError(format!("update organization: no row matched id {id}"))
        })
    }

    /// Delete an organization row. The store cascades to dependent
    /// assistants, files, and tools.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn delete_organization(&self, id: &str) -> Result<(), DirectoryError> {
        let url = format!(
            "{}/rest/v1/organizations?id=eq.{}",
            self.base_url,
            urlencoding::encode(id)
        );
        let resp = self
            .request(self.http.delete(&url))
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("delete organization: {e}")))?;
        check_status(resp, "delete organization").await?;
        Ok(())
    }

    /// Load the full assistant-id → organization-id mapping table.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn assistant_mappings(&self) -> Result<HashMap<String, String>, DirectoryError> {
        let url = format!("{}/rest/v1/assistant_orgs?select=*", self.base_url);
        let resp = self
            .request(self.http.get(&url))
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("list mappings: {e}")))?;
        let resp = check_status(resp, "list mappings").await?;

        #[derive(Deserialize)]
        struct MappingRow {
            assistant_id: String,
            org_id: String,
        }

        let rows: Vec<MappingRow> = resp
            .json()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("parse mappings: {e}")))?;
        Ok(rows
            .into_iter()
            .map(|row| (row.assistant_id, row.org_id))
            .collect())
    }

    /// Write (or overwrite) one assistant's owning organization.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn upsert_assistant_mapping(
        &self,
        assistant_id: &str,
        org_id: &str,
    ) -> Result<(), DirectoryError> {
        let url = format!("{}/rest/v1/assistant_orgs", self.base_url);
        let resp = self
            .request(self.http.post(&url))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&serde_json::json!({
                "assistant_id": assistant_id,
                "org_id": org_id,
            }))
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("upsert mapping: {e}")))?;
        check_status(resp, "upsert mapping").await?;
        Ok(())
    }

    /// Atomically remove a member's login account and their entry in the
    /// organization's `members` list (privileged remote procedure).
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ApiError` on any non-2xx response.
    pub async fn delete_team_member(
        &self,
        email: &str,
        org_id: &str,
    ) -> Result<(), DirectoryError> {
        let url = format!("{}/rest/v1/rpc/delete_team_member", self.base_url);
        let resp = self
            .request(self.http.post(&url))
            .json(&serde_json::json!({"email": email, "org_id": org_id}))
            .send()
            .await
            .map_err(|e| DirectoryError::ApiError(format!("delete team member: {e}")))?;
        check_status(resp, "delete team member").await?;
        Ok(())
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
    }
}

async fn check_status(
    resp: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, DirectoryError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = extract_error_message(&body);
    tracing::debug!(%status, context, "directory call failed");
    Err(DirectoryError::ApiError(format!(
        "{context}: HTTP {status}: {message}"
    )))
}

fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error", "hint"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_string();
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
    fn client_requires_configuration() {
        let result = DirectoryClient::new(&BackendConfig::default(), "token");
        assert!(matches!(result, Err(DirectoryError::Config(_))));
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = OrganizationPatch {
            credits: Some(25.0),
            status: Some(OrgStatus::Suspended),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"credits": 25.0, "status": "suspended"})
        );
    }

    #[test]
    fn row_error_message_prefers_specific_fields() {
        assert_eq!(
            extract_error_message(r#"{"message":"new row violates row-level security policy"}"#),
            "new row violates row-level security policy"
        );
        assert_eq!(extract_error_message("upstream unavailable"), "upstream unavailable");
    }
}
