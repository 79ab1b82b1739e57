//! Backend auth REST client.
//!
//! Talks to the backend's auth endpoints directly via `reqwest`. Sends the
//! publishable key as `apikey` on every request and the user's access token
//! as a bearer where one is required. Constructed explicitly from
//! [`vox_config::BackendConfig`] — there is no ambient client.

use serde::Deserialize;

use vox_config::BackendConfig;
use vox_core::Principal;

use crate::error::AuthError;

/// An authenticated session as returned by sign-in/sign-up.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub principal: Principal,
}

/// Result of provisioning an account on someone else's behalf.
#[derive(Debug, Clone)]
pub struct ProvisionedUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct BackendAuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl BackendAuthClient {
    /// Build a client from config, failing fast when the section is incomplete.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` when `backend.url` or `backend.anon_key`
    /// is missing.
    pub fn new(config: &BackendConfig) -> Result<Self, AuthError> {
        config.require()?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Sign in with the password grant.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ApiError` with the backend's own message on any
    /// non-2xx response.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|e| AuthError::ApiError(format!("sign in: {e}")))?;

        let resp = check_status(resp, "sign in").await?;

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            refresh_token: Option<String>,
            user: UserRecord,
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::ApiError(format!("parse sign in: {e}")))?;

        Ok(AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            principal: token.user.into_principal(),
        })
    }

    /// Register a new account and open a session for it.
    ///
    /// `metadata` is attached as the signup's user metadata (the backend's
    /// provisioning trigger keys organization creation off it).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AlreadyRegistered` when the email is taken,
    /// `AuthError::ApiError` otherwise.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await
            .map_err(|e| AuthError::ApiError(format!("sign up: {e}")))?;

        let resp = check_status(resp, "sign up").await?;

        #[derive(Deserialize)]
        struct SignupResponse {
            access_token: Option<String>,
            refresh_token: Option<String>,
            user: Option<UserRecord>,
            // Older deployments return the user record at the top level.
            id: Option<String>,
            email: Option<String>,
        }

        let signup: SignupResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::ApiError(format!("parse sign up: {e}")))?;

        let principal = match (signup.user, signup.id) {
            (Some(user), _) => user.into_principal(),
            (None, Some(id)) => Principal {
                id,
                email: signup.email.unwrap_or_else(|| email.to_string()),
            },
            (None, None) => {
                return Err(AuthError::ApiError("sign up: response missing user".into()));
            }
        };

        Ok(AuthSession {
            access_token: signup.access_token.unwrap_or_default(),
            refresh_token: signup.refresh_token,
            principal,
        })
    }

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ApiError` on any non-2xx response.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ApiError(format!("sign out: {e}")))?;

        check_status(resp, "sign out").await?;
        Ok(())
    }

    /// Change the password of the session's own user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ApiError` on any non-2xx response.
    pub async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self
            .http
            .put(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&serde_json::json!({"password": new_password}))
            .send()
            .await
            .map_err(|e| AuthError::ApiError(format!("update password: {e}")))?;

        check_status(resp, "update password").await?;
        Ok(())
    }

    /// Resolve the principal behind `access_token`.
    ///
    /// Never errors: any underlying failure (network, expired token, parse)
    /// is treated as logged-out and returns `None`.
    pub async fn current_principal(&self, access_token: &str) -> Option<Principal> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await;

        let resp = match resp {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                tracing::debug!(status = %resp.status(), "session check returned non-2xx");
                return None;
            }
            Err(error) => {
                tracing::debug!(%error, "session check failed");
                return None;
            }
        };

        match resp.json::<UserRecord>().await {
            Ok(user) => Some(user.into_principal()),
            Err(error) => {
                tracing::debug!(%error, "session check parse failed");
                None
            }
        }
    }

    /// Create an account **without mutating the ambient session**.
    ///
    /// Used by admin-driven provisioning (new org creation, team invites):
    /// the signup runs on a throwaway HTTP client and no token is stored, so
    /// the acting admin stays signed in as themselves. Returns
    /// `AuthError::AlreadyRegistered` as a value so bulk invite loops can
    /// continue past taken emails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AlreadyRegistered` or `AuthError::ApiError`.
    pub async fn create_isolated_user(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<ProvisionedUser, AuthError> {
        let isolated = Self {
            http: reqwest::Client::new(),
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
        };
        let session = isolated.sign_up(email, password, metadata).await?;
        Ok(ProvisionedUser {
            id: session.principal.id,
            email: session.principal.email,
        })
    }
}

#[derive(Deserialize)]
struct UserRecord {
    id: String,
    email: Option<String>,
}

impl UserRecord {
    fn into_principal(self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.unwrap_or_default(),
        }
    }
}

/// Map a non-2xx response to an error carrying the most specific message
/// the backend provided.
async fn check_status(
    resp: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, AuthError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = extract_error_message(&body);

    if status.as_u16() == 422 || message.to_lowercase().contains("already registered") {
        return Err(AuthError::AlreadyRegistered);
    }
    Err(AuthError::ApiError(format!(
        "{context}: HTTP {status}: {message}"
    )))
}

/// Pull the most specific message out of an auth error body.
///
/// The backend responds with `error_description`, `msg`, `message`, or
/// `error` depending on the endpoint; plain text otherwise.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_string();
            }
        }
    }
    body.to_string()
}
