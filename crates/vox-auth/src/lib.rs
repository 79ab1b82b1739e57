//! # vox-auth
//!
//! Identity & session gateway for Voxboard.
//!
//! Wraps the backend's auth endpoints (`reqwest`), deduplicates session
//! events so token refreshes never retrigger downstream bootstrap, persists
//! the session token (OS keychain with file fallback), provisions accounts
//! without disturbing the ambient session, and implements the magic-link
//! token codec and handler.

pub mod client;
pub mod error;
pub mod magic_link;
pub mod magic_token;
pub mod token_store;
pub mod watcher;

pub use client::{AuthSession, BackendAuthClient, ProvisionedUser};
pub use error::AuthError;
pub use magic_link::MagicLinkOutcome;
pub use magic_token::TokenPayload;
pub use watcher::{AuthEventKind, SessionChange, SessionWatcher};

use vox_core::Principal;

/// Resolve the principal behind the stored session token, if any.
///
/// Never errors: a missing token or any backend failure is logged-out.
pub async fn current_principal(client: &BackendAuthClient) -> Option<Principal> {
    let token = token_store::load()?;
    client.current_principal(&token).await
}

/// Clear stored credentials.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be
/// removed.
pub fn logout() -> Result<(), AuthError> {
    token_store::delete()
}
