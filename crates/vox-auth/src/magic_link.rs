//! Magic-link consumption.
//!
//! Consumes a `token` query parameter from the console's entry URL: decode
//! via [`crate::magic_token`], one-shot sign-in with the embedded
//! credentials, and return the URL with the parameter stripped so a refresh
//! never replays a one-time credential exposure.
//!
//! Runs only while logged out. With an existing session the token is left
//! alone — the handler never hijacks a live login.

use crate::client::{AuthSession, BackendAuthClient};
use crate::magic_token;

/// What consuming an entry URL produced.
#[derive(Debug)]
pub struct MagicLinkOutcome {
    /// The entry URL with the `token` parameter removed (unchanged when no
    /// token was present or the handler did not run).
    pub sanitized_url: String,
    /// The session opened by the embedded credentials, if sign-in succeeded.
    pub session: Option<AuthSession>,
}

/// Consume a magic link from `entry_url`.
///
/// Never errors: decode failures and sign-in failures are logged and
/// degrade to "no session" so the interactive login can take over.
pub async fn consume_entry_url(
    client: &BackendAuthClient,
    already_signed_in: bool,
    entry_url: &str,
) -> MagicLinkOutcome {
    let Some(token) = extract_token_param(entry_url) else {
        return MagicLinkOutcome {
            sanitized_url: entry_url.to_string(),
            session: None,
        };
    };

    if already_signed_in {
        tracing::debug!("session already present; ignoring magic-link token");
        return MagicLinkOutcome {
            sanitized_url: entry_url.to_string(),
            session: None,
        };
    }

    let sanitized_url = strip_token_param(entry_url);

    let Some(payload) = magic_token::decode(&token) else {
        tracing::warn!("magic-link token failed to decode; falling back to interactive login");
        return MagicLinkOutcome {
            sanitized_url,
            session: None,
        };
    };

    let (Some(email), Some(password)) = (payload.email.as_deref(), payload.password.as_deref())
    else {
        tracing::warn!(
            org = %payload.name,
            "magic-link token missing credentials; falling back to interactive login"
        );
        return MagicLinkOutcome {
            sanitized_url,
            session: None,
        };
    };

    match client.sign_in(email, password).await {
        Ok(session) => {
            tracing::info!(org = %payload.name, "signed in via magic link");
            MagicLinkOutcome {
                sanitized_url,
                session: Some(session),
            }
        }
        Err(error) => {
            tracing::warn!(%error, "magic-link sign-in failed; falling back to interactive login");
            MagicLinkOutcome {
                sanitized_url,
                session: None,
            }
        }
    }
}

/// Pull the raw `token` query parameter out of a URL, if present.
fn extract_token_param(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == "token" && !value.is_empty() {
                return urlencoding::decode(value).ok().map(|v| v.into_owned());
            }
        }
    }
    None
}

/// Rebuild `url` without its `token` query parameter.
fn strip_token_param(url: &str) -> String {
    let Some((base, rest)) = url.split_once('?') else {
        return url.to_string();
    };
    let (query, fragment) = match rest.split_once('#') {
        Some((q, f)) => (q, Some(f)),
        None => (rest, None),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            key != "token"
        })
        .collect();

    let mut result = base.to_string();
    if !kept.is_empty() {
        result.push('?');
        result.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }
    result
}
