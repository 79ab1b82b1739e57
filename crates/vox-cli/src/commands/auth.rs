//! `vox auth` — session management. These commands run before any
//! bootstrap, so they only need the auth client.

use serde::Serialize;

use vox_auth::{BackendAuthClient, magic_link, token_store};
use vox_config::VoxConfig;

use crate::cli::{AuthAction, AuthLoginArgs, AuthMagicArgs, AuthSetPasswordArgs, OutputFormat};
use crate::output::output;

pub async fn handle(
    action: &AuthAction,
    format: OutputFormat,
    config: &VoxConfig,
) -> anyhow::Result<()> {
    let auth = BackendAuthClient::new(&config.backend)?;
    match action {
        AuthAction::Login(args) => login(&auth, args, format).await,
        AuthAction::Logout => logout(format),
        AuthAction::Status => status(&auth, format).await,
        AuthAction::Magic(args) => magic(&auth, args, format).await,
        AuthAction::SetPassword(args) => set_password(&auth, args, format).await,
    }
}

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    user_id: Option<String>,
    email: Option<String>,
}

async fn login(
    auth: &BackendAuthClient,
    args: &AuthLoginArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let session = auth.sign_in(&args.email, &args.password).await?;
    token_store::store(&session.access_token)?;
    output(
        &AuthStatusResponse {
            authenticated: true,
            user_id: Some(session.principal.id),
            email: Some(session.principal.email),
        },
        format,
    )
}

fn logout(format: OutputFormat) -> anyhow::Result<()> {
    vox_auth::logout()?;
    output(
        &AuthStatusResponse {
            authenticated: false,
            user_id: None,
            email: None,
        },
        format,
    )
}

async fn status(auth: &BackendAuthClient, format: OutputFormat) -> anyhow::Result<()> {
    let principal = vox_auth::current_principal(auth).await;
    output(
        &AuthStatusResponse {
            authenticated: principal.is_some(),
            user_id: principal.as_ref().map(|p| p.id.clone()),
            email: principal.map(|p| p.email),
        },
        format,
    )
}

async fn magic(
    auth: &BackendAuthClient,
    args: &AuthMagicArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let already_signed_in = vox_auth::current_principal(auth).await.is_some();
    let outcome = magic_link::consume_entry_url(auth, already_signed_in, &args.url).await;

    #[derive(Serialize)]
    struct MagicResponse {
        signed_in: bool,
        user_id: Option<String>,
        sanitized_url: String,
    }

    let mut response = MagicResponse {
        signed_in: false,
        user_id: None,
        sanitized_url: outcome.sanitized_url,
    };
    if let Some(session) = outcome.session {
        token_store::store(&session.access_token)?;
        response.signed_in = true;
        response.user_id = Some(session.principal.id);
    }
    output(&response, format)
}

async fn set_password(
    auth: &BackendAuthClient,
    args: &AuthSetPasswordArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let token = token_store::load().ok_or(vox_auth::AuthError::NotAuthenticated)?;
    auth.update_password(&token, &args.new_password).await?;

    #[derive(Serialize)]
    struct SetPasswordResponse {
        updated: bool,
    }
    output(&SetPasswordResponse { updated: true }, format)
}
