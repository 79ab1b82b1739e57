//! `vox team` — membership management for one organization.

use serde::Serialize;

use vox_auth::AuthError;
use vox_directory::OrganizationPatch;

use crate::cli::{OutputFormat, TeamAction, TeamInviteArgs, TeamRemoveArgs};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &TeamAction,
    format: OutputFormat,
    ctx: &mut AppContext,
) -> anyhow::Result<()> {
    match action {
        TeamAction::Invite(args) => invite(args, format, ctx).await,
        TeamAction::Remove(args) => remove(args, format, ctx).await,
    }
}

#[derive(Serialize)]
struct TeamResponse {
    org_id: String,
    email: String,
    members: Vec<String>,
    /// False when the login account already existed and was reused.
    provisioned: bool,
}

async fn invite(args: &TeamInviteArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let org = ctx
        .controller
        .state()
        .organizations
        .iter()
        .find(|o| o.id == args.org_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("organization {} is not visible to this session", args.org_id))?;

    if org.has_member(&args.email) {
        anyhow::bail!("{} is already a member of {}", args.email, org.name);
    }

    // Provision a login for the invitee without touching our own session.
    // An already-registered address is fine — they keep their password and
    // just gain access to this organization.
    let provisioned = match ctx
        .auth
        .create_isolated_user(
            &args.email,
            &args.password,
            serde_json::json!({"invited_to": org.id}),
        )
        .await
    {
        Ok(_) => true,
        Err(AuthError::AlreadyRegistered) => {
            tracing::info!(email = %args.email, "account already exists; adding to members only");
            false
        }
        Err(error) => return Err(error.into()),
    };

    let mut members = org.members.clone();
    members.push(args.email.clone());
    let patch = OrganizationPatch {
        members: Some(members),
        ..Default::default()
    };
    let updated = ctx.directory.update_organization(&org.id, &patch).await?;
    ctx.controller.state_mut().upsert_organization(updated.clone());

    output(
        &TeamResponse {
            org_id: updated.id,
            email: args.email.clone(),
            members: updated.members,
            provisioned,
        },
        format,
    )
}

async fn remove(args: &TeamRemoveArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    // The RPC atomically drops the login account and the members entry.
    ctx.directory
        .delete_team_member(&args.email, &args.org_id)
        .await?;

    let state = ctx.controller.state_mut();
    let members = if let Some(org) = state.organizations.iter_mut().find(|o| o.id == args.org_id) {
        org.members.retain(|m| !m.eq_ignore_ascii_case(&args.email));
        org.members.clone()
    } else {
        Vec::new()
    };

    output(
        &TeamResponse {
            org_id: args.org_id.clone(),
            email: args.email.clone(),
            members,
            provisioned: false,
        },
        format,
    )
}
