//! `vox org` — organization management.

use chrono::Utc;
use serde::Serialize;

use vox_auth::magic_token::{self, TokenPayload};
use vox_core::{OrgRole, OrgStatus, Organization, Plan};
use vox_directory::OrganizationPatch;
use vox_session::OptimisticUpdate;

use crate::cli::{OrgAction, OrgCreateArgs, OrgIdArg, OrgLinkArgs, OrgRenameArgs, OrgTopupArgs, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// Starting balance for newly provisioned organizations.
const STARTING_CREDITS: f64 = 10.0;

#[derive(Serialize)]
struct OrgRow {
    id: String,
    name: String,
    plan: Plan,
    credits: f64,
    usage_cost: f64,
    status: OrgStatus,
    members: usize,
    created_at: String,
}

impl OrgRow {
    fn from_org(org: &Organization) -> Self {
        Self {
            id: org.id.clone(),
            name: org.name.clone(),
            plan: org.plan,
            credits: org.credits,
            usage_cost: org.usage_cost,
            status: org.status,
            members: org.members.len(),
            created_at: org.created_at.to_rfc3339(),
        }
    }
}

pub async fn handle(
    action: &OrgAction,
    format: OutputFormat,
    ctx: &mut AppContext,
) -> anyhow::Result<()> {
    match action {
        OrgAction::List => list(format, ctx),
        OrgAction::Create(args) => create(args, format, ctx).await,
        OrgAction::Rename(args) => rename(args, format, ctx).await,
        OrgAction::Topup(args) => topup(args, format, ctx).await,
        OrgAction::Suspend(args) => set_status(&args.id, OrgStatus::Suspended, format, ctx).await,
        OrgAction::Activate(args) => set_status(&args.id, OrgStatus::Active, format, ctx).await,
        OrgAction::Delete(args) => delete(args, format, ctx).await,
        OrgAction::Link(args) => link(args, format, ctx),
    }
}

fn list(format: OutputFormat, ctx: &AppContext) -> anyhow::Result<()> {
    let rows: Vec<OrgRow> = ctx
        .controller
        .state()
        .organizations
        .iter()
        .map(OrgRow::from_org)
        .collect();
    output(&rows, format)
}

async fn create(args: &OrgCreateArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    if !ctx.controller.state().is_admin {
        anyhow::bail!("org create is admin-only");
    }

    let owner = ctx
        .auth
        .create_isolated_user(
            &args.email,
            &args.password,
            serde_json::json!({"org_name": args.name}),
        )
        .await?;

    let org = Organization {
        id: owner.id,
        name: args.name.clone(),
        plan: Plan::Trial,
        credits: STARTING_CREDITS,
        usage_cost: 0.0,
        status: OrgStatus::Active,
        role: OrgRole::User,
        email: Some(args.email.clone()),
        password: Some(args.password.clone()),
        members: Vec::new(),
        created_at: Utc::now(),
    };
    let created = ctx.directory.create_organization(&org).await?;
    ctx.controller.state_mut().upsert_organization(created.clone());

    output(&OrgRow::from_org(&created), format)
}

async fn rename(args: &OrgRenameArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let patch = OrganizationPatch {
        name: Some(args.name.clone()),
        ..Default::default()
    };
    let updated = ctx.directory.update_organization(&args.id, &patch).await?;
    ctx.controller.state_mut().upsert_organization(updated.clone());
    output(&OrgRow::from_org(&updated), format)
}

async fn topup(args: &OrgTopupArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let current = find_org(ctx, &args.id)?;
    let mut tentative = current.clone();
    tentative.credits += args.amount;

    apply_confirmed(ctx, &args.id, tentative, |patch, org| {
        patch.credits = Some(org.credits);
    })
    .await?;

    let confirmed = find_org(ctx, &args.id)?;
    output(&OrgRow::from_org(&confirmed), format)
}

async fn set_status(
    id: &str,
    status: OrgStatus,
    format: OutputFormat,
    ctx: &mut AppContext,
) -> anyhow::Result<()> {
    let current = find_org(ctx, id)?;
    let mut tentative = current.clone();
    tentative.status = status;

    apply_confirmed(ctx, id, tentative, |patch, org| {
        patch.status = Some(org.status);
    })
    .await?;

    let confirmed = find_org(ctx, id)?;
    output(&OrgRow::from_org(&confirmed), format)
}

/// Optimistically swap the organization into console state, confirm the
/// patched fields against the store, and replay the inverse patch when the
/// store says no.
async fn apply_confirmed(
    ctx: &mut AppContext,
    id: &str,
    tentative: Organization,
    fill_patch: impl FnOnce(&mut OrganizationPatch, &Organization),
) -> anyhow::Result<()> {
    let mut patch = OrganizationPatch::default();
    fill_patch(&mut patch, &tentative);

    let state = ctx.controller.state_mut();
    let Some(slot) = state.organizations.iter_mut().find(|o| o.id == id) else {
        anyhow::bail!("organization {id} is not visible to this session");
    };
    let update = OptimisticUpdate::apply(slot, tentative);

    match ctx.directory.update_organization(id, &patch).await {
        Ok(confirmed) => {
            update.commit();
            ctx.controller.state_mut().upsert_organization(confirmed);
            Ok(())
        }
        Err(error) => {
            let state = ctx.controller.state_mut();
            if let Some(slot) = state.organizations.iter_mut().find(|o| o.id == id) {
                update.revert(slot);
            }
            Err(error.into())
        }
    }
}

async fn delete(args: &OrgIdArg, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    ctx.directory.delete_organization(&args.id).await?;
    ctx.controller.state_mut().remove_organization(&args.id);

    #[derive(Serialize)]
    struct DeleteResponse {
        deleted: bool,
        id: String,
    }
    output(
        &DeleteResponse {
            deleted: true,
            id: args.id.clone(),
        },
        format,
    )
}

fn link(args: &OrgLinkArgs, format: OutputFormat, ctx: &AppContext) -> anyhow::Result<()> {
    let org = find_org(ctx, &args.id)?;

    let payload = TokenPayload {
        id: org.id.clone(),
        name: org.name.clone(),
        email: org.email.clone(),
        password: org.password.clone(),
        timestamp: Utc::now().timestamp_millis(),
        version: magic_token::TOKEN_VERSION,
    };
    let token = magic_token::encode(&payload);

    let separator = if args.base_url.contains('?') { '&' } else { '?' };
    let url = format!("{}{separator}token={token}", args.base_url);

    #[derive(Serialize)]
    struct LinkResponse {
        org_id: String,
        url: String,
    }
    output(
        &LinkResponse {
            org_id: org.id,
            url,
        },
        format,
    )
}

fn find_org(ctx: &AppContext, id: &str) -> anyhow::Result<Organization> {
    ctx.controller
        .state()
        .organizations
        .iter()
        .find(|o| o.id == id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("organization {id} is not visible to this session"))
}
