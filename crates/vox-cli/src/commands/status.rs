//! `vox status` — the bootstrapped session at a glance.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct StatusResponse {
    user_id: String,
    email: String,
    is_admin: bool,
    master_mode: bool,
    selected_org: Option<String>,
    organizations: usize,
    assistants: usize,
}

pub fn handle(format: OutputFormat, ctx: &AppContext) -> anyhow::Result<()> {
    let state = ctx.controller.state();
    output(
        &StatusResponse {
            user_id: ctx.principal.id.clone(),
            email: ctx.principal.email.clone(),
            is_admin: state.is_admin,
            master_mode: state.master_mode,
            selected_org: state.selected_org().map(|org| org.name.clone()),
            organizations: state.organizations.len(),
            assistants: state.assistants.len(),
        },
        format,
    )
}
