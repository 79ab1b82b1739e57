//! `vox call` — call log, scoped to the current organization context.

use std::collections::HashSet;

use serde::Serialize;

use crate::cli::{CallAction, CallListArgs, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &CallAction,
    format: OutputFormat,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    match action {
        CallAction::List(args) => list(args, format, ctx).await,
    }
}

#[derive(Serialize)]
struct CallRow {
    id: String,
    assistant_id: Option<String>,
    status: String,
    duration: f64,
    cost: f64,
    started_at: Option<String>,
    summary: Option<String>,
}

async fn list(args: &CallListArgs, format: OutputFormat, ctx: &AppContext) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.general.default_limit);
    let calls = ctx.voice.list_calls(limit).await?;

    let state = ctx.controller.state();
    let visible: Option<HashSet<&str>> = if state.master_mode {
        None
    } else {
        Some(
            state
                .assistants_for_selected_org()
                .into_iter()
                .map(|a| a.id.as_str())
                .collect(),
        )
    };

    let rows: Vec<CallRow> = calls
        .into_iter()
        .filter(|call| match (&visible, call.assistant_id.as_deref()) {
            (None, _) => true,
            (Some(ids), Some(assistant_id)) => ids.contains(assistant_id),
            (Some(_), None) => false,
        })
        .map(|call| CallRow {
            id: call.id,
            assistant_id: call.assistant_id,
            status: call.status,
            duration: call.duration,
            cost: call.cost,
            started_at: call.started_at.map(|t| t.to_rfc3339()),
            summary: call.summary,
        })
        .collect();

    output(&rows, format)
}
