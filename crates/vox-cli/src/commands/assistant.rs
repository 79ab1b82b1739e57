//! `vox assistant` — assistant management in the current organization
//! context.

use serde::Serialize;

use vox_core::{AssistantRecord, ModelProfile, TranscriberProfile, VoiceProfile};
use vox_session::{AssistantService, DeleteOutcome};

use crate::cli::{
    AssistantAction, AssistantCreateArgs, AssistantIdArg, AssistantTransferArgs,
    AssistantUpdateArgs, OutputFormat,
};
use crate::context::{AppContext, PromptReauth};
use crate::output::output;

#[derive(Serialize)]
struct AssistantRow {
    id: String,
    name: String,
    org_id: Option<String>,
    model: String,
    voice: String,
    language: String,
}

impl AssistantRow {
    fn from_record(record: &AssistantRecord) -> Self {
        Self {
            id: record.id.as_str().to_string(),
            name: record.name.clone(),
            org_id: record.org_id.clone(),
            model: format!("{}/{}", record.model.provider, record.model.model),
            voice: format!("{}/{}", record.voice.provider, record.voice.voice_id),
            language: record.transcriber.language.clone(),
        }
    }
}

pub async fn handle(
    action: &AssistantAction,
    format: OutputFormat,
    ctx: &mut AppContext,
) -> anyhow::Result<()> {
    match action {
        AssistantAction::List => list(format, ctx),
        AssistantAction::Create(args) => create(args, format, ctx).await,
        AssistantAction::Update(args) => update(args, format, ctx).await,
        AssistantAction::Delete(args) => delete(args, format, ctx).await,
        AssistantAction::Transfer(args) => transfer(args, format, ctx).await,
    }
}

fn list(format: OutputFormat, ctx: &AppContext) -> anyhow::Result<()> {
    let state = ctx.controller.state();
    let rows: Vec<AssistantRow> = if state.master_mode {
        state.assistants.iter().map(AssistantRow::from_record).collect()
    } else {
        state
            .assistants_for_selected_org()
            .into_iter()
            .map(AssistantRow::from_record)
            .collect()
    };
    output(&rows, format)
}

async fn create(args: &AssistantCreateArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let org = ctx.current_org()?;
    let draft = AssistantRecord::draft(
        args.name.clone(),
        ModelProfile {
            provider: args.model_provider.clone(),
            model: args.model.clone(),
            system_prompt: args.system_prompt.clone(),
            temperature: args.temperature,
        },
        VoiceProfile {
            provider: args.voice_provider.clone(),
            voice_id: args.voice_id.clone(),
        },
        TranscriberProfile {
            provider: args.transcriber_provider.clone(),
            language: args.language.clone(),
        },
    );

    let service = AssistantService::new(&ctx.voice, &ctx.directory);
    let created = service.create(&draft, &org, Some(&PromptReauth)).await?;
    ctx.controller.state_mut().upsert_assistant(created.clone());

    output(&AssistantRow::from_record(&created), format)
}

async fn update(args: &AssistantUpdateArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let org = ctx.current_org()?;
    let mut record = find_assistant(ctx, &args.id)?;

    if let Some(name) = &args.name {
        record.name = name.clone();
    }
    if let Some(prompt) = &args.system_prompt {
        record.model.system_prompt = prompt.clone();
    }
    if let Some(temperature) = args.temperature {
        record.model.temperature = temperature;
    }
    if let Some(voice_id) = &args.voice_id {
        record.voice.voice_id = voice_id.clone();
    }
    if let Some(language) = &args.language {
        record.transcriber.language = language.clone();
    }

    let service = AssistantService::new(&ctx.voice, &ctx.directory);
    let updated = service.update(&record, &org.id, Some(&PromptReauth)).await?;
    ctx.controller.state_mut().upsert_assistant(updated.clone());

    output(&AssistantRow::from_record(&updated), format)
}

async fn delete(args: &AssistantIdArg, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let record = find_assistant(ctx, &args.id)?;

    let service = AssistantService::new(&ctx.voice, &ctx.directory);
    let outcome = service.delete(&record, Some(&PromptReauth)).await?;

    // Whatever the remote said (short of an unauthorized abort), the
    // record leaves local state — the console is never stuck on it.
    ctx.controller.state_mut().remove_assistant(&record.id);

    #[derive(Serialize)]
    struct DeleteResponse {
        deleted: bool,
        id: String,
        warning: Option<String>,
    }

    let warning = match outcome {
        DeleteOutcome::LocalOnly | DeleteOutcome::Deleted => None,
        DeleteOutcome::RemovedWithWarning(message) => {
            eprintln!("warning: {message}");
            Some(message)
        }
    };

    output(
        &DeleteResponse {
            deleted: true,
            id: args.id.clone(),
            warning,
        },
        format,
    )
}

async fn transfer(args: &AssistantTransferArgs, format: OutputFormat, ctx: &mut AppContext) -> anyhow::Result<()> {
    let record = find_assistant(ctx, &args.id)?;

    let state = ctx.controller.state();
    let to_org = state
        .organizations
        .iter()
        .find(|o| o.id == args.to_org)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("organization {} is not visible to this session", args.to_org))?;
    let from_org = record
        .org_id
        .as_deref()
        .and_then(|id| state.organizations.iter().find(|o| o.id == id))
        .cloned();

    let service = AssistantService::new(&ctx.voice, &ctx.directory);
    let transferred = service
        .transfer(&record, from_org.as_ref(), &to_org, Some(&PromptReauth))
        .await?;
    ctx.controller.state_mut().upsert_assistant(transferred.clone());

    output(&AssistantRow::from_record(&transferred), format)
}

fn find_assistant(ctx: &AppContext, raw_id: &str) -> anyhow::Result<AssistantRecord> {
    ctx.controller
        .state()
        .assistants
        .iter()
        .find(|a| a.id.as_str() == raw_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("assistant {raw_id} not found"))
}
