//! Command-line surface of the `vox` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "vox", version, about = "Voxboard — multi-tenant voice-assistant operator console")]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug detail.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Act in this organization instead of the bootstrap default.
    #[arg(long, global = true)]
    pub org: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Session management.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Organization management.
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },
    /// Team membership management.
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
    /// Voice assistant management.
    Assistant {
        #[command(subcommand)]
        action: AssistantAction,
    },
    /// Call log.
    Call {
        #[command(subcommand)]
        action: CallAction,
    },
    /// Show the bootstrapped session: principal, role, selected org.
    Status,
}

#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password.
    Login(AuthLoginArgs),
    /// Clear the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Status,
    /// Consume a magic link URL (one-shot sign-in, token stripped).
    Magic(AuthMagicArgs),
    /// Change the current account's password.
    SetPassword(AuthSetPasswordArgs),
}

#[derive(Debug, Args)]
pub struct AuthLoginArgs {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Args)]
pub struct AuthMagicArgs {
    /// The shared link, including its `token` query parameter.
    pub url: String,
}

#[derive(Debug, Args)]
pub struct AuthSetPasswordArgs {
    pub new_password: String,
}

#[derive(Debug, Subcommand)]
pub enum OrgAction {
    /// List visible organizations (all tenants in master mode).
    List,
    /// Provision a new organization with its own login account.
    Create(OrgCreateArgs),
    /// Rename an organization (assistant name suffixes follow on transfer).
    Rename(OrgRenameArgs),
    /// Add credits to an organization's balance.
    Topup(OrgTopupArgs),
    /// Suspend an organization.
    Suspend(OrgIdArg),
    /// Re-activate a suspended organization.
    Activate(OrgIdArg),
    /// Delete an organization and everything it owns.
    Delete(OrgIdArg),
    /// Mint a shareable magic link for an organization's account.
    Link(OrgLinkArgs),
}

#[derive(Debug, Args)]
pub struct OrgCreateArgs {
    pub name: String,
    /// Login email for the organization's owner account.
    #[arg(long)]
    pub email: String,
    /// Initial password for the owner account.
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct OrgRenameArgs {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Args)]
pub struct OrgTopupArgs {
    pub id: String,
    /// Credits to add.
    pub amount: f64,
}

#[derive(Debug, Args)]
pub struct OrgIdArg {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct OrgLinkArgs {
    pub id: String,
    /// Console base URL the link should open.
    #[arg(long, default_value = "https://console.voxboard.dev/")]
    pub base_url: String,
}

#[derive(Debug, Subcommand)]
pub enum TeamAction {
    /// Invite a member into an organization (provisions their login).
    Invite(TeamInviteArgs),
    /// Remove a member and their login account.
    Remove(TeamRemoveArgs),
}

#[derive(Debug, Args)]
pub struct TeamInviteArgs {
    pub org_id: String,
    pub email: String,
    /// Initial password for the invited account.
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct TeamRemoveArgs {
    pub org_id: String,
    pub email: String,
}

#[derive(Debug, Subcommand)]
pub enum AssistantAction {
    /// List assistants of the selected organization (or all in master mode).
    List,
    /// Create an assistant in the selected organization.
    Create(AssistantCreateArgs),
    /// Update an assistant's configuration.
    Update(AssistantUpdateArgs),
    /// Delete an assistant.
    Delete(AssistantIdArg),
    /// Transfer an assistant to another organization.
    Transfer(AssistantTransferArgs),
}

#[derive(Debug, Args)]
pub struct AssistantCreateArgs {
    pub name: String,
    #[arg(long, default_value = "openai")]
    pub model_provider: String,
    #[arg(long, default_value = "gpt-4o")]
    pub model: String,
    #[arg(long, default_value = "You are a helpful voice assistant.")]
    pub system_prompt: String,
    #[arg(long, default_value_t = 0.7)]
    pub temperature: f64,
    #[arg(long, default_value = "elevenlabs")]
    pub voice_provider: String,
    #[arg(long, default_value = "rachel")]
    pub voice_id: String,
    #[arg(long, default_value = "deepgram")]
    pub transcriber_provider: String,
    #[arg(long, default_value = "en")]
    pub language: String,
}

#[derive(Debug, Args)]
pub struct AssistantUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub system_prompt: Option<String>,
    #[arg(long)]
    pub temperature: Option<f64>,
    #[arg(long)]
    pub voice_id: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Debug, Args)]
pub struct AssistantIdArg {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct AssistantTransferArgs {
    pub id: String,
    /// Target organization id.
    pub to_org: String,
}

#[derive(Debug, Subcommand)]
pub enum CallAction {
    /// List recent calls for the selected organization's assistants.
    List(CallListArgs),
}

#[derive(Debug, Args)]
pub struct CallListArgs {
    #[arg(long)]
    pub limit: Option<u32>,
}
