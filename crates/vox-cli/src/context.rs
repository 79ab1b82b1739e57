//! Application context: one bootstrapped session per invocation.

use anyhow::Context as _;

use vox_auth::{AuthEventKind, BackendAuthClient, magic_link, token_store};
use vox_config::VoxConfig;
use vox_core::Principal;
use vox_directory::DirectoryClient;
use vox_session::{LiveFetch, Phase, ReauthSource, SessionController};
use vox_voice::VoiceClient;

/// Everything a signed-in command needs, constructed explicitly from the
/// loaded config — no ambient singletons.
pub struct AppContext {
    pub config: VoxConfig,
    pub auth: BackendAuthClient,
    pub access_token: String,
    pub principal: Principal,
    pub directory: DirectoryClient,
    pub voice: VoiceClient,
    pub controller: SessionController,
}

impl AppContext {
    /// Resolve the session and run bootstrap.
    ///
    /// Resolution order: stored token → magic link on the configured entry
    /// URL (only while logged out) → fail with a login hint. A `NoAccess`
    /// bootstrap is surfaced as its own terminal message, distinct from
    /// transient errors.
    pub async fn init(config: VoxConfig, org_override: Option<&str>) -> anyhow::Result<Self> {
        let auth = BackendAuthClient::new(&config.backend)?;

        let mut session: Option<(String, Principal)> = None;
        if let Some(token) = token_store::load() {
            if let Some(principal) = auth.current_principal(&token).await {
                session = Some((token, principal));
            }
        }

        if session.is_none() && !config.general.entry_url.is_empty() {
            let outcome =
                magic_link::consume_entry_url(&auth, false, &config.general.entry_url).await;
            if let Some(opened) = outcome.session {
                token_store::store(&opened.access_token)?;
                eprintln!("Signed in via magic link. Continue at: {}", outcome.sanitized_url);
                session = Some((opened.access_token, opened.principal));
            }
        }

        let Some((access_token, principal)) = session else {
            anyhow::bail!("not authenticated — run `vox auth login`");
        };

        let directory = DirectoryClient::new(&config.backend, &access_token)?;
        let voice = VoiceClient::new(&config.voice)?;

        let mut controller = SessionController::new();
        {
            let fetch = LiveFetch {
                directory: &directory,
                voice: &voice,
            };
            controller
                .handle_event(AuthEventKind::SignedIn, Some(&principal), &fetch)
                .await;
        }

        match controller.phase() {
            Phase::Ready => {}
            Phase::NoAccess => {
                anyhow::bail!(
                    "your account has no organization — provisioning failed; sign out and contact an administrator"
                );
            }
            Phase::Idle | Phase::Loading => {
                anyhow::bail!("session bootstrap failed — check connectivity and try again");
            }
        }

        if let Some(org_id) = org_override {
            controller.select_org(org_id);
            if controller.state().selected_org_id.as_deref() != Some(org_id) {
                anyhow::bail!("organization {org_id} is not visible to this session");
            }
        }

        Ok(Self {
            config,
            auth,
            access_token,
            principal,
            directory,
            voice,
            controller,
        })
    }

    /// The organization current commands act in.
    pub fn current_org(&self) -> anyhow::Result<vox_core::Organization> {
        self.controller
            .state()
            .selected_org()
            .cloned()
            .context("no organization selected")
    }
}

/// Interactive re-auth: asks the operator for a replacement voice API key
/// when the platform rejects the configured one.
pub struct PromptReauth;

impl ReauthSource for PromptReauth {
    fn fresh_api_key(&self) -> Option<String> {
        eprint!("Voice API key rejected. Enter a replacement key (blank to abort): ");
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).ok()?;
        let key = line.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}
