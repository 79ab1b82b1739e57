//! # vox-session
//!
//! The console's core control flow: merging the voice platform's global
//! assistant namespace with the local ownership table, running the
//! session-bootstrap / role-resolution sequence for each distinct
//! principal, and holding the in-memory console state that the views
//! render.

pub mod assistants;
pub mod bootstrap;
pub mod error;
pub mod optimistic;
pub mod reconcile;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use assistants::{AssistantError, AssistantService, DeleteOutcome, ReauthSource};
pub use bootstrap::{BootstrapFetch, BootstrapOutcome, BootstrapResult, LiveFetch, run_bootstrap};
pub use error::SessionError;
pub use optimistic::OptimisticUpdate;
pub use reconcile::reconcile;
pub use state::{ConsoleState, Phase, SessionController};
