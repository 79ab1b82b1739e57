//! # vox-voice
//!
//! Client for the external voice-assistant platform API: assistant CRUD and
//! the call log. The platform has no concept of console organizations — it
//! is one global namespace, which is why ownership lives in the local
//! mapping table (`vox-directory`) and is reconciled in `vox-session`.

pub mod client;
pub mod error;

pub use client::{
    AssistantSpec, DEFAULT_FIRST_MESSAGE, DEFAULT_SERVER_MESSAGES, RemoteAssistant, VoiceClient,
};
pub use error::VoiceError;
