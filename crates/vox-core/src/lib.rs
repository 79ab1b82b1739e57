//! # vox-core
//!
//! Core domain types for Voxboard.
//!
//! This crate provides the types shared across all Voxboard crates:
//! - Entity structs for organizations, assistants, calls, and principals
//! - Plan / status / role enums
//! - Assistant id tagging (draft vs. mock vs. remotely persisted)
//! - Display-name suffix helpers that keep assistant names synchronized
//!   with their owning organization

pub mod entities;
pub mod enums;
pub mod ids;
pub mod naming;

pub use entities::{
    AssistantRecord, CallRecord, ModelProfile, Organization, Principal, TranscriberProfile,
    VoiceProfile,
};
pub use enums::{OrgRole, OrgStatus, Plan};
pub use ids::AssistantId;
