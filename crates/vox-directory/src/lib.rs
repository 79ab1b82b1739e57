//! # vox-directory
//!
//! Organization directory for Voxboard: CRUD and query operations over the
//! backend's `organizations` table, the assistant-ownership mapping table,
//! and the `delete_team_member` remote procedure. Authorization is the
//! server's job (row-level rules); failures come back as regular errors.

pub mod client;
pub mod error;

pub use client::{DirectoryClient, OrganizationPatch};
pub use error::DirectoryError;
