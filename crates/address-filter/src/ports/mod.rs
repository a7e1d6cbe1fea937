//! Ports Layer - trait definitions
//!
//! - `inbound`: what callers drive (`MembershipStore`, `Reloadable`)
//! - `outbound`: what the reload loop depends on (`ReloadNotifier`)

pub mod inbound;
pub mod outbound;

pub use inbound::{MembershipStore, Reloadable, SnapshotInfo};
pub use outbound::{ReloadEvent, ReloadNotifier};
