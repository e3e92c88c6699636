//! Membership reconciliation for role users, role groups and group members.
//!
//! [`reconcile`] computes which entities to add and remove; a [`PatchFormat`]
//! turns that delta into operations for the V2 or V3 API. Format selection
//! never touches the delta computation.
//!
//! # Examples
//!
//! ```rust
//! use scim_console::membership::{EntityRef, MembershipTarget, PatchFormatKind, reconcile};
//!
//! let delta = reconcile(&[EntityRef::new("u1")], &[EntityRef::with_display("u2", "bob")]);
//! let ops = PatchFormatKind::V3
//!     .strategy()
//!     .operations(MembershipTarget::Users, &delta);
//! assert_eq!(ops.len(), 2);
//! ```

pub mod format;
pub mod reconciler;

pub use format::{
    FlatPathFormat, LegacyNestedFormat, MembershipTarget, PatchFormat, PatchFormatKind,
};
pub use reconciler::{EntityRef, MembershipDelta, reconcile};
