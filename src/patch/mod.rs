//! SCIM PATCH synthesis for profile, role and group edits.
//!
//! [`PatchSynthesizer`] turns a [`PendingValueSet`] collected from a form into
//! a list of [`PatchOperation`]s, one per touched writable attribute, which is
//! submitted as a single [`PatchRequest`].
//!
//! # Key Types
//!
//! - [`PatchSynthesizer`] - Schema-driven fragment builder
//! - [`PendingValueSet`] - Proposed values keyed by attribute name
//! - [`PatchRequest`] - The `{Operations, schemas}` wire body

pub mod operation;
pub mod synthesizer;
pub mod values;


pub use operation::{PATCH_OP_SCHEMA, PatchOp, PatchOperation, PatchRequest};
pub use synthesizer::{PatchSynthesizer, ResourceSnapshot, normalize_locale};
pub use values::{PendingValueSet, ProposedValue};
