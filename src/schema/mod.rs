//! Profile schema model for console resources.
//!
//! Describes which attributes of a user, role or group are mutable, how they
//! nest, and whether they live under an extension namespace. Each entry is
//! compiled into an [`AttributeShape`] once, when the [`ProfileSchema`] is built.
//!
//! # Examples
//!
//! ```rust
//! use scim_console::schema::{AttributeSchema, AttributeShape, ProfileSchema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = ProfileSchema::new(
//!     vec![
//!         AttributeSchema::new("name.givenName"),
//!         AttributeSchema::new("userName").read_only(),
//!     ],
//!     "urn:scim:wso2:schema",
//! )?;
//! let given = schema.get("name.givenName").unwrap();
//! assert_eq!(given.shape, AttributeShape::NestedName { part: "givenName".into() });
//! # Ok(())
//! # }
//! ```

pub mod embedded;
pub mod registry;
pub mod types;


pub use registry::ProfileSchema;
pub use types::{
    AttributeSchema, AttributeShape, CompiledAttribute, Multiplicity, Mutability, ValueType,
};
