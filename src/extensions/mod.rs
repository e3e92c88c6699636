//! Pluggable UI extensions.
//!
//! Deployments contribute tabs, components and routes through a declarative
//! [`ExtensionsConfig`]. Nothing is fetched at registration time: resolving
//! a component yields a [`LoadableRef`] whose [`load`](LoadableRef::load)
//! performs the fetch once, caches the outcome and turns any failure into a
//! [`Resolution::Fallback`] instead of an error the caller must handle.
//!
//! # Examples
//!
//! ```rust
//! use scim_console::extensions::{
//!     ExtensionDescriptor, ExtensionRegistry, ExtensionType, ExtensionsConfig, FsModuleLoader,
//!     ResolutionState,
//! };
//!
//! let registry = ExtensionRegistry::with_loader(FsModuleLoader::new("./extensions"));
//! registry
//!     .register(ExtensionsConfig::default().with_section(
//!         "users",
//!         ExtensionDescriptor::new("user-edit", ExtensionType::Tab, "users/sessions.json"),
//!     ))
//!     .unwrap();
//!
//! let tab = registry.resolve_component("users", ExtensionType::Tab).unwrap();
//! assert_eq!(tab.state(), ResolutionState::Unresolved);
//! assert!(registry.resolve_component("users", ExtensionType::Route).is_none());
//! ```

pub mod config;
pub mod loader;
pub mod registry;
pub mod templates;


pub use config::{ExtensionDescriptor, ExtensionType, ExtensionsConfig, TemplateCollections};
pub use loader::{
    FsModuleLoader, LazyResource, LoadFuture, Loader, ModuleLoader, ResolutionFailure,
    ResolutionState,
};
pub use registry::{ExtensionKey, ExtensionRegistry, ExtensionScope, LoadableRef, Resolution};
pub use templates::{ApplicationTemplates, TemplateEntry, TemplateResource, deep_merge, merge_by_id};
