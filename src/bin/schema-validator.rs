//! # Profile Schema Validator
//!
//! A command-line utility for checking a user profile schema file, and
//! optionally an extensions configuration file, before deploying them to the
//! console.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-validator profile-schema.json
//! cargo run --bin schema-validator profile-schema.json extensions.json
//! ```
//!
//! The default extension namespace is `urn:scim:wso2:schema`; override it
//! with `SCIM_PROFILE_SCHEMA=<urn>`.
//!
//! ## Output Examples
//!
//! ```text
//! Validating profile schema: profile-schema.json
//! ✓ Profile schema is valid!
//!
//! Profile Schema Summary:
//!   Attributes: 18
//!   Read-only attributes: 3
//!   Extension namespaces: urn:scim:wso2:schema
//!   Attribute shapes:
//!     - flat: 4
//!     - multi-valued: 1
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: All files are valid
//! - `1`: A file is invalid or could not be read

use scim_console::config::DEFAULT_PROFILE_SCHEMA_URN;
use scim_console::{ExtensionsConfig, ProfileSchema};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <profile-schema.json> [extensions.json]", args[0]);
        process::exit(1);
    }

    let namespace =
        env::var("SCIM_PROFILE_SCHEMA").unwrap_or_else(|_| DEFAULT_PROFILE_SCHEMA_URN.to_string());

    let mut failed = !validate_profile_schema(Path::new(&args[1]), &namespace);
    if let Some(extensions) = args.get(2) {
        failed |= !validate_extensions(Path::new(extensions));
    }

    if failed {
        process::exit(1);
    }
}

fn validate_profile_schema(path: &Path, namespace: &str) -> bool {
    println!("Validating profile schema: {}", path.display());

    match ProfileSchema::from_file(path, namespace) {
        Ok(schema) => {
            println!("✓ Profile schema is valid!");
            print_schema_summary(&schema);
            true
        }
        Err(e) => {
            eprintln!("❌ Profile schema validation failed: {}", e);
            false
        }
    }
}

fn print_schema_summary(schema: &ProfileSchema) {
    let mut shape_counts = BTreeMap::new();
    for attribute in schema.iter() {
        *shape_counts.entry(attribute.shape.kind()).or_insert(0) += 1;
    }
    let read_only = schema
        .iter()
        .filter(|attribute| attribute.schema.is_read_only())
        .count();

    println!();
    println!("Profile Schema Summary:");
    println!("  Attributes: {}", schema.len());
    println!("  Read-only attributes: {}", read_only);
    println!(
        "  Extension namespaces: {}",
        schema.extension_namespaces().join(", ")
    );
    println!("  Attribute shapes:");
    for (shape, count) in shape_counts {
        println!("    - {}: {}", shape, count);
    }
}

fn validate_extensions(path: &Path) -> bool {
    println!("\nValidating extensions configuration: {}", path.display());

    let config = match ExtensionsConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Extensions configuration could not be read: {}", e);
            return false;
        }
    };

    if let Err(e) = config.template_extensions.validate() {
        eprintln!("❌ Extensions configuration is invalid: {}", e);
        return false;
    }

    println!("✓ Extensions configuration is valid!");
    println!();
    println!("Extensions Summary:");
    let mut sections: Vec<_> = config.sections.iter().collect();
    sections.sort_by_key(|(name, _)| name.as_str());
    for (name, descriptors) in sections {
        let enabled = descriptors.iter().filter(|d| d.enabled).count();
        println!(
            "  Section '{}': {} fragments ({} enabled)",
            name,
            descriptors.len(),
            enabled
        );
    }
    println!("  Routes: {}", config.routes.len());
    println!(
        "  Template overrides: {} categories, {} groups, {} templates",
        config.template_extensions.categories.len(),
        config.template_extensions.groups.len(),
        config.template_extensions.templates.len()
    );
    true
}
