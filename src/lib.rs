//! Glyphvault Core - Append-Only Vector Asset Registry
//!
//! # The Four Guarantees (Non-Negotiable)
//! 1. Every (group, category, name) coordinate is globally unique
//! 2. Registered assets and parts are immutable forever
//! 3. Derived indices never drift from the primary tables
//! 4. Path decoding is deterministic

pub mod error;
pub mod validation;
pub mod access;
pub mod interner;
pub mod codec;
pub mod registry;
pub mod compose;
pub mod metadata;

pub use access::AllowList;
pub use compose::RenderComposer;
pub use error::{RegistryError, Result};
pub use interner::StringTable;
pub use registry::{
    Asset, AssetDefinition, AssetId, AssetRegistry, CategoryId, GroupId, Part, PartDefinition,
    PartId, RegistrationEvent,
};
pub use validation::{CharsetValidator, Validator};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
