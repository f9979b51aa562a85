// src/lib.rs
//! Support utilities for application packaging.
//!
//! Two independent pieces: [`assets::AssetPaths`] derives the fixed icon
//! and style directories from an assets root, and
//! [`version::VersionManager`] keeps a static version file (and optionally
//! a project manifest) in sync with the latest version-control tag.

pub mod assets;
pub mod error;
pub mod version;

pub use assets::AssetPaths;
pub use error::{AppSupportError, Result};
pub use version::VersionManager;

/// Crate version derived from Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
