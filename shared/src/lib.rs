//! Shared types for the gbhost ROM loader.
//!
//! Constants, the resource manifest, and the cartridge header format used by
//! both the loader core and the launcher.

pub mod cartridge;
pub mod constants;
pub mod fs;
pub mod ids;
pub mod manifest;

pub use cartridge::{CartridgeError, CartridgeHeader};
pub use constants::*;
pub use ids::is_safe_resource_name;
pub use manifest::{ManifestError, ResourceManifest};
