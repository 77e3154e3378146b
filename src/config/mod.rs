//! Configuration module for livemark
//!
//! User preferences (extension toggles, editor chrome, decoration policy),
//! their JSON/TOML serialization, and persistent storage in the platform
//! config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
