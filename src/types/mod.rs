// Pinboard shared type definitions
// Each submodule defines types used across the crate.

pub mod category;
pub mod errors;
pub mod metadata;
pub mod pinboard;
pub mod service;
pub mod settings;
