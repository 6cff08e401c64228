//! Pinboard: a personal board of bookmarked services organized into categories,
//! with tags, star ratings, reordering, and JSON backup.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
