// Pinboard state managers
// Managers own mutable board state and its persistence.

pub mod pinboard_manager;
pub mod pinboard_store;
