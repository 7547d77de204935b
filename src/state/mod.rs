/// State management module
///
/// This module handles all gallery state, including:
/// - Shared data structures (data.rs)
/// - The time-bounded listing cache (cache.rs)
/// - Shuffling fresh listings (shuffle.rs)
/// - Page arithmetic and navigation (pagination.rs)
/// - Name search (search.rs)
/// - The controller that ties them together (controller.rs)

pub mod cache;
pub mod controller;
pub mod data;
pub mod pagination;
pub mod search;
pub mod shuffle;
