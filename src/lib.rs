//! Shuffled, searchable, paginated wallpaper gallery.
//!
//! The library holds everything that has state or talks to a backing
//! store: asset providers, the listing cache, and the gallery controller.
//! The binary adds the iced window on top.

pub mod config;
pub mod download;
pub mod error;
pub mod logging;
pub mod provider;
pub mod state;
