/// User interface module
///
/// - Gallery grid, placeholders and pagination controls (gallery.rs)

pub mod gallery;

pub use gallery::GalleryView;
