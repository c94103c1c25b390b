//! Template repository adapters.

pub mod filesystem;
pub mod render;

pub use filesystem::FilesystemTemplates;
pub use render::render_template;
