// Rendering module.
// Projects events to HTML lines and writes them to a target.

pub mod format;
pub mod project;
pub mod target;

pub use format::RepoLinks;
pub use project::{Projector, render_container};
pub use target::{FileTarget, RenderTarget, StdoutTarget};
