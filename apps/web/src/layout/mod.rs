// Responsive row layout for content collections.
// Pure and synchronous: handlers call it inline on every request, nothing is cached.

pub mod constants;
pub mod engine;
pub mod fraction;
pub mod handlers;
mod pattern;

// Re-export the public API consumed by handlers in other modules.
pub use constants::{default_layout_config, LayoutConfig, Viewport};
pub use engine::layout_blocks;
