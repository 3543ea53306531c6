pub mod crawl;
pub mod highlight;
pub mod sources;

// Re-export command functions for convenience
pub use crawl::{crawl, RenderOptions};
pub use highlight::highlight;
pub use sources::sources;

