//! Content module - handles posts and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod read_time;
mod source;

pub use frontmatter::{split_frontmatter, FrontMatter, LocalizedMeta};
pub use loader::{ContentLoader, PostQuery};
pub use markdown::MarkdownRenderer;
pub use post::Post;
pub use read_time::{estimate_from_summary, estimate_read_time};
pub use source::{FsPostSource, MemorySource, PostModule, PostSource};
