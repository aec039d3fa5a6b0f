//! Helper functions shared by the content pipeline, feeds and routes

mod date;
mod html;
mod list;
mod slug;
mod url;

pub use date::*;
pub use html::*;
pub use list::*;
pub use slug::*;
pub use url::*;
