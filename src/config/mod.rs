//! Configuration module

mod merge;
mod site;

pub use merge::{is_reserved_key, merge_overlay};
pub use site::BlogConfig;
pub use site::I18nConfig;
pub use site::ImagesConfig;
pub use site::PageContentConfig;
pub use site::PaginationConfig;
pub use site::PostsConfig;
pub use site::ReadTimeConfig;
pub use site::RssConfig;
pub use site::SocialConfig;
pub use site::ThemeConfig;
