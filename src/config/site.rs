//! Blog configuration (blog.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::merge::merge_overlay;
use crate::error::{Error, Result};
use crate::i18n::MessageTable;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub name: String,
    pub description: String,
    /// URI prefix the blog is mounted under, e.g. `/blog`
    pub uri: String,
    /// Absolute site origin used for feeds and permalinks
    pub site_url: Option<String>,
    pub language: String,

    pub posts: PostsConfig,
    pub page_content: PageContentConfig,
    pub images: ImagesConfig,
    pub pagination: PaginationConfig,
    pub social: SocialConfig,
    pub theme: ThemeConfig,
    pub i18n: I18nConfig,
    pub rss: RssConfig,

    pub debug: bool,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            name: "Blog".to_string(),
            description: "Thoughts, stories and ideas.".to_string(),
            uri: "/blog".to_string(),
            site_url: None,
            language: "en".to_string(),

            posts: PostsConfig::default(),
            page_content: PageContentConfig::default(),
            images: ImagesConfig::default(),
            pagination: PaginationConfig::default(),
            social: SocialConfig::default(),
            theme: ThemeConfig::default(),
            i18n: I18nConfig::default(),
            rss: RssConfig::default(),

            debug: false,
        }
    }
}

impl BlogConfig {
    /// Load overrides from a YAML file and merge them onto the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let overlay: serde_json::Value = if content.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_yaml::from_str(&content)?
        };
        let config = Self::from_overrides(&overlay)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Build a configuration from defaults with `overlay` merged on top.
    ///
    /// Keys outside the schema are dropped; a known key holding a value of
    /// the wrong type is a validation error.
    pub fn from_overrides(overlay: &serde_json::Value) -> Result<Self> {
        let base = serde_json::to_value(Self::default())?;
        let merged = merge_overlay(&base, overlay)?;
        serde_json::from_value(merged)
            .map_err(|e| Error::Validation(format!("invalid configuration: {}", e)))
    }

    /// Blog URI without a trailing slash (`""` when mounted at the root)
    pub fn base_uri(&self) -> &str {
        self.uri.trim_end_matches('/')
    }

    /// Language used when a request doesn't ask for one
    pub fn default_language(&self) -> &str {
        if self.i18n.default_language.is_empty() {
            &self.language
        } else {
            &self.i18n.default_language
        }
    }
}

/// Post listing and derived-field settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    pub read_time: ReadTimeConfig,
    /// Characters kept from the excerpt in listings and feeds
    pub excerpt_length: usize,
    /// Number of related posts shown under a post
    pub similar_count: usize,
    /// Maximum entries returned by category and tag listings
    pub taxonomy_limit: usize,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            read_time: ReadTimeConfig::default(),
            excerpt_length: 300,
            similar_count: 3,
            taxonomy_limit: 50,
        }
    }
}

/// Read-time estimation settings, in minutes and words
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadTimeConfig {
    pub words_per_minute: u32,
    pub default_time: u32,
    pub min_time_for_long_article: u32,
    pub min_time_for_very_long_article: u32,
    pub long_article_threshold: usize,
    pub very_long_article_threshold: usize,
    /// Number of headings that add one extra minute
    pub headings_weight: u32,
}

impl Default for ReadTimeConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            default_time: 3,
            min_time_for_long_article: 5,
            min_time_for_very_long_article: 10,
            long_article_threshold: 1500,
            very_long_article_threshold: 3000,
            headings_weight: 5,
        }
    }
}

/// UI strings rendered around the content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContentConfig {
    pub title: String,
    pub subtitle: String,
    pub read_more: String,
    pub load_more: String,
    pub no_posts: String,
    pub similar_posts_title: String,
}

impl Default for PageContentConfig {
    fn default() -> Self {
        Self {
            title: "Latest posts".to_string(),
            subtitle: String::new(),
            read_more: "Read more".to_string(),
            load_more: "Load more".to_string(),
            no_posts: "No posts found.".to_string(),
            similar_posts_title: "Similar posts".to_string(),
        }
    }
}

/// Fallback images
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub default_post_image: String,
    pub default_author_image: String,
    pub lazy_loading: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            default_post_image: "/images/default-post.jpg".to_string(),
            default_author_image: "/images/default-author.jpg".to_string(),
            lazy_loading: true,
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Posts rendered on the first index load
    pub initial_load: usize,
    /// Posts per additional page
    pub per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            initial_load: 9,
            per_page: 6,
        }
    }
}

/// Social profile links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub mastodon: Option<String>,
    pub email: Option<String>,
}

/// Theme tokens handed to the UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub dark_mode: bool,
    /// Any additional design tokens
    pub tokens: IndexMap<String, String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#2563eb".to_string(),
            accent_color: "#f59e0b".to_string(),
            font_family: "system-ui, sans-serif".to_string(),
            dark_mode: true,
            tokens: IndexMap::new(),
        }
    }
}

/// Internationalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub enabled: bool,
    pub default_language: String,
    pub languages: Vec<String>,
    /// Message overrides keyed by language code
    pub messages: IndexMap<String, MessageTable>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_language: "en".to_string(),
            languages: vec!["en".to_string()],
            messages: IndexMap::new(),
        }
    }
}

/// Feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RssConfig {
    pub max_items: usize,
    /// Feed path relative to the blog URI
    pub path: String,
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            max_items: 20,
            path: "rss.xml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.uri, "/blog");
        assert_eq!(config.pagination.initial_load, 9);
        assert_eq!(config.posts.read_time.words_per_minute, 200);
        assert_eq!(config.rss.max_items, 20);
    }

    #[test]
    fn test_overrides_keep_unspecified_defaults() {
        let config = BlogConfig::from_overrides(&json!({
            "name": "My Blog",
            "pagination": { "initial_load": 12 },
            "posts": { "read_time": { "words_per_minute": 250 } }
        }))
        .unwrap();

        assert_eq!(config.name, "My Blog");
        assert_eq!(config.pagination.initial_load, 12);
        assert_eq!(config.pagination.per_page, 6);
        assert_eq!(config.posts.read_time.words_per_minute, 250);
        assert_eq!(config.posts.read_time.default_time, 3);
        assert_eq!(config.description, BlogConfig::default().description);
    }

    #[test]
    fn test_unknown_and_reserved_keys_are_dropped() {
        let config = BlogConfig::from_overrides(&json!({
            "__proto__": { "debug": true },
            "constructor": { "name": "evil" },
            "unknown_group": { "x": 1 }
        }))
        .unwrap();
        assert!(!config.debug);
        assert_eq!(config.name, "Blog");
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = BlogConfig::from_overrides(&json!({ "pagination": { "initial_load": "lots" } }))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.yml");
        fs::write(
            &path,
            r#"
name: Notes
uri: /notes/
site_url: https://example.com
i18n:
  enabled: true
  languages: [en, fr]
"#,
        )
        .unwrap();

        let config = BlogConfig::load(&path).unwrap();
        assert_eq!(config.name, "Notes");
        assert_eq!(config.base_uri(), "/notes");
        assert_eq!(config.site_url.as_deref(), Some("https://example.com"));
        assert!(config.i18n.enabled);
        assert_eq!(config.i18n.languages, vec!["en", "fr"]);
        assert_eq!(config.default_language(), "en");
    }
}
