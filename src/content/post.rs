//! Post model

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frontmatter::LocalizedMeta;
use crate::helpers::post_url_path;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Last updated date
    pub updated: Option<DateTime<Utc>>,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Path relative to the blog URI, `/{year}/{MM}/{slug}`
    pub url_path: String,

    /// Post categories (array form)
    pub categories: Vec<String>,

    /// Single category field
    pub category: Option<String>,

    /// Post tags
    pub tags: Vec<String>,

    pub author: Option<String>,
    pub author_image: Option<String>,
    pub image: Option<String>,

    /// Short summary shown in listings
    pub excerpt: Option<String>,
    pub description: Option<String>,

    /// Estimated reading time in minutes
    pub read_time: u32,

    /// Language of this entry when it is a localized variant
    pub lang: Option<String>,

    /// Per-language metadata overrides
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub i18n: IndexMap<String, LocalizedMeta>,

    /// Source file the post was read from
    pub source: String,

    /// Raw markdown body, only when content was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// Rendered HTML body, only when content was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Custom front-matter fields
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: &str, date: DateTime<Utc>, slug: &str) -> Self {
        Self {
            title: title.to_string(),
            date,
            updated: None,
            slug: slug.to_string(),
            url_path: post_url_path(&date, slug),
            categories: Vec::new(),
            category: None,
            tags: Vec::new(),
            author: None,
            author_image: None,
            image: None,
            excerpt: None,
            description: None,
            read_time: 0,
            lang: None,
            i18n: IndexMap::new(),
            source: String::new(),
            raw: None,
            html: None,
            extra: IndexMap::new(),
        }
    }

    /// Summary text: the excerpt, falling back to the description
    pub fn summary(&self) -> Option<&str> {
        self.excerpt
            .as_deref()
            .or(self.description.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Apply a localized override in place. The slug, and with it the URL
    /// path, only changes when the override sets one.
    pub fn apply_localization(&mut self, lang: &str, meta: &LocalizedMeta) {
        if let Some(title) = &meta.title {
            self.title = title.clone();
        }
        if let Some(slug) = &meta.slug {
            self.slug = slug.clone();
            self.url_path = post_url_path(&self.date, slug);
        }
        if let Some(excerpt) = &meta.excerpt {
            self.excerpt = Some(excerpt.clone());
        }
        if let Some(description) = &meta.description {
            self.description = Some(description.clone());
        }
        if !meta.categories.is_empty() {
            self.categories = meta.categories.clone();
        }
        if let Some(category) = &meta.category {
            self.category = Some(category.clone());
        }
        if !meta.tags.is_empty() {
            self.tags = meta.tags.clone();
        }
        if let (Some(content), Some(_)) = (&meta.content, &self.raw) {
            self.raw = Some(content.clone());
        }
        self.lang = Some(lang.to_string());
    }

    /// Localized copy of this post for `lang`, if an override exists
    pub fn localized(&self, lang: &str) -> Option<Post> {
        let meta = self.i18n.get(lang)?;
        let mut post = self.clone();
        post.apply_localization(lang, meta);
        Some(post)
    }
}
