//! Content loader - turns markdown modules into processed posts

use std::path::Path;

use super::read_time::{estimate_from_summary, estimate_read_time};
use super::{MarkdownRenderer, Post, PostModule, PostSource};
use crate::cache::CacheKey;
use crate::config::BlogConfig;
use crate::error::Result;
use crate::helpers::strip_html;

/// Which variant of the post list to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Requested language
    pub lang: String,
    /// Keep the markdown body and rendered HTML on each post
    pub include_content: bool,
    /// Emit one extra post per localized variant
    pub include_localizations: bool,
}

impl PostQuery {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self) -> Self {
        self.include_content = true;
        self
    }

    pub fn with_localizations(mut self) -> Self {
        self.include_localizations = true;
        self
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            lang: self.lang.clone(),
            include_content: self.include_content,
            include_localizations: self.include_localizations,
        }
    }
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            include_content: false,
            include_localizations: false,
        }
    }
}

/// Loads and processes posts from a source
pub struct ContentLoader<'a> {
    config: &'a BlogConfig,
    renderer: &'a MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(config: &'a BlogConfig, renderer: &'a MarkdownRenderer) -> Self {
        Self { config, renderer }
    }

    /// Load every post from `source`, newest first.
    ///
    /// Discovery failures are returned to the caller. A post that fails to
    /// load or has unusable metadata is logged and skipped.
    pub async fn load_posts(&self, source: &dyn PostSource, query: &PostQuery) -> Result<Vec<Post>> {
        let paths = source.discover().await?;
        let mut posts = Vec::with_capacity(paths.len());

        for path in &paths {
            let module = match source.load(path).await {
                Ok(module) => module,
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                    continue;
                }
            };

            match self.build_posts(path, module, query) {
                Ok(built) => posts.extend(built),
                Err(e) => tracing::warn!("Skipping post {:?}: {}", path, e),
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::info!(
            "Loaded {} posts from {} sources (lang={})",
            posts.len(),
            paths.len(),
            query.lang
        );
        Ok(posts)
    }

    /// Turn one module into the post(s) the query asks for
    fn build_posts(&self, path: &Path, module: PostModule, query: &PostQuery) -> Result<Vec<Post>> {
        let source = path.to_string_lossy().to_string();
        let fm = module.metadata;
        let date = fm.validate(&source)?;

        // Explicit slug wins over the file name
        let slug = fm
            .slug
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("untitled")
                    .to_string()
            });

        let title = fm.title.clone().unwrap_or_default();
        let mut post = Post::new(title.trim(), date, &slug);
        post.updated = fm.parse_updated();
        post.categories = fm.categories;
        post.category = fm.category.filter(|c| !c.trim().is_empty());
        post.tags = fm.tags;
        post.author = fm.author;
        post.author_image = fm.author_image;
        post.image = fm.image;
        post.description = fm.description;
        post.i18n = fm.i18n;
        post.source = source;
        post.extra = fm.extra;

        let body = module.content.unwrap_or_default();
        let (more_excerpt, full_body) = MarkdownRenderer::split_excerpt(&body);
        post.excerpt = fm.excerpt.or_else(|| {
            more_excerpt
                .map(|md| strip_html(&self.renderer.render(&md)).trim().to_string())
                .filter(|e| !e.is_empty())
        });

        let read_time_config = &self.config.posts.read_time;
        post.read_time = match fm.read_time {
            Some(minutes) => minutes,
            None if !full_body.trim().is_empty() => estimate_read_time(&full_body, read_time_config),
            None => match post.summary() {
                Some(summary) => estimate_from_summary(summary, read_time_config),
                None => read_time_config.default_time,
            },
        };

        if query.include_content {
            post.raw = Some(full_body);
        }

        if self.config.debug {
            tracing::debug!(
                "Post {:?}: url_path={} read_time={}",
                post.title,
                post.url_path,
                post.read_time
            );
        }

        let mut posts = self.localize(post, query);
        if query.include_content {
            for post in &mut posts {
                post.html = post.raw.as_deref().map(|raw| self.renderer.render(raw));
            }
        }
        Ok(posts)
    }

    fn localize(&self, post: Post, query: &PostQuery) -> Vec<Post> {
        if query.include_localizations && !post.i18n.is_empty() {
            let variants: Vec<Post> = post
                .i18n
                .keys()
                .filter_map(|lang| post.localized(lang))
                .collect();
            let mut posts = Vec::with_capacity(variants.len() + 1);
            posts.push(post);
            posts.extend(variants);
            return posts;
        }

        if query.lang != self.config.default_language() {
            if let Some(localized) = post.localized(&query.lang) {
                return vec![localized];
            }
        }

        vec![post]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemorySource;

    fn source() -> MemorySource {
        MemorySource::new()
            .with(
                "posts/first-post.md",
                r#"---
title: First
date: 2024-01-10
categories: [Rust]
tags: [async]
---
Hello there.
"#,
            )
            .with(
                "posts/second.md",
                r#"---
title: Second
date: 2024-03-05
slug: custom-slug
category: News
readTime: 12
excerpt: Short one
i18n:
  fr:
    title: Deuxième
    slug: deuxieme
  de:
    title: Zweite
---
Intro paragraph.

<!-- more -->

Rest of the post.
"#,
            )
            .with("posts/no-date.md", "---\ntitle: Undated\n---\nbody")
            .with("posts/bad-date.md", "---\ntitle: Bad\ndate: someday\n---\nbody")
            .with("posts/no-title.md", "---\ndate: 2024-02-01\n---\nbody")
            .with("posts/broken.md", "---\ntitle: [oops\n---\nbody")
    }

    async fn load(query: PostQuery) -> Vec<Post> {
        let config = BlogConfig::default();
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(&config, &renderer);
        loader.load_posts(&source(), &query).await.unwrap()
    }

    #[tokio::test]
    async fn test_invalid_posts_are_skipped_and_sorted() {
        let posts = load(PostQuery::default()).await;
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_read_time_accepts_numeric_strings() {
        let source = MemorySource::new()
            .with("posts/quoted.md", "---\ntitle: Quoted\ndate: 2024-01-03\nreadTime: \"7\"\n---\nbody")
            .with("posts/junk.md", "---\ntitle: Junk\ndate: 2024-01-02\nreadTime: soon\n---\nbody")
            .with("posts/plain.md", "---\ntitle: Plain\ndate: 2024-01-01\nreadTime: 4\n---\nbody");
        let config = BlogConfig::default();
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(&config, &renderer);
        let posts = loader.load_posts(&source, &PostQuery::default()).await.unwrap();

        let read_times: Vec<_> = posts.iter().map(|p| (p.title.as_str(), p.read_time)).collect();
        assert_eq!(
            read_times,
            vec![
                ("Quoted", 7),
                ("Junk", config.posts.read_time.default_time),
                ("Plain", 4)
            ]
        );
    }

    #[tokio::test]
    async fn test_derived_fields() {
        let posts = load(PostQuery::default()).await;
        let second = &posts[0];
        assert_eq!(second.slug, "custom-slug");
        assert_eq!(second.url_path, "/2024/03/custom-slug");
        assert_eq!(second.read_time, 12);
        assert_eq!(second.excerpt.as_deref(), Some("Short one"));
        assert_eq!(second.category.as_deref(), Some("News"));
        assert!(second.raw.is_none());
        assert!(second.html.is_none());

        let first = &posts[1];
        assert_eq!(first.slug, "first-post");
        assert_eq!(first.url_path, "/2024/01/first-post");
        assert_eq!(first.read_time, 3);
        assert_eq!(first.categories, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_include_content() {
        let posts = load(PostQuery::default().with_content()).await;
        let second = &posts[0];
        let raw = second.raw.as_deref().unwrap();
        assert!(raw.contains("Rest of the post."));
        assert!(!raw.contains("<!-- more -->"));
        assert!(second.html.as_deref().unwrap().contains("<p>Intro paragraph.</p>"));
    }

    #[tokio::test]
    async fn test_more_marker_excerpt() {
        let config = BlogConfig::default();
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(&config, &renderer);
        let source = MemorySource::new().with(
            "p.md",
            "---\ntitle: P\ndate: 2024-01-01\n---\nThe **intro**.\n<!-- more -->\nMore.",
        );
        let posts = loader.load_posts(&source, &PostQuery::default()).await.unwrap();
        assert_eq!(posts[0].excerpt.as_deref(), Some("The intro."));
    }

    #[tokio::test]
    async fn test_localizations_expanded() {
        let posts = load(PostQuery::default().with_localizations()).await;
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "Deuxième", "Zweite", "First"]);

        let fr = &posts[1];
        assert_eq!(fr.lang.as_deref(), Some("fr"));
        assert_eq!(fr.url_path, "/2024/03/deuxieme");
        let de = &posts[2];
        assert_eq!(de.url_path, "/2024/03/custom-slug");
    }

    #[tokio::test]
    async fn test_language_substitution() {
        let posts = load(PostQuery::new("fr")).await;
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Deuxième", "First"]);

        // default language never substitutes
        let posts = load(PostQuery::new("en")).await;
        assert_eq!(posts[0].title, "Second");
    }
}
