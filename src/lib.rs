//! blogkit: markdown blog content pipeline
//!
//! Loads markdown posts with YAML front-matter, derives categories and tags,
//! estimates reading time, generates an RSS feed and exposes the whole
//! thing through axum route handlers. All state lives in a [`Blog`] that is
//! constructed once and shared with the handlers.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod helpers;
pub mod i18n;
pub mod routes;
pub mod taxonomy;

pub use error::{Error, ErrorKind, Result};

use std::sync::Arc;
use std::time::Duration;

use cache::PostCache;
use config::BlogConfig;
use content::{ContentLoader, MarkdownRenderer, Post, PostQuery, PostSource};
use i18n::Messages;

/// The blog context: configuration, post source and post cache
pub struct Blog {
    config: Arc<BlogConfig>,
    source: Arc<dyn PostSource>,
    cache: PostCache,
    renderer: MarkdownRenderer,
}

impl Blog {
    /// Create a blog reading posts from `source`
    pub fn new(config: BlogConfig, source: Arc<dyn PostSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            cache: PostCache::default(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Use a custom cache lifetime
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = PostCache::new(ttl);
        self
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    /// Shared handle to the current configuration
    pub fn config_arc(&self) -> Arc<BlogConfig> {
        Arc::clone(&self.config)
    }

    /// Re-merge `overrides` onto the defaults and drop cached posts
    pub async fn reconfigure(&mut self, overrides: &serde_json::Value) -> Result<()> {
        self.config = Arc::new(BlogConfig::from_overrides(overrides)?);
        self.cache.clear().await;
        tracing::info!("Blog reconfigured");
        Ok(())
    }

    /// All posts for `query`, newest first.
    ///
    /// Results are cached per query for the cache TTL; a cached list is
    /// returned as the same shared instance.
    pub async fn get_all_posts(&self, query: &PostQuery) -> Result<Arc<Vec<Post>>> {
        let key = query.cache_key();
        if let Some(posts) = self.cache.get(&key).await {
            if self.config.debug {
                tracing::debug!("Post cache hit for {:?}", key);
            }
            return Ok(posts);
        }

        if self.config.debug {
            tracing::debug!("Post cache miss for {:?}", key);
        }
        let loader = ContentLoader::new(&self.config, &self.renderer);
        let posts = Arc::new(loader.load_posts(self.source.as_ref(), query).await?);
        self.cache.put(key, Arc::clone(&posts)).await;
        Ok(posts)
    }

    /// Forget all cached post lists
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Message getter for `lang`
    pub fn messages(&self, lang: &str) -> Messages {
        Messages::for_language(&self.config, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use content::{MemorySource, PostModule};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts discovery calls made against an in-memory source
    struct CountingSource {
        inner: MemorySource,
        discoveries: AtomicUsize,
    }

    #[async_trait]
    impl PostSource for CountingSource {
        async fn discover(&self) -> Result<Vec<PathBuf>> {
            self.discoveries.fetch_add(1, Ordering::SeqCst);
            self.inner.discover().await
        }

        async fn load(&self, path: &Path) -> Result<PostModule> {
            self.inner.load(path).await
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PostSource for FailingSource {
        async fn discover(&self) -> Result<Vec<PathBuf>> {
            Err(Error::Message("network unreachable".into()))
        }

        async fn load(&self, _path: &Path) -> Result<PostModule> {
            unreachable!()
        }
    }

    fn counting() -> Arc<CountingSource> {
        Arc::new(CountingSource {
            inner: MemorySource::new()
                .with("a.md", "---\ntitle: A\ndate: 2024-01-01\n---\nbody"),
            discoveries: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let source = counting();
        let blog = Blog::new(BlogConfig::default(), source.clone());

        let first = blog.get_all_posts(&PostQuery::default()).await.unwrap();
        let second = blog.get_all_posts(&PostQuery::default()).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.discoveries.load(Ordering::SeqCst), 1);

        // a different query is a different entry
        blog.get_all_posts(&PostQuery::default().with_content())
            .await
            .unwrap();
        assert_eq!(source.discoveries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_cache_reloads() {
        let source = counting();
        let blog = Blog::new(BlogConfig::default(), source.clone()).with_cache_ttl(Duration::ZERO);

        blog.get_all_posts(&PostQuery::default()).await.unwrap();
        blog.get_all_posts(&PostQuery::default()).await.unwrap();
        assert_eq!(source.discoveries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_and_reconfigure() {
        let source = counting();
        let mut blog = Blog::new(BlogConfig::default(), source.clone());

        blog.get_all_posts(&PostQuery::default()).await.unwrap();
        blog.clear_cache().await;
        blog.get_all_posts(&PostQuery::default()).await.unwrap();
        assert_eq!(source.discoveries.load(Ordering::SeqCst), 2);

        blog.reconfigure(&serde_json::json!({ "name": "Renamed" }))
            .await
            .unwrap();
        assert_eq!(blog.config().name, "Renamed");
        blog.get_all_posts(&PostQuery::default()).await.unwrap();
        assert_eq!(source.discoveries.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_discovery_failure_propagates() {
        let blog = Blog::new(BlogConfig::default(), Arc::new(FailingSource));
        let err = blog.get_all_posts(&PostQuery::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
