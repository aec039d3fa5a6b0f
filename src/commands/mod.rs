//! CLI commands

pub mod feed;
pub mod list;
pub mod routes;
pub mod serve;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::BlogConfig;
use crate::content::FsPostSource;
use crate::taxonomy::{parse_category_descriptions, CategoryDescriptions};
use crate::Blog;

/// Default configuration file, relative to the base directory
pub const DEFAULT_CONFIG_FILE: &str = "blog.yml";

/// Default post directory, relative to the base directory
pub const DEFAULT_CONTENT_DIR: &str = "content/posts";

/// Where a blog's files live on disk
#[derive(Debug, Clone)]
pub struct Workspace {
    pub base_dir: PathBuf,
    pub config_path: PathBuf,
    pub content_dir: PathBuf,
}

impl Workspace {
    pub fn new(base_dir: &Path, config: Option<PathBuf>, content: Option<PathBuf>) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        Self {
            base_dir: base_dir.to_path_buf(),
            config_path: resolve(config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))),
            content_dir: resolve(content.unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))),
        }
    }

    /// Configuration from the config file, or the defaults when there is none
    pub fn load_config(&self) -> Result<BlogConfig> {
        if !self.config_path.exists() {
            tracing::info!("No config at {:?}, using defaults", self.config_path);
            return Ok(BlogConfig::default());
        }
        BlogConfig::load(&self.config_path)
            .with_context(|| format!("Failed to load config from {:?}", self.config_path))
    }

    /// Blog reading posts from the content directory
    pub fn open(&self) -> Result<Blog> {
        let config = self.load_config()?;
        let source = FsPostSource::new(&self.content_dir);
        Ok(Blog::new(config, Arc::new(source)))
    }

    /// `categories.md` next to the content directory
    pub fn descriptions_path(&self) -> PathBuf {
        self.content_dir.with_file_name("categories.md")
    }

    /// Category descriptions, empty when the file is missing or unreadable
    pub fn category_descriptions(&self) -> CategoryDescriptions {
        let path = self.descriptions_path();
        match std::fs::read_to_string(&path) {
            Ok(doc) => parse_category_descriptions(&doc),
            Err(e) => {
                tracing::debug!("No category descriptions at {:?}: {}", path, e);
                CategoryDescriptions::new()
            }
        }
    }
}
