//! Post sources: where markdown modules come from

use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::FrontMatter;
use crate::error::{Error, Result};

/// A loaded markdown module: parsed front-matter plus the body
#[derive(Debug, Clone, Default)]
pub struct PostModule {
    pub metadata: FrontMatter,
    pub content: Option<String>,
}

impl PostModule {
    /// Parse a markdown document with optional front-matter
    pub fn parse(document: &str) -> Result<Self> {
        let (metadata, body) = FrontMatter::parse(document)?;
        let content = if body.trim().is_empty() {
            None
        } else {
            Some(body.to_string())
        };
        Ok(Self { metadata, content })
    }
}

/// Discovers markdown posts and loads them on demand
#[async_trait]
pub trait PostSource: Send + Sync {
    /// List the paths of all available posts
    async fn discover(&self) -> Result<Vec<PathBuf>>;

    /// Load one post by the path returned from `discover`
    async fn load(&self, path: &Path) -> Result<PostModule>;
}

/// Posts stored as markdown files under a directory
#[derive(Debug, Clone)]
pub struct FsPostSource {
    root: PathBuf,
}

impl FsPostSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PostSource for FsPostSource {
    async fn discover(&self) -> Result<Vec<PathBuf>> {
        let root = self.root.clone();
        let paths = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
            if !root.is_dir() {
                return Err(Error::NotFound(format!("content directory {:?}", root)));
            }
            let mut paths: Vec<PathBuf> = WalkDir::new(&root)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && is_markdown_file(p))
                .collect();
            paths.sort();
            Ok(paths)
        })
        .await
        .map_err(|e| Error::Message(format!("post discovery task failed: {}", e)))??;

        tracing::debug!("Discovered {} markdown files in {:?}", paths.len(), self.root);
        Ok(paths)
    }

    async fn load(&self, path: &Path) -> Result<PostModule> {
        let document = tokio::fs::read_to_string(path).await?;
        PostModule::parse(&document)
    }
}

/// In-memory posts keyed by a virtual path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: IndexMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a markdown document under `path`
    pub fn with(mut self, path: &str, document: &str) -> Self {
        self.insert(path, document);
        self
    }

    pub fn insert(&mut self, path: &str, document: &str) {
        self.documents
            .insert(PathBuf::from(path), document.to_string());
    }
}

#[async_trait]
impl PostSource for MemorySource {
    async fn discover(&self) -> Result<Vec<PathBuf>> {
        Ok(self.documents.keys().cloned().collect())
    }

    async fn load(&self, path: &Path) -> Result<PostModule> {
        let document = self
            .documents
            .get(path)
            .ok_or_else(|| Error::NotFound(format!("post {:?}", path)))?;
        PostModule::parse(document)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}
