//! Index, slug and RSS handlers

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

use super::{HandlerOptions, RequestInfo, RouteError};
use crate::config::BlogConfig;
use crate::content::{Post, PostQuery};
use crate::error::{Error, Result};
use crate::feed::{empty_rss_feed, generate_rss_feed, FeedOptions};
use crate::helpers::paginate;
use crate::taxonomy::{
    all_categories, all_tags, filter_posts_by_category, filter_posts_by_tag, find_taxonomy_name,
    post_categories, similar_posts,
};
use crate::Blog;

lazy_static! {
    static ref POST_PATH: Regex = Regex::new(r"^(\d{4})/(\d{2})/(.+)$").unwrap();
}

/// Extensions never served by the slug handler (compared case-insensitively)
pub const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    "css", "scss", "js", "ts", "jsx", "tsx", "png", "jpg", "jpeg", "gif", "svg", "ico", "woff",
    "woff2", "ttf", "eot",
];

const RSS_CACHE_CONTROL: &str = "max-age=600, s-maxage=600";

/// What a path below the blog URI points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugRoute {
    Index,
    Asset,
    Category(String),
    Tag(String),
    Post {
        year: String,
        month: String,
        slug: String,
    },
    Unknown,
}

/// Classify a path relative to the blog URI. Trailing slashes are ignored.
pub fn classify_slug(path: &str) -> SlugRoute {
    let path = path.trim_start_matches('/').trim_end_matches('/');

    if path.is_empty() {
        return SlugRoute::Index;
    }
    if is_static_asset(path) {
        return SlugRoute::Asset;
    }
    if let Some(rest) = path.strip_prefix("category/") {
        return SlugRoute::Category(rest.to_string());
    }
    if let Some(rest) = path.strip_prefix("tag/") {
        return SlugRoute::Tag(rest.to_string());
    }
    if let Some(caps) = POST_PATH.captures(path) {
        return SlugRoute::Post {
            year: caps[1].to_string(),
            month: caps[2].to_string(),
            slug: caps[3].to_string(),
        };
    }
    SlugRoute::Unknown
}

fn is_static_asset(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((_, ext)) => STATIC_ASSET_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Data for the blog index
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub posts: Vec<Post>,
    /// Every post, for sidebar aggregation
    pub all_posts: Vec<Post>,
    pub total: usize,
    pub has_more: bool,
    pub page: usize,
    pub total_pages: usize,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// Data for a category or tag page
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyPage {
    /// Display name of the term
    pub name: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<IndexMap<String, String>>,
    pub posts: Vec<Post>,
    pub total: usize,
}

/// Data for a single post
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub post: Post,
    pub similar_posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageData {
    Index(IndexPage),
    Category(TaxonomyPage),
    Tag(TaxonomyPage),
    Post(PostPage),
}

/// Turn a handler failure into a response.
///
/// Not-found and other client errors answer with their own status; server
/// errors go to the configured error handler when there is one.
fn error_response(options: &HandlerOptions, err: Error) -> Response {
    let route_error = RouteError::from(&err);
    if route_error.status.is_server_error() {
        tracing::error!("Route failed: {}", err);
        if let Some(handler) = &options.error_handler {
            return handler(&err);
        }
    } else {
        tracing::debug!("Route answered {}: {}", route_error.status, err);
    }
    route_error.into_response()
}

#[derive(Clone)]
pub struct IndexHandler {
    blog: Arc<Blog>,
    options: HandlerOptions,
}

impl IndexHandler {
    pub fn new(blog: Arc<Blog>, options: HandlerOptions) -> Self {
        Self { blog, options }
    }

    /// Index data for `page` (1-based; the first page holds the initial batch)
    pub async fn load(&self, request: &RequestInfo, page: Option<usize>) -> Result<IndexPage> {
        let lang = self.options.resolve_language(request);
        let posts = self.blog.get_all_posts(&PostQuery::new(&lang)).await?;
        Ok(index_page(self.blog.config(), &posts, page.unwrap_or(1)))
    }

    pub fn error_response(&self, err: Error) -> Response {
        error_response(&self.options, err)
    }
}

fn index_page(config: &BlogConfig, posts: &[Post], page: usize) -> IndexPage {
    let pagination = &config.pagination;
    let paged = paginate(posts, page, pagination.initial_load, pagination.per_page);
    let limit = config.posts.taxonomy_limit;

    IndexPage {
        posts: paged.items,
        all_posts: posts.to_vec(),
        total: paged.total,
        has_more: paged.has_more,
        page: paged.page,
        total_pages: paged.total_pages,
        categories: all_categories(posts, limit),
        tags: all_tags(posts, limit),
    }
}

#[derive(Clone)]
pub struct SlugHandler {
    index: IndexHandler,
    blog: Arc<Blog>,
    options: HandlerOptions,
}

impl SlugHandler {
    pub fn new(blog: Arc<Blog>, options: HandlerOptions) -> Self {
        Self {
            index: IndexHandler::new(Arc::clone(&blog), options.clone()),
            blog,
            options,
        }
    }

    /// Dispatch `path` (relative to the blog URI) to the matching page
    pub async fn load(&self, path: &str, request: &RequestInfo, page: Option<usize>) -> Result<PageData> {
        match classify_slug(path) {
            SlugRoute::Index => self.index.load(request, page).await.map(PageData::Index),
            SlugRoute::Category(slug) => self.category(&slug, request).await.map(PageData::Category),
            SlugRoute::Tag(slug) => self.tag(&slug, request).await.map(PageData::Tag),
            SlugRoute::Post { year, month, slug } => self
                .post(&year, &month, &slug, request)
                .await
                .map(PageData::Post),
            SlugRoute::Asset | SlugRoute::Unknown => Err(Error::RouteNotFound(path.to_string())),
        }
    }

    pub fn error_response(&self, err: Error) -> Response {
        error_response(&self.options, err)
    }

    async fn category(&self, slug: &str, request: &RequestInfo) -> Result<TaxonomyPage> {
        let lang = self.options.resolve_language(request);
        let posts = self.blog.get_all_posts(&PostQuery::new(&lang)).await?;
        let terms = all_categories(&posts, usize::MAX);
        let filtered = filter_posts_by_category(&posts, slug);

        let name = match find_taxonomy_name(slug, &terms) {
            Some(name) => name.to_string(),
            None if filtered.is_empty() => {
                return Err(Error::NotFound(format!("Category {:?}", slug)));
            }
            None => slug.to_string(),
        };

        let messages = self.blog.messages(&lang);
        Ok(TaxonomyPage {
            title: messages.get("category_titles", Some(name.as_str()), &[slug]),
            description: self.options.category_descriptions.get(slug).cloned(),
            slug: slug.to_string(),
            name,
            total: filtered.len(),
            posts: filtered,
        })
    }

    async fn tag(&self, slug: &str, request: &RequestInfo) -> Result<TaxonomyPage> {
        let lang = self.options.resolve_language(request);
        let posts = self.blog.get_all_posts(&PostQuery::new(&lang)).await?;
        let terms = all_tags(&posts, usize::MAX);
        let filtered = filter_posts_by_tag(&posts, slug);

        let name = match find_taxonomy_name(slug, &terms) {
            Some(name) => name.to_string(),
            None if filtered.is_empty() => return Err(Error::NotFound(format!("Tag {:?}", slug))),
            None => slug.to_string(),
        };

        Ok(TaxonomyPage {
            title: name.clone(),
            description: None,
            slug: slug.to_string(),
            name,
            total: filtered.len(),
            posts: filtered,
        })
    }

    async fn post(&self, year: &str, month: &str, slug: &str, request: &RequestInfo) -> Result<PostPage> {
        let lang = self.options.resolve_language(request);
        let posts = self
            .blog
            .get_all_posts(&PostQuery::new(&lang).with_content())
            .await?;

        let url_path = format!("/{}/{}/{}", year, month, slug);
        let post = posts
            .iter()
            .find(|post| post.url_path == url_path)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Post {}", url_path)))?;

        let categories = post_categories(&post);
        let similar = similar_posts(
            &posts,
            &post.url_path,
            categories.first().map(String::as_str),
            &post.tags,
            self.blog.config().posts.similar_count,
        )
        .into_iter()
        .map(|mut similar| {
            similar.raw = None;
            similar.html = None;
            similar
        })
        .collect();

        Ok(PostPage {
            post,
            similar_posts: similar,
        })
    }
}

#[derive(Clone)]
pub struct RssHandler {
    blog: Arc<Blog>,
    options: HandlerOptions,
}

impl RssHandler {
    pub fn new(blog: Arc<Blog>, options: HandlerOptions) -> Self {
        Self { blog, options }
    }

    /// Feed for the default language
    pub async fn generate(&self) -> Result<String> {
        let config = self.blog.config();
        let posts = self
            .blog
            .get_all_posts(&PostQuery::new(config.default_language()))
            .await?;
        generate_rss_feed(&posts, &FeedOptions::from_config(config))
    }

    /// Feed response; failures go to the error handler or produce an empty
    /// feed with status 500.
    pub async fn respond(&self) -> Response {
        match self.generate().await {
            Ok(xml) => (
                [
                    (header::CONTENT_TYPE, "application/xml"),
                    (header::CACHE_CONTROL, RSS_CACHE_CONTROL),
                ],
                xml,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("RSS generation failed: {}", e);
                match &self.options.error_handler {
                    Some(handler) => handler(&e),
                    None => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        [(header::CONTENT_TYPE, "application/xml")],
                        empty_rss_feed(&self.blog.config().name),
                    )
                        .into_response(),
                }
            }
        }
    }
}
