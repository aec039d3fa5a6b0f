//! HTTP routes for the blog
//!
//! Three handlers cover the whole blog: the index, a catch-all slug handler
//! that dispatches to category, tag and post pages, and the RSS feed. All of
//! them read from a shared [`Blog`].

mod error;
mod handlers;
mod hook;

pub use error::RouteError;
pub use handlers::{
    classify_slug, IndexHandler, IndexPage, PageData, PostPage, RssHandler, SlugHandler,
    SlugRoute, TaxonomyPage, STATIC_ASSET_EXTENSIONS,
};
pub use hook::{default_i18n_handler, i18n_hook, locale_from_request, I18nHandler, I18nHookState};

use axum::{
    extract::{Path, Query, State},
    http::header::HeaderMap,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::BlogConfig;
use crate::content::Post;
use crate::error::Error;
use crate::helpers::{slugify, url_for};
use crate::taxonomy::{all_categories, all_tags, CategoryDescriptions};
use crate::Blog;

/// Per-request state shared between middleware and handlers
#[derive(Debug, Clone, Default)]
pub struct RequestLocals {
    pub locale: Option<String>,
}

/// What a language resolver gets to look at
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub path: String,
    pub headers: HeaderMap,
    pub locals: RequestLocals,
}

pub type LanguageResolver = Arc<dyn Fn(&RequestInfo) -> Option<String> + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(&Error) -> Response + Send + Sync>;

/// Hooks shared by all handlers
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Picks the request language; falls back to the request locale, then `en`
    pub language_resolver: Option<LanguageResolver>,
    /// Renders unexpected failures instead of the built-in response
    pub error_handler: Option<ErrorHandler>,
    /// Extra properties shown on category pages
    pub category_descriptions: CategoryDescriptions,
}

impl HandlerOptions {
    pub fn with_language_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&RequestInfo) -> Option<String> + Send + Sync + 'static,
    {
        self.language_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Error) -> Response + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_category_descriptions(mut self, descriptions: CategoryDescriptions) -> Self {
        self.category_descriptions = descriptions;
        self
    }

    /// Language for a request
    pub fn resolve_language(&self, request: &RequestInfo) -> String {
        self.language_resolver
            .as_ref()
            .and_then(|resolve| resolve(request))
            .or_else(|| request.locals.locale.clone())
            .unwrap_or_else(|| "en".to_string())
    }
}

/// Router state
#[derive(Clone)]
struct Routes {
    index: IndexHandler,
    slug: SlugHandler,
    rss: RssHandler,
    feed_path: String,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<usize>,
}

/// Build the blog router.
///
/// Serves `{uri}`, `{uri}/` and everything below it; the feed path (by
/// default `rss.xml`) is answered by the RSS handler.
pub fn router(blog: Arc<Blog>, options: HandlerOptions) -> Router {
    let config = blog.config_arc();
    let base = config.base_uri().to_string();

    let routes = Routes {
        index: IndexHandler::new(Arc::clone(&blog), options.clone()),
        slug: SlugHandler::new(Arc::clone(&blog), options.clone()),
        rss: RssHandler::new(Arc::clone(&blog), options),
        feed_path: config.rss.path.trim_matches('/').to_string(),
    };

    let mut router = Router::new()
        .route(&format!("{}/", base), get(index))
        .route(&format!("{}/*path", base), get(slug));
    if !base.is_empty() {
        router = router.route(&base, get(index));
    }

    router
        .with_state(routes)
        .layer(TraceLayer::new_for_http())
}

/// Same as [`router`], with the i18n hook run before every request
pub fn router_with_i18n(blog: Arc<Blog>, options: HandlerOptions, handler: I18nHandler) -> Router {
    let state = Arc::new(I18nHookState::new(blog.config_arc(), handler));
    router(blog, options).layer(middleware::from_fn_with_state(state, i18n_hook))
}

fn request_info(path: String, headers: HeaderMap, locals: Option<Extension<RequestLocals>>) -> RequestInfo {
    RequestInfo {
        path,
        headers,
        locals: locals.map(|Extension(l)| l).unwrap_or_default(),
    }
}

async fn index(
    State(routes): State<Routes>,
    Query(params): Query<PageParams>,
    headers: HeaderMap,
    locals: Option<Extension<RequestLocals>>,
) -> Response {
    let request = request_info(String::new(), headers, locals);
    match routes.index.load(&request, params.page).await {
        Ok(page) => Json(PageData::Index(page)).into_response(),
        Err(e) => routes.index.error_response(e),
    }
}

async fn slug(
    State(routes): State<Routes>,
    Path(path): Path<String>,
    Query(params): Query<PageParams>,
    headers: HeaderMap,
    locals: Option<Extension<RequestLocals>>,
) -> Response {
    if path.trim_end_matches('/') == routes.feed_path {
        return routes.rss.respond().await;
    }

    let request = request_info(path.clone(), headers, locals);
    match routes.slug.load(&path, &request, params.page).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => routes.slug.error_response(e),
    }
}

/// Paths to render ahead of time: index, feed, every category and tag
/// page and every post.
pub fn prerender_entries(config: &BlogConfig, posts: &[Post]) -> Vec<String> {
    let mut entries = vec![url_for(config, ""), url_for(config, &config.rss.path)];

    for category in all_categories(posts, usize::MAX) {
        let entry = url_for(config, &format!("category/{}", slugify(&category)));
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    for tag in all_tags(posts, usize::MAX) {
        let entry = url_for(config, &format!("tag/{}", slugify(&tag)));
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    for post in posts {
        entries.push(url_for(config, &post.url_path));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemorySource, PostQuery};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn blog(source: MemorySource, overrides: Value) -> Arc<Blog> {
        let config = BlogConfig::from_overrides(&overrides).unwrap();
        Arc::new(Blog::new(config, Arc::new(source)))
    }

    fn sample() -> MemorySource {
        MemorySource::new()
            .with(
                "posts/js-category.md",
                "---\ntitle: JS Category\ndate: 2024-02-01\ncategories: [JavaScript]\ntags: [web]\n---\nbody",
            )
            .with(
                "posts/js-tag.md",
                "---\ntitle: JS Tag\ndate: 2024-01-01\ntags: [JavaScript, web]\n---\nbody",
            )
            .with(
                "posts/rusty.md",
                "---\ntitle: Rusty\ndate: 2023-12-24\ncategory: Rust\ntags: [web]\n---\n# Rust\n\nbody",
            )
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = get(app, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    fn titles(posts: &Value) -> Vec<&str> {
        posts
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_category_page_excludes_tag_only_posts() {
        let app = router(blog(sample(), serde_json::json!({})), HandlerOptions::default());
        let (status, page) = get_json(app, "/blog/category/javascript").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["type"], "category");
        assert_eq!(page["name"], "JavaScript");
        assert_eq!(titles(&page["posts"]), vec!["JS Category"]);
    }

    #[tokio::test]
    async fn test_tag_page() {
        let app = router(blog(sample(), serde_json::json!({})), HandlerOptions::default());
        let (status, page) = get_json(app.clone(), "/blog/tag/javascript/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&page["posts"]), vec!["JS Tag"]);

        let (_, page) = get_json(app, "/blog/tag/web").await;
        assert_eq!(titles(&page["posts"]), vec!["JS Category", "JS Tag", "Rusty"]);
    }

    #[tokio::test]
    async fn test_unknown_taxonomy_is_404() {
        let app = router(blog(sample(), serde_json::json!({})), HandlerOptions::default());
        let (status, body) = get_json(app.clone(), "/blog/category/cooking").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["kind"], "CONTENT_NOT_FOUND");

        let (status, _) = get_json(app, "/blog/tag/cooking").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_page() {
        let app = router(
            blog(sample(), serde_json::json!({ "pagination": { "initial_load": 2, "per_page": 1 } })),
            HandlerOptions::default(),
        );

        let (status, page) = get_json(app.clone(), "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["type"], "index");
        assert_eq!(titles(&page["posts"]), vec!["JS Category", "JS Tag"]);
        assert_eq!(page["all_posts"].as_array().unwrap().len(), 3);
        assert_eq!(page["total"], 3);
        assert_eq!(page["has_more"], true);

        let (_, page) = get_json(app.clone(), "/blog/").await;
        assert_eq!(page["total"], 3);

        let (_, page) = get_json(app, "/blog?page=2").await;
        assert_eq!(titles(&page["posts"]), vec!["Rusty"]);
        assert_eq!(page["has_more"], false);
    }

    #[tokio::test]
    async fn test_post_page() {
        let app = router(blog(sample(), serde_json::json!({})), HandlerOptions::default());
        let (status, page) = get_json(app.clone(), "/blog/2023/12/rusty").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["type"], "post");
        assert_eq!(page["post"]["title"], "Rusty");
        assert!(page["post"]["html"].as_str().unwrap().contains("<h1>Rust</h1>"));
        assert_eq!(titles(&page["similar_posts"]), vec!["JS Category", "JS Tag"]);

        let (status, _) = get_json(app, "/blog/2023/11/rusty").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_assets_and_unknown_paths_are_404() {
        let app = router(blog(sample(), serde_json::json!({})), HandlerOptions::default());
        for uri in ["/blog/style.CSS", "/blog/img/logo.png", "/blog/about", "/blog/2024/1/x"] {
            let (status, _) = get_json(app.clone(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_rss_route() {
        let app = router(
            blog(sample(), serde_json::json!({ "site_url": "https://example.com/" })),
            HandlerOptions::default(),
        );
        let (status, headers, body) = get(app, "/blog/rss.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/xml");
        assert_eq!(headers[header::CACHE_CONTROL], "max-age=600, s-maxage=600");
        assert_eq!(body.matches("<item>").count(), 3);
        assert!(body.contains("https://example.com/blog/2024/02/js-category"));
    }

    #[tokio::test]
    async fn test_rss_failure_returns_empty_feed() {
        let app = router(blog(sample(), serde_json::json!({})), HandlerOptions::default());
        let (status, headers, body) = get(app, "/blog/rss.xml").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers[header::CONTENT_TYPE], "application/xml");
        assert!(body.contains("<rss"));
        assert!(!body.contains("<item>"));
    }

    #[tokio::test]
    async fn test_rss_failure_uses_error_handler() {
        let options = HandlerOptions::default()
            .with_error_handler(|e| (StatusCode::SERVICE_UNAVAILABLE, e.kind().to_string()).into_response());
        let app = router(blog(sample(), serde_json::json!({})), options);
        let (status, _, body) = get(app, "/blog/rss.xml").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "VALIDATION");
    }

    #[tokio::test]
    async fn test_language_resolver() {
        let source = MemorySource::new().with(
            "posts/hello.md",
            "---\ntitle: Hello\ndate: 2024-01-01\ni18n:\n  fr:\n    title: Bonjour\n---\nbody",
        );
        let options = HandlerOptions::default().with_language_resolver(|request| {
            request
                .headers
                .get("x-lang")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        });
        let app = router(blog(source, serde_json::json!({})), options);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/blog")
                    .header("x-lang", "fr")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(titles(&page["posts"]), vec!["Bonjour"]);

        let (_, page) = get_json(app, "/blog").await;
        assert_eq!(titles(&page["posts"]), vec!["Hello"]);
    }

    #[tokio::test]
    async fn test_root_mounted_blog() {
        let app = router(
            blog(sample(), serde_json::json!({ "uri": "/" })),
            HandlerOptions::default(),
        );
        let (status, page) = get_json(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 3);

        let (status, _) = get_json(app, "/category/rust").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_prerender_entries() {
        let blog = blog(sample(), serde_json::json!({}));
        let posts = blog.get_all_posts(&PostQuery::default()).await.unwrap();
        let entries = prerender_entries(blog.config(), &posts);

        assert_eq!(&entries[..2], &["/blog/", "/blog/rss.xml"]);
        assert!(entries.contains(&"/blog/category/javascript".to_string()));
        assert!(entries.contains(&"/blog/category/rust".to_string()));
        assert!(entries.contains(&"/blog/tag/javascript".to_string()));
        assert!(entries.contains(&"/blog/tag/web".to_string()));
        assert!(entries.contains(&"/blog/2023/12/rusty".to_string()));
        assert_eq!(entries.len(), 2 + 2 + 2 + 3);
    }
}
