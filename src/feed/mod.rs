//! RSS 2.0 feed generation

use chrono::{DateTime, Utc};

use crate::config::BlogConfig;
use crate::content::Post;
use crate::error::{Error, Result};
use crate::helpers::{escape_xml, full_url, rfc822, strip_html, strip_invalid_xml_chars, truncate};
use crate::taxonomy::post_categories;

/// Characters of the excerpt kept in an item description
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 300;

/// Default number of items in a feed
pub const DEFAULT_MAX_ITEMS: usize = 20;

const GENERATOR: &str = concat!("blogkit ", env!("CARGO_PKG_VERSION"));

/// Channel-level settings of a feed
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Absolute site origin; required
    pub site_url: Option<String>,
    pub title: String,
    pub description: String,
    pub language: String,
    /// URI prefix the blog is mounted under
    pub blog_uri: String,
    pub max_items: usize,
    /// Characters kept from each post's excerpt
    pub description_limit: usize,
    /// Feed path relative to the blog URI, used for the atom self link
    pub feed_path: String,
    /// `lastBuildDate` of the channel; now when unset
    pub build_date: Option<DateTime<Utc>>,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            site_url: None,
            title: String::new(),
            description: String::new(),
            language: "en".to_string(),
            blog_uri: String::new(),
            max_items: DEFAULT_MAX_ITEMS,
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            feed_path: "rss.xml".to_string(),
            build_date: None,
        }
    }
}

impl FeedOptions {
    pub fn from_config(config: &BlogConfig) -> Self {
        Self {
            site_url: config.site_url.clone(),
            title: config.name.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            blog_uri: config.base_uri().to_string(),
            max_items: config.rss.max_items,
            description_limit: config.posts.excerpt_length,
            feed_path: config.rss.path.clone(),
            build_date: None,
        }
    }
}

/// Serialize `posts` (newest first) as an RSS 2.0 document.
///
/// Fails when no site URL is configured. Posts without a title are left
/// out; a post whose item cannot be built is logged and skipped.
pub fn generate_rss_feed(posts: &[Post], options: &FeedOptions) -> Result<String> {
    let site_url = options
        .site_url
        .as_deref()
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::Validation("siteUrl is required to generate an RSS feed".into()))?;

    let build_date = options.build_date.unwrap_or_else(Utc::now);
    let channel_link = full_url(site_url, &options.blog_uri, "");
    let self_link = full_url(site_url, &options.blog_uri, &options.feed_path);

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", text(&options.title)));
    feed.push_str(&format!("    <link>{}</link>\n", text(&channel_link)));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        text(&options.description)
    ));
    feed.push_str(&format!("    <language>{}</language>\n", text(&options.language)));
    feed.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        rfc822(&build_date)
    ));
    feed.push_str(&format!("    <generator>{}</generator>\n", GENERATOR));
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        text(&self_link)
    ));

    let mut count = 0;
    for post in posts
        .iter()
        .filter(|post| !post.title.trim().is_empty())
        .take(options.max_items)
    {
        match render_item(post, site_url, options) {
            Ok(item) => {
                feed.push_str(&item);
                count += 1;
            }
            Err(e) => tracing::warn!("Skipping feed item {:?}: {}", post.title, e),
        }
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");

    tracing::debug!("Generated RSS feed with {} items", count);
    Ok(feed)
}

/// Minimal valid feed returned when generation fails
pub fn empty_rss_feed(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n<rss version=\"2.0\"><channel><title>{}</title></channel></rss>\n"
        ),
        text(title)
    )
}

fn render_item(post: &Post, site_url: &str, options: &FeedOptions) -> Result<String> {
    if post.url_path.trim_matches('/').is_empty() {
        return Err(Error::Rss(format!("post {:?} has no url path", post.title)));
    }
    let link = full_url(site_url, &options.blog_uri, &post.url_path);

    let mut item = String::new();
    item.push_str("    <item>\n");
    item.push_str(&format!("      <title>{}</title>\n", text(&post.title)));
    item.push_str(&format!("      <link>{}</link>\n", text(&link)));
    item.push_str(&format!(
        "      <guid isPermaLink=\"true\">{}</guid>\n",
        text(&link)
    ));
    item.push_str(&format!("      <pubDate>{}</pubDate>\n", rfc822(&post.date)));
    if let Some(updated) = &post.updated {
        item.push_str(&format!(
            "      <lastBuildDate>{}</lastBuildDate>\n",
            rfc822(updated)
        ));
    }
    if let Some(summary) = post.summary() {
        let summary = truncate(strip_html(summary).trim(), options.description_limit, None);
        item.push_str(&format!("      <description>{}</description>\n", text(&summary)));
    }
    if let Some(author) = post.author.as_deref().filter(|a| !a.trim().is_empty()) {
        item.push_str(&format!("      <author>{}</author>\n", text(author)));
    }

    let mut terms: Vec<String> = Vec::new();
    for term in post_categories(post).into_iter().chain(post.tags.iter().cloned()) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    for term in &terms {
        item.push_str(&format!("      <category>{}</category>\n", text(term)));
    }

    item.push_str("    </item>\n");
    Ok(item)
}

/// Escaped XML text content
fn text(s: &str) -> String {
    escape_xml(&strip_invalid_xml_chars(s))
}
