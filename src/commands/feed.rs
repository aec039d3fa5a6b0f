//! Print the RSS feed

use anyhow::Result;

use crate::content::PostQuery;
use crate::feed::{generate_rss_feed, FeedOptions};
use crate::Blog;

/// Build the feed, optionally for a different site URL than configured
pub async fn build(blog: &Blog, site_url: Option<String>) -> Result<String> {
    let config = blog.config();
    let mut options = FeedOptions::from_config(config);
    if site_url.is_some() {
        options.site_url = site_url;
    }

    let posts = blog
        .get_all_posts(&PostQuery::new(config.default_language()))
        .await?;
    Ok(generate_rss_feed(&posts, &options)?)
}

pub async fn run(blog: &Blog, site_url: Option<String>) -> Result<()> {
    print!("{}", build(blog, site_url).await?);
    Ok(())
}
