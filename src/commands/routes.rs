//! Print the paths to prerender

use anyhow::Result;

use crate::content::PostQuery;
use crate::routes::prerender_entries;
use crate::Blog;

pub async fn run(blog: &Blog) -> Result<()> {
    let posts = blog.get_all_posts(&PostQuery::default()).await?;
    let entries = prerender_entries(blog.config(), &posts);
    println!("Routes ({}):", entries.len());
    for entry in entries {
        println!("  {}", entry);
    }
    Ok(())
}
