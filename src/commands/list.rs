//! List blog content

use anyhow::Result;

use crate::content::{Post, PostQuery};
use crate::helpers::format_date;
use crate::taxonomy::{category_counts, tag_counts};
use crate::Blog;

/// List posts, categories or tags
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let posts = blog.get_all_posts(&PostQuery::default()).await?;
    print!("{}", render(&posts, content_type)?);
    Ok(())
}

fn render(posts: &[Post], content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            out.push_str(&format!("Posts ({}):\n", posts.len()));
            for post in posts {
                out.push_str(&format!(
                    "  {} - {} [{}] {} min\n",
                    format_date(&post.date, "YYYY-MM-DD"),
                    post.title,
                    post.url_path,
                    post.read_time
                ));
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(posts);
            out.push_str(&format!("Tags ({}):\n", tags.len()));
            for (tag, count) in tags {
                out.push_str(&format!("  {} ({})\n", tag, count));
            }
        }
        "category" | "categories" => {
            let categories = category_counts(posts);
            out.push_str(&format!("Categories ({}):\n", categories.len()));
            for (category, count) in categories {
                out.push_str(&format!("  {} ({})\n", category, count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::sample_workspace;

    #[tokio::test]
    async fn test_render_listings() {
        let (_dir, workspace) = sample_workspace();
        let blog = workspace.open().unwrap();
        let posts = blog.get_all_posts(&PostQuery::default()).await.unwrap();

        let listing = render(&posts, "post").unwrap();
        assert!(listing.starts_with("Posts (2):\n"));
        assert!(listing.contains("2024-02-01 - Second [/2024/02/second]"));

        assert_eq!(
            render(&posts, "tags").unwrap(),
            "Tags (2):\n  web (2)\n  intro (1)\n"
        );
        assert_eq!(
            render(&posts, "category").unwrap(),
            "Categories (1):\n  Rust (2)\n"
        );
        assert!(render(&posts, "page").is_err());
    }
}
