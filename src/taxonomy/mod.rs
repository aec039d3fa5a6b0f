//! Categories and tags derived from the post list
//!
//! Terms are not stored anywhere: every listing is computed from the
//! current posts. A term is identified by its display string; URLs use the
//! slugified form.

mod descriptions;

pub use descriptions::{parse_category_descriptions, CategoryDescriptions};

use indexmap::IndexMap;

use crate::content::Post;
use crate::helpers::slugify;

/// Categories of a post: the array field wins over the single field
pub fn post_categories(post: &Post) -> Vec<String> {
    if !post.categories.is_empty() {
        post.categories.clone()
    } else {
        post.category.iter().cloned().collect()
    }
}

/// Tags of a post
pub fn post_tags(post: &Post) -> Vec<String> {
    post.tags.clone()
}

/// Category names with their post counts, most used first.
/// Ties keep first-seen order.
pub fn category_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for post in posts {
        for category in &post.categories {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
        if let Some(category) = &post.category {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
    }
    sorted_by_count(counts)
}

/// Tag names with their post counts, most used first
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    sorted_by_count(counts)
}

fn sorted_by_count(counts: IndexMap<String, usize>) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

/// Up to `limit` category names, most used first
pub fn all_categories(posts: &[Post], limit: usize) -> Vec<String> {
    category_counts(posts)
        .into_iter()
        .take(limit)
        .map(|(name, _)| name)
        .collect()
}

/// Up to `limit` tag names, most used first
pub fn all_tags(posts: &[Post], limit: usize) -> Vec<String> {
    tag_counts(posts)
        .into_iter()
        .take(limit)
        .map(|(name, _)| name)
        .collect()
}

fn any_slug_matches<'a, I>(terms: I, slug: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    terms.into_iter().any(|term| slugify(term) == slug)
}

fn category_match(post: &Post, slug: &str) -> bool {
    any_slug_matches(&post.categories, slug) || any_slug_matches(&post.category, slug)
}

fn tag_match(post: &Post, slug: &str) -> bool {
    any_slug_matches(&post.tags, slug)
}

/// Posts filed under the category with slug `slug`.
///
/// A post whose only match is a tag of the same name is not included, so
/// a `JavaScript` tag never puts a post on the `JavaScript` category page.
pub fn filter_posts_by_category(posts: &[Post], slug: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| category_match(post, slug))
        .cloned()
        .collect()
}

/// Posts tagged with the tag whose slug is `slug`; a category of the same
/// name does not count.
pub fn filter_posts_by_tag(posts: &[Post], slug: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| tag_match(post, slug))
        .cloned()
        .collect()
}

/// First term whose slug equals `slug`
pub fn find_taxonomy_name<'a>(slug: &str, terms: &'a [String]) -> Option<&'a str> {
    terms
        .iter()
        .find(|term| slugify(term) == slug)
        .map(String::as_str)
}

/// Display name for `slug`, or `slug` itself when no term matches
pub fn original_taxonomy_name(slug: &str, terms: &[String]) -> String {
    find_taxonomy_name(slug, terms).unwrap_or(slug).to_string()
}

/// Posts related to the one at `exclude_path`.
///
/// A post scores 5 for sharing `category` and 2 for each shared tag;
/// unrelated posts are dropped and ties keep list order.
pub fn similar_posts(
    all_posts: &[Post],
    exclude_path: &str,
    category: Option<&str>,
    tags: &[String],
    count: usize,
) -> Vec<Post> {
    let mut scored: Vec<(usize, &Post)> = all_posts
        .iter()
        .filter(|post| post.url_path != exclude_path)
        .map(|post| {
            let mut score = 0;
            if let Some(category) = category {
                if post_categories(post).iter().any(|c| c == category) {
                    score += 5;
                }
            }
            score += 2 * post.tags.iter().filter(|t| tags.contains(t)).count();
            (score, post)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(count)
        .map(|(_, post)| post.clone())
        .collect()
}
