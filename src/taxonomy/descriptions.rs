//! Category descriptions kept in a front-matter document
//!
//! ```yaml
//! ---
//! rust:
//!   title: Rust
//!   description: "Systems programming without the footguns"
//! ---
//! ```

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::content::split_frontmatter;

/// Category key to its properties (`title`, `description`, ...)
pub type CategoryDescriptions = IndexMap<String, IndexMap<String, String>>;

/// Parse the front-matter block of `doc` into category descriptions.
///
/// Scalar property values are kept as strings; nested values are ignored.
/// A block that is not valid YAML (an unquoted `: ` inside a value, say) is
/// read line by line instead: `key:` at column 0 opens a category and
/// indented `key: value` lines are its properties. A missing block yields
/// an empty map.
pub fn parse_category_descriptions(doc: &str) -> CategoryDescriptions {
    let Some((yaml, _)) = split_frontmatter(doc) else {
        tracing::warn!("Category descriptions have no front-matter block");
        return CategoryDescriptions::new();
    };

    if yaml.trim().is_empty() {
        return CategoryDescriptions::new();
    }

    let parsed: IndexMap<String, IndexMap<String, Value>> = match serde_yaml::from_str(yaml) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("Category descriptions are not valid YAML, reading them line by line: {}", e);
            return parse_lines(yaml);
        }
    };

    parsed
        .into_iter()
        .map(|(category, props)| {
            let props = props
                .into_iter()
                .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key, v)))
                .collect();
            (category, props)
        })
        .collect()
}

fn parse_lines(block: &str) -> CategoryDescriptions {
    let mut descriptions = CategoryDescriptions::new();
    let mut current: Option<String> = None;

    for line in block.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if !line.starts_with([' ', '\t']) {
            current = line
                .trim_end()
                .strip_suffix(':')
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty() && !key.contains(": "));
            if let Some(key) = &current {
                descriptions.entry(key.clone()).or_default();
            }
            continue;
        }

        let Some(category) = &current else { continue };
        if let Some((key, value)) = line.trim().split_once(": ") {
            let props = descriptions.entry(category.clone()).or_default();
            props.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }

    descriptions
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
        .unwrap_or(value)
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
