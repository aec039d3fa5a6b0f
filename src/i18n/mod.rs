//! Internationalization (i18n) support
//!
//! UI strings are looked up in user-supplied overrides first and then in a
//! built-in English table. A message is either plain text, a nested table
//! (resolved with the first argument as sub-key), or a template function
//! that receives the lookup arguments.

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::{is_reserved_key, BlogConfig};
use crate::error::{Error, Result};

/// Template function for parametrized messages
pub type MessageFn = Arc<dyn Fn(&[&str]) -> Result<String> + Send + Sync>;

/// One entry of a message table
#[derive(Clone)]
pub enum MessageValue {
    Text(String),
    Template(MessageFn),
    Table(IndexMap<String, String>),
}

impl MessageValue {
    pub fn text(s: &str) -> Self {
        MessageValue::Text(s.to_string())
    }

    pub fn template<F>(f: F) -> Self
    where
        F: Fn(&[&str]) -> Result<String> + Send + Sync + 'static,
    {
        MessageValue::Template(Arc::new(f))
    }
}

impl fmt::Debug for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            MessageValue::Template(_) => f.write_str("Template(..)"),
            MessageValue::Table(t) => f.debug_tuple("Table").field(t).finish(),
        }
    }
}

/// A flat key -> message table
#[derive(Debug, Clone, Default)]
pub struct MessageTable(IndexMap<String, MessageValue>);

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: MessageValue) -> &mut Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MessageValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Serialized form of a message; templates have none
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Text(String),
    Table(IndexMap<String, String>),
}

impl Serialize for MessageTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.0 {
            match value {
                MessageValue::Text(s) => map.serialize_entry(key, s)?,
                MessageValue::Table(t) => map.serialize_entry(key, t)?,
                MessageValue::Template(_) => {}
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MessageTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = IndexMap::<String, RawMessage>::deserialize(deserializer)?;
        let table = raw
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    RawMessage::Text(s) => MessageValue::Text(s),
                    RawMessage::Table(t) => MessageValue::Table(t),
                };
                (key, value)
            })
            .collect();
        Ok(MessageTable(table))
    }
}

/// Built-in English messages
pub fn default_messages() -> MessageTable {
    let mut table = MessageTable::new();
    table
        .insert("read_more", MessageValue::text("Read more"))
        .insert("load_more", MessageValue::text("Load more"))
        .insert("loading", MessageValue::text("Loading..."))
        .insert("no_posts", MessageValue::text("No posts found."))
        .insert("back_to_blog", MessageValue::text("Back to blog"))
        .insert("all_posts", MessageValue::text("All posts"))
        .insert("categories", MessageValue::text("Categories"))
        .insert("tags", MessageValue::text("Tags"))
        .insert("similar_posts", MessageValue::text("Similar posts"))
        .insert("share", MessageValue::text("Share"))
        .insert("table_of_contents", MessageValue::text("Table of contents"))
        .insert("not_found", MessageValue::text("Page not found"))
        .insert("server_error", MessageValue::text("Something went wrong"))
        .insert(
            "min_read",
            MessageValue::template(|args| {
                let minutes = parse_count(args, "min_read")?;
                Ok(format!("{} min read", minutes))
            }),
        )
        .insert(
            "post_count",
            MessageValue::template(|args| {
                let count = parse_count(args, "post_count")?;
                Ok(match count {
                    0 => "No posts".to_string(),
                    1 => "1 post".to_string(),
                    n => format!("{} posts", n),
                })
            }),
        )
        .insert(
            "posted_in",
            MessageValue::template(|args| match args.first() {
                Some(category) => Ok(format!("Posted in {}", category)),
                None => Err(Error::Validation("posted_in needs a category".into())),
            }),
        )
        .insert(
            "by_author",
            MessageValue::template(|args| match args.first() {
                Some(author) => Ok(format!("By {}", author)),
                None => Err(Error::Validation("by_author needs an author".into())),
            }),
        )
        .insert(
            "category_titles",
            MessageValue::Table(
                [
                    ("tutorial", "Tutorials"),
                    ("news", "News"),
                    ("guide", "Guides"),
                    ("opinion", "Opinion"),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ),
        );
    table
}

fn parse_count(args: &[&str], key: &str) -> Result<u64> {
    let raw = args
        .first()
        .ok_or_else(|| Error::Validation(format!("{} needs a count argument", key)))?;
    raw.trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{}: {:?} is not a number", key, raw)))
}

/// Shallow merge of user messages over the built-in defaults
pub fn merged_messages(user: &MessageTable) -> MessageTable {
    let mut merged = default_messages();
    for (key, value) in &user.0 {
        merged.0.insert(key.clone(), value.clone());
    }
    merged
}

/// Message getter bound to a set of user overrides
#[derive(Debug, Clone)]
pub struct Messages {
    user: MessageTable,
    defaults: MessageTable,
}

impl Messages {
    /// Create a getter over `user` overrides
    pub fn new(user: MessageTable) -> Self {
        Self {
            user,
            defaults: default_messages(),
        }
    }

    /// Getter using the configured overrides for `lang`
    pub fn for_language(config: &BlogConfig, lang: &str) -> Self {
        let user = config.i18n.messages.get(lang).cloned().unwrap_or_default();
        Self::new(user)
    }

    /// Resolve `key`, returning `fallback` (or the key itself) when nothing
    /// usable is found.
    pub fn get(&self, key: &str, fallback: Option<&str>, args: &[&str]) -> String {
        if key.is_empty() || is_reserved_key(key) {
            tracing::warn!("Rejected message key {:?}", key);
            return fallback.unwrap_or_default().to_string();
        }

        let miss = || fallback.unwrap_or(key).to_string();

        let Some(value) = self.user.get(key).or_else(|| self.defaults.get(key)) else {
            return miss();
        };

        match value {
            MessageValue::Text(s) => s.clone(),
            MessageValue::Template(f) => match f(args) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Message {:?} failed to render: {}", key, e);
                    miss()
                }
            },
            MessageValue::Table(table) => args
                .first()
                .and_then(|sub| table.get(*sub))
                .cloned()
                .unwrap_or_else(miss),
        }
    }

    /// Shorthand for a lookup without fallback or arguments
    pub fn text(&self, key: &str) -> String {
        self.get(key, None, &[])
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(MessageTable::new())
    }
}
