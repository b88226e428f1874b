use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};

/// A scraped page as posted by the browser collector.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeInput {
    pub url: Option<String>,
    pub title: Option<String>,
    pub timestamp: Option<String>,
    pub text: Option<String>,
    pub text_length: Option<usize>,
    pub links: Option<Vec<Link>>,
    pub links_count: Option<usize>,
    pub images: Option<Vec<Image>>,
    pub images_count: Option<usize>,
    pub headings: Option<Vec<Heading>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Link {
    pub href: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Image {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub src: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub alt: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    pub fn alt_text(&self) -> Option<&str> {
        self.alt.as_ref().and_then(|alt| alt.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Heading {
    pub level: HeadingLevel,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub text: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Heading level as sent by the producer: a number (`1`) or a tag name
/// (`"H1"`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(untagged)]
pub enum HeadingLevel {
    Number(i64),
    Name(String),
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingLevel::Number(n) => write!(f, "{}", n),
            HeadingLevel::Name(name) => f.write_str(name),
        }
    }
}

// Outer `None` means the key was absent; `Some(None)` keeps an explicit null
// so echoes reproduce it.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct ProcessedOutput {
    pub original_url: Option<String>,
    pub page_title: Option<String>,
    pub scraped_at: Option<String>,
    pub processed_at: DateTime<Utc>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<Heading>>,
    pub analysis: Analysis,
}

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_stats: Option<LinkStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_stats: Option<ImageStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headings_stats: Option<HeadingStats>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.text_stats.is_none()
            && self.links_stats.is_none()
            && self.images_stats.is_none()
            && self.headings_stats.is_none()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TextStats {
    pub total_length: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub preview: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LinkStats {
    pub total_count: usize,
    pub unique_domains: usize,
    pub internal_links: usize,
    pub external_links: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ImageStats {
    pub total_count: usize,
    pub with_alt_text: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HeadingStats {
    pub total_count: usize,
    pub by_level: BTreeMap<HeadingLevel, usize>,
}

#[derive(Debug, Default, Serialize)]
pub struct Analysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_keywords: Option<Vec<KeywordCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_linked_domains: Option<Vec<DomainCount>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
