use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::analysis::{analyze, extract_domain};
use crate::api::models::{
    Heading, HeadingStats, Image, ImageStats, Link, LinkStats, ProcessedOutput, ScrapeInput,
    Summary, TextStats,
};
use crate::config::Limits;
use crate::error::{AppError, Result};

/// Turns a raw request body into a `ScrapeInput`.
///
/// Empty bodies and JSON values that carry nothing (`null`, `{}`, `[]`, `""`,
/// `0`, `false`) are rejected as missing input. Bodies that are not JSON are
/// malformed. JSON that does not fit the page schema is a processing failure.
pub fn parse_input(body: &[u8]) -> Result<ScrapeInput> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::MissingInput);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| AppError::MalformedInput(e.to_string()))?;

    if is_blank(&value) {
        return Err(AppError::MissingInput);
    }

    serde_json::from_value(value).map_err(|e| AppError::ProcessingFailure(e.to_string()))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

pub fn process(input: ScrapeInput, limits: &Limits, processed_at: DateTime<Utc>) -> Result<ProcessedOutput> {
    let mut summary = Summary::default();

    if let Some(text) = input.text.as_deref() {
        summary.text_stats = Some(text_stats(text, input.text_length, limits.preview_chars));
    }

    if let Some(links) = input.links.as_deref() {
        summary.links_stats = Some(link_stats(input.url.as_deref(), links, input.links_count)?);
    }

    if let Some(images) = input.images.as_deref() {
        summary.images_stats = Some(image_stats(images, input.images_count));
    }

    if let Some(headings) = input.headings.as_deref() {
        summary.headings_stats = Some(heading_stats(headings));
    }

    let analysis = analyze(&input, limits);

    Ok(ProcessedOutput {
        original_url: input.url,
        page_title: input.title,
        scraped_at: input.timestamp,
        processed_at,
        summary,
        links: input.links.map(|links| truncated(links, limits.max_links)),
        images: input.images.map(|images| truncated(images, limits.max_images)),
        headings: input.headings.map(|headings| truncated(headings, limits.max_headings)),
        analysis,
    })
}

pub fn text_stats(text: &str, reported_length: Option<usize>, preview_chars: usize) -> TextStats {
    TextStats {
        total_length: reported_length.unwrap_or_else(|| text.chars().count()),
        word_count: text.split_whitespace().count(),
        line_count: text.split('\n').count(),
        preview: preview(text, preview_chars),
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Classifies links as internal when the page's host segment (third
/// `/`-delimited piece of the page URL) appears anywhere in the href.
pub fn link_stats(page_url: Option<&str>, links: &[Link], reported_count: Option<usize>) -> Result<LinkStats> {
    let unique_domains = links
        .iter()
        .map(|link| extract_domain(&link.href))
        .collect::<HashSet<_>>()
        .len();

    let mut internal_links = 0;
    if !links.is_empty() {
        let host = host_segment(page_url.unwrap_or(""))?;
        internal_links = links.iter().filter(|link| link.href.contains(host)).count();
    }

    Ok(LinkStats {
        total_count: reported_count.unwrap_or(links.len()),
        unique_domains,
        internal_links,
        external_links: links.len() - internal_links,
    })
}

fn host_segment(page_url: &str) -> Result<&str> {
    page_url.split('/').nth(2).ok_or_else(|| {
        AppError::ProcessingFailure(format!(
            "cannot classify links: page url {:?} has no host segment",
            page_url
        ))
    })
}

pub fn image_stats(images: &[Image], reported_count: Option<usize>) -> ImageStats {
    ImageStats {
        total_count: reported_count.unwrap_or(images.len()),
        with_alt_text: images
            .iter()
            .filter(|img| img.alt_text().is_some_and(|alt| !alt.is_empty()))
            .count(),
    }
}

pub fn heading_stats(headings: &[Heading]) -> HeadingStats {
    let mut by_level = BTreeMap::new();
    for heading in headings {
        *by_level.entry(heading.level.clone()).or_insert(0) += 1;
    }

    HeadingStats {
        total_count: headings.len(),
        by_level,
    }
}

fn truncated<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    items.truncate(max);
    items
}
