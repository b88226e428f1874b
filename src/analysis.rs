use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::models::{Analysis, DomainCount, KeywordCount, Link, ScrapeInput};
use crate::config::Limits;

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://([^/]+)").expect("Failed to compile domain pattern")
});

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-z]{4,}\b").expect("Failed to compile keyword pattern")
});

/// Host portion of the first `http(s)://` occurrence in `url`, or an empty
/// string when there is none.
pub fn extract_domain(url: &str) -> &str {
    DOMAIN_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

pub fn analyze(input: &ScrapeInput, limits: &Limits) -> Analysis {
    Analysis {
        top_keywords: input
            .text
            .as_deref()
            .map(|text| top_keywords(text, limits.top_keywords)),
        top_linked_domains: input
            .links
            .as_deref()
            .map(|links| top_domains(links, limits.top_domains)),
    }
}

pub fn top_keywords(text: &str, limit: usize) -> Vec<KeywordCount> {
    let lowered = text.to_lowercase();
    let words = KEYWORD_RE.find_iter(&lowered).map(|m| m.as_str());

    ranked(words, limit)
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect()
}

pub fn top_domains(links: &[Link], limit: usize) -> Vec<DomainCount> {
    let domains = links
        .iter()
        .map(|link| extract_domain(&link.href))
        .filter(|domain| !domain.is_empty());

    ranked(domains, limit)
        .into_iter()
        .map(|(domain, count)| DomainCount { domain, count })
        .collect()
}

// Highest count first; equal counts fall back to lexicographic order.
fn ranked<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *freq.entry(item).or_insert(0) += 1;
    }

    let mut entries: Vec<(&str, usize)> = freq.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(limit);

    entries
        .into_iter()
        .map(|(item, count)| (item.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn link(href: &str) -> Link {
        Link {
            href: href.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn extracts_host_with_port() {
        assert_eq!(extract_domain("https://example.com:8443/path?q=1"), "example.com:8443");
        assert_eq!(extract_domain("http://a.com"), "a.com");
    }

    #[test]
    fn extract_domain_is_empty_without_scheme() {
        assert_eq!(extract_domain("/relative/path"), "");
        assert_eq!(extract_domain("mailto:someone@example.com"), "");
        assert_eq!(extract_domain("ftp://files.example.com/x"), "");
    }

    #[test]
    fn extract_domain_matches_anywhere_in_string() {
        assert_eq!(
            extract_domain("/redirect?to=https://target.org/page"),
            "target.org"
        );
    }

    #[test]
    fn keywords_are_lowercased_and_at_least_four_letters() {
        let top = top_keywords("Rust rust RUST is fun and Fast, fast code", 10);
        assert_eq!(
            top,
            vec![
                KeywordCount { word: "rust".into(), count: 3 },
                KeywordCount { word: "fast".into(), count: 2 },
                KeywordCount { word: "code".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn keywords_skip_tokens_glued_to_digits_or_underscores() {
        let top = top_keywords("word1 _under snake_case plain", 10);
        assert_eq!(top, vec![KeywordCount { word: "plain".into(), count: 1 }]);
    }

    #[test]
    fn keyword_ties_are_lexicographic_and_truncated() {
        let top = top_keywords("delta charlie bravo alpha echo", 3);
        let words: Vec<_> = top.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn empty_text_has_no_keywords() {
        assert!(top_keywords("", 10).is_empty());
    }

    #[test]
    fn domains_skip_unmatched_links() {
        let links = vec![
            link("https://b.com/1"),
            link("https://a.com/1"),
            link("#anchor"),
            link("https://b.com/2"),
            link("javascript:void(0)"),
        ];
        let top = top_domains(&links, 5);
        assert_eq!(
            top,
            vec![
                DomainCount { domain: "b.com".into(), count: 2 },
                DomainCount { domain: "a.com".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn domains_are_capped() {
        let links: Vec<_> = (0..8).map(|i| link(&format!("http://site{}.com/", i))).collect();
        assert_eq!(top_domains(&links, 5).len(), 5);
    }

    #[test]
    fn analyze_only_covers_present_fields() {
        let input = ScrapeInput {
            text: Some("hello hello world".into()),
            ..Default::default()
        };
        let analysis = analyze(&input, &Limits::default());
        assert!(analysis.top_keywords.is_some());
        assert!(analysis.top_linked_domains.is_none());

        let empty = analyze(&ScrapeInput::default(), &Limits::default());
        assert!(empty.top_keywords.is_none());
        assert!(empty.top_linked_domains.is_none());
    }
}
