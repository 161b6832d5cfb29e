// Pagination descriptors and Link header parsing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 30;

static LINK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]*)>;\s*rel="([^"]*)""#).expect("link entry pattern is valid")
});

/// Parse a `Link` header into a relation → URL map.
///
/// Entries that do not look like `<url>; rel="name"` are skipped. A missing
/// or empty header yields an empty map.
pub fn parse_link_header(header: Option<&str>) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();

    let Some(header) = header else {
        return links;
    };

    for entry in header.split(',') {
        if let Some(caps) = LINK_ENTRY.captures(entry) {
            links.insert(caps[2].to_string(), caps[1].to_string());
        }
    }

    links
}

/// Uniform pagination descriptor attached to list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, String>>,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            total_count: None,
            links: None,
        }
    }

    /// Attach continuation links; an empty map leaves `links` unset.
    pub fn with_links(mut self, links: BTreeMap<String, String>) -> Self {
        self.links = (!links.is_empty()).then_some(links);
        self
    }

    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }
}

/// Envelope returned by every list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> ResultEnvelope<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GITHUB_LINK: &str = r#"<https://api.github.com/repositories/1/issues?page=2>; rel="next", <https://api.github.com/repositories/1/issues?page=5>; rel="last""#;

    #[test]
    fn test_parse_link_header() {
        let links = parse_link_header(Some(GITHUB_LINK));

        assert_eq!(links.len(), 2);
        assert_eq!(
            links["next"],
            "https://api.github.com/repositories/1/issues?page=2"
        );
        assert_eq!(
            links["last"],
            "https://api.github.com/repositories/1/issues?page=5"
        );
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(
            parse_link_header(Some(GITHUB_LINK)),
            parse_link_header(Some(GITHUB_LINK))
        );
    }

    #[test]
    fn test_missing_or_empty_header() {
        assert!(parse_link_header(None).is_empty());
        assert!(parse_link_header(Some("")).is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let links = parse_link_header(Some(r#"garbage, <u1>; rel="next", <u2> rel=prev"#));

        assert_eq!(links.len(), 1);
        assert_eq!(links["next"], "u1");
    }

    #[test]
    fn test_pagination_serialization() {
        let plain = serde_json::to_value(Pagination::new(1, 30)).unwrap();
        assert_eq!(plain, serde_json::json!({ "page": 1, "per_page": 30 }));

        let search = Pagination::new(2, 10)
            .with_total_count(7)
            .with_links(parse_link_header(Some(r#"<u1>; rel="prev""#)));
        let value = serde_json::to_value(search).unwrap();
        assert_eq!(value["total_count"], 7);
        assert_eq!(value["links"]["prev"], "u1");
    }

    #[test]
    fn test_empty_links_are_omitted() {
        let pagination = Pagination::new(1, 30).with_links(BTreeMap::new());
        assert!(pagination.links.is_none());
    }
}
