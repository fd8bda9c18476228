//! Search query and crawl request models.

use serde::{Deserialize, Serialize};

/// Topical terms every search is restricted to
pub const RELATED_TERMS: &[&str] = &[
    "antibody",
    "immunoassay",
    "ELISA",
    "flow cytometry",
    "western blot",
    "immunohistochemistry",
    "neutralization",
    "immunoprecipitation",
    "therapeutic",
    "vaccine",
    "diagnostic",
    "protein expression",
    "protein localization",
    "signaling pathway",
    "protein-protein interaction",
    "gene regulation",
    "knockout",
    "cellular function",
    "disease association",
    "biomarker",
    "drug development",
    "molecular mechanism",
];

/// Default cap on emitted articles per crawl
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// An opaque search string for the literature site.
///
/// Built from a target term plus the fixed [`RELATED_TERMS`]; immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    query: String,
}

impl SearchQuery {
    /// Wrap an already-built search string
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Build the search string for a target term.
    ///
    /// The target group is omitted when `target_term` is blank.
    pub fn for_target(target_term: &str) -> Self {
        let target = target_term.trim();
        let mut parts = Vec::new();

        if !target.is_empty() {
            parts.push(format!(
                "(\"{0}\"[Title/Abstract] OR \"{0} protein\"[Title/Abstract])",
                target
            ));
        }

        parts.push("(".to_string());
        parts.push(
            RELATED_TERMS
                .iter()
                .map(|term| format!("\"{}\"[Title/Abstract]", term))
                .collect::<Vec<_>>()
                .join(" OR "),
        );
        parts.push(")".to_string());

        Self::new(parts.join(" "))
    }

    /// The raw search string
    pub fn as_str(&self) -> &str {
        &self.query
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.query)
    }
}

/// Parameters of one crawl run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// Protein or topic the caller is prospecting for
    pub target_term: String,

    /// Maximum number of articles to emit
    pub max_results: usize,

    /// Reject articles whose first author has more search hits than this
    pub max_publications: Option<u32>,
}

impl Default for CrawlRequest {
    fn default() -> Self {
        Self {
            target_term: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
            max_publications: None,
        }
    }
}

impl CrawlRequest {
    /// Create a new crawl request for a target term
    pub fn new(target_term: impl Into<String>) -> Self {
        Self {
            target_term: target_term.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the publication cap
    pub fn max_publications(mut self, cap: u32) -> Self {
        self.max_publications = Some(cap);
        self
    }

    /// Build the search query for this request
    pub fn query(&self) -> SearchQuery {
        SearchQuery::for_target(&self.target_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_with_target() {
        let query = SearchQuery::for_target("CD47");
        let s = query.as_str();

        assert!(s.starts_with(
            "(\"CD47\"[Title/Abstract] OR \"CD47 protein\"[Title/Abstract]) ( "
        ));
        assert!(s.contains("\"ELISA\"[Title/Abstract] OR \"flow cytometry\"[Title/Abstract]"));
        assert!(s.ends_with("\"molecular mechanism\"[Title/Abstract] )"));
    }

    #[test]
    fn test_query_without_target() {
        let query = SearchQuery::for_target("  ");
        assert!(query.as_str().starts_with("( \"antibody\"[Title/Abstract]"));
        assert_eq!(query.as_str().matches(" OR ").count(), RELATED_TERMS.len() - 1);
    }

    #[test]
    fn test_crawl_request_defaults() {
        let request = CrawlRequest::new("PD-L1");
        assert_eq!(request.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(request.max_publications, None);

        let request = request.max_results(5).max_publications(30);
        assert_eq!(request.max_results, 5);
        assert_eq!(request.max_publications, Some(30));
        assert!(request.query().as_str().contains("PD-L1 protein"));
    }
}
