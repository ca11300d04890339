use serde::Serialize;

/// Marker appended to `content` when it was cut at the configured cap.
pub const TRUNCATION_MARKER: &str = "...";

/// Hard cap on the raw body dump produced by the degraded fallback path.
pub const FALLBACK_CONTENT_CHARS: usize = 5000;

/// An anchor collected by the full extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Cleaned page text plus metadata, produced fresh per extraction call.
///
/// `error` is set only when structured extraction failed and the degraded
/// raw-body fallback was taken; the value is still usable as context.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedContent {
    pub title: String,
    pub url: String,
    pub content: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub headings: Vec<String>,
    pub links: Vec<Link>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-call extraction configuration.
///
/// The two stock variants mirror the two extraction surfaces of the original
/// tool: `full()` for the primary extractor, `lite()` for the lightweight one.
/// Their caps are independent constants, not one shared invariant.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum `content` chars before the truncation marker is applied.
    pub max_content_chars: usize,
    /// Maximum number of headings collected.
    pub max_headings: usize,
    /// Deepest heading level scanned (4 = h1–h4, 3 = h1–h3).
    pub max_heading_level: u8,
    /// Collect anchor text/URL pairs.
    pub collect_links: bool,
    /// Collect the `meta[name="keywords"]` content attribute.
    pub collect_keywords: bool,
    /// Subtrees matching any of these selectors are skipped entirely.
    pub denylist: Vec<String>,
    /// Main-content candidates, probed in priority order; first match wins.
    pub content_selectors: Vec<String>,
}

const DENYLIST: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "header",
    ".advertisement",
    ".ads",
    ".sidebar",
    ".navigation",
    ".social-share",
    ".comments",
    ".related-posts",
];

const CONTENT_SELECTORS: &[&str] = &["main", "article", ".content", ".main", "#content", "#main"];

impl ExtractOptions {
    /// Primary extractor: 8000-char cap, h1–h4 up to 10, links and keywords.
    pub fn full() -> Self {
        Self {
            max_content_chars: 8000,
            max_headings: 10,
            max_heading_level: 4,
            collect_links: true,
            collect_keywords: true,
            denylist: DENYLIST.iter().map(ToString::to_string).collect(),
            content_selectors: CONTENT_SELECTORS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Lightweight extractor: 5000-char cap, h1–h3 up to 5, no links.
    pub fn lite() -> Self {
        Self {
            max_content_chars: 5000,
            max_headings: 5,
            max_heading_level: 3,
            collect_links: false,
            collect_keywords: false,
            ..Self::full()
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_lite_caps_are_independent() {
        let full = ExtractOptions::full();
        let lite = ExtractOptions::lite();

        assert_eq!(full.max_content_chars, 8000);
        assert_eq!(lite.max_content_chars, 5000);
        assert_eq!(full.max_headings, 10);
        assert_eq!(lite.max_headings, 5);
        assert!(full.collect_links);
        assert!(!lite.collect_links);
    }

    #[test]
    fn lite_keeps_the_shared_denylist() {
        let lite = ExtractOptions::lite();
        assert!(lite.denylist.iter().any(|s| s == ".advertisement"));
        assert_eq!(lite.content_selectors[0], "main");
    }
}
