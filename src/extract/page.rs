use super::types::{
    ExtractOptions, ExtractedContent, FALLBACK_CONTENT_CHARS, Link, TRUNCATION_MARKER,
};
use anyhow::{Result, anyhow};
use chrono::{SecondsFormat, Utc};
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Extract cleaned text plus metadata from an HTML document.
///
/// Never fails: if structured extraction errors for any reason, the result
/// degrades to title + URL + a raw body dump with `error` set, so callers
/// always get usable context back.
pub fn extract(html: &str, url: &str, opts: &ExtractOptions) -> ExtractedContent {
    let document = Html::parse_document(html);

    match extract_structured(&document, url, opts) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(url, error = %e, "structured extraction failed, degrading to raw body text");
            degraded(&document, url, &e)
        }
    }
}

fn extract_structured(
    document: &Html,
    url: &str,
    opts: &ExtractOptions,
) -> Result<ExtractedContent> {
    let denylist = opts
        .denylist
        .iter()
        .map(|s| parse_selector(s))
        .collect::<Result<Vec<_>>>()?;

    let region = content_region(document, &opts.content_selectors, &denylist)?;

    let mut raw = String::new();
    collect_text(region, &denylist, &mut raw);
    let normalized = normalize_whitespace(&raw);
    let content = truncate_text(&normalized, opts.max_content_chars);

    Ok(ExtractedContent {
        title: page_title(document),
        url: url.to_string(),
        content,
        meta_description: meta_content(document, "description")?,
        meta_keywords: if opts.collect_keywords {
            meta_content(document, "keywords")?
        } else {
            String::new()
        },
        headings: headings(document, opts)?,
        links: if opts.collect_links {
            links(document, url)?
        } else {
            Vec::new()
        },
        timestamp: now_rfc3339(),
        error: None,
    })
}

/// Raw fallback shape: whatever body text we can get, hard-capped, no
/// structured cleanup. The cap is applied without the truncation marker.
fn degraded(document: &Html, url: &str, cause: &anyhow::Error) -> ExtractedContent {
    let body_text = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element())
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    ExtractedContent {
        title: page_title(document),
        url: url.to_string(),
        content: body_text.chars().take(FALLBACK_CONTENT_CHARS).collect(),
        meta_description: String::new(),
        meta_keywords: String::new(),
        headings: Vec::new(),
        links: Vec::new(),
        timestamp: now_rfc3339(),
        error: Some(format!("failed to extract structured content: {cause}")),
    }
}

/// Probe candidate selectors in priority order; fall back to `body`, then to
/// the document root for fragments without one.
///
/// Denylist removal precedes the probe, so a candidate sitting inside a
/// denylisted container does not exist for selection purposes.
fn content_region<'a>(
    document: &'a Html,
    candidates: &[String],
    denylist: &[Selector],
) -> Result<ElementRef<'a>> {
    for candidate in candidates {
        let sel = parse_selector(candidate)?;
        if let Some(element) = document
            .select(&sel)
            .find(|el| !in_denylisted_subtree(*el, denylist))
        {
            return Ok(element);
        }
    }

    let body = parse_selector("body")?;
    Ok(document
        .select(&body)
        .next()
        .unwrap_or_else(|| document.root_element()))
}

fn in_denylisted_subtree(element: ElementRef<'_>, denylist: &[Selector]) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| denylist.iter().any(|sel| sel.matches(&el)))
}

/// Walk the region depth-first, appending text nodes. A subtree is skipped
/// wholesale as soon as its root matches any denylist selector.
fn collect_text(element: ElementRef<'_>, denylist: &[Selector], out: &mut String) {
    if denylist.iter().any(|sel| sel.matches(&element)) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text.text);
                out.push(' ');
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, denylist, out);
                }
            }
            _ => {}
        }
    }
}

fn page_title(document: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn meta_content(document: &Html, name: &str) -> Result<String> {
    let sel = parse_selector(&format!(r#"meta[name="{name}"]"#))?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string())
}

fn headings(document: &Html, opts: &ExtractOptions) -> Result<Vec<String>> {
    let levels: Vec<String> = (1..=u32::from(opts.max_heading_level))
        .map(|level| format!("h{level}"))
        .collect();
    let sel = parse_selector(&levels.join(", "))?;

    Ok(document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .take(opts.max_headings)
        .collect())
}

fn links(document: &Html, base_url: &str) -> Result<Vec<Link>> {
    let sel = parse_selector("a[href]")?;
    let base = Url::parse(base_url).ok();

    Ok(document
        .select(&sel)
        .filter_map(|el| {
            let text = el.text().collect::<String>().trim().to_string();
            let chars = text.chars().count();
            if chars == 0 || chars >= 100 {
                return None;
            }
            let href = el.value().attr("href")?;
            let url = base
                .as_ref()
                .and_then(|b| b.join(href).ok())
                .map_or_else(|| href.to_string(), |resolved| resolved.to_string());
            Some(Link { text, url })
        })
        .take(20)
        .collect())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}{TRUNCATION_MARKER}")
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/page";

    fn extract_full(html: &str) -> ExtractedContent {
        extract(html, URL, &ExtractOptions::full())
    }

    #[test]
    fn denylisted_elements_are_removed() {
        let html = r#"<html><body>
            <nav>Navigation junk</nav>
            <div class="advertisement">Buy now</div>
            <div class="social-share">Share this</div>
            <p>Real article text</p>
            <footer>Copyright junk</footer>
        </body></html>"#;

        let result = extract_full(html);

        assert!(result.content.contains("Real article text"));
        assert!(!result.content.contains("Navigation junk"));
        assert!(!result.content.contains("Buy now"));
        assert!(!result.content.contains("Share this"));
        assert!(!result.content.contains("Copyright junk"));
    }

    #[test]
    fn denylist_removes_nested_subtrees() {
        let html = r#"<html><body><div class="sidebar"><p>Deeply <b>nested</b> noise</p></div><p>Keep me</p></body></html>"#;
        let result = extract_full(html);
        assert_eq!(result.content, "Keep me");
    }

    #[test]
    fn main_region_wins_over_body() {
        let html = r#"<html><body><p>Outside</p><main><p>Inside main</p></main></body></html>"#;
        let result = extract_full(html);
        assert_eq!(result.content, "Inside main");
    }

    #[test]
    fn probe_order_prefers_main_over_article() {
        let html = r#"<html><body><article><p>From article</p></article><main><p>From main</p></main></body></html>"#;
        let result = extract_full(html);
        assert_eq!(result.content, "From main");
    }

    #[test]
    fn candidate_inside_denylisted_container_is_skipped() {
        let html = r#"<html><body>
            <div class="sidebar"><div class="content"><p>Sidebar junk</p></div></div>
            <p>Real article text</p>
        </body></html>"#;

        let result = extract_full(html);

        assert!(result.content.contains("Real article text"));
        assert!(!result.content.contains("Sidebar junk"));
    }

    #[test]
    fn denylisted_candidate_falls_through_to_next() {
        let html = r#"<html><body>
            <main class="ads">Sponsored</main>
            <article><p>The story</p></article>
        </body></html>"#;

        let result = extract_full(html);

        assert_eq!(result.content, "The story");
    }

    #[test]
    fn content_class_is_probed() {
        let html = r#"<html><body><div class="content"><p>Classed content</p></div><p>Rest</p></body></html>"#;
        let result = extract_full(html);
        assert_eq!(result.content, "Classed content");
    }

    #[test]
    fn falls_back_to_whole_body_still_filtered() {
        let html = r#"<html><body><script>var x = 1;</script><p>Plain body text</p></body></html>"#;
        let result = extract_full(html);
        assert_eq!(result.content, "Plain body text");
        assert!(!result.content.contains("var x"));
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        let html = "<html><body><p>  a\n\n   b\t\tc  </p></body></html>";
        let result = extract_full(html);
        assert_eq!(result.content, "a b c");
    }

    #[test]
    fn truncation_appends_marker() {
        let body = "word ".repeat(3000);
        let html = format!("<html><body><p>{body}</p></body></html>");
        let result = extract_full(&html);

        assert!(result.content.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            result.content.chars().count(),
            8000 + TRUNCATION_MARKER.len()
        );
    }

    #[test]
    fn short_content_is_not_marked() {
        let result = extract_full("<html><body><p>short</p></body></html>");
        assert_eq!(result.content, "short");
    }

    #[test]
    fn headings_capped_in_document_order_empty_excluded() {
        let mut body = String::from("<h2>Second</h2><h1>First</h1><h3>   </h3>");
        for i in 0..12 {
            body.push_str(&format!("<h4>H{i}</h4>"));
        }
        let html = format!("<html><body>{body}</body></html>");

        let result = extract_full(&html);

        assert_eq!(result.headings.len(), 10);
        assert_eq!(result.headings[0], "Second");
        assert_eq!(result.headings[1], "First");
        assert!(!result.headings.iter().any(String::is_empty));
    }

    #[test]
    fn lite_skips_h4_and_caps_at_five() {
        let html = r#"<html><body>
            <h1>A</h1><h2>B</h2><h3>C</h3><h4>Deep</h4>
            <h1>D</h1><h1>E</h1><h1>F</h1>
        </body></html>"#;

        let result = extract(html, URL, &ExtractOptions::lite());

        assert_eq!(result.headings, vec!["A", "B", "C", "D", "E"]);
        assert!(result.links.is_empty());
        assert!(result.meta_keywords.is_empty());
    }

    #[test]
    fn links_filtered_by_text_length_and_capped() {
        let long_text = "x".repeat(100);
        let mut body = format!(
            r#"<a href="/a">Good</a><a href="/b"></a><a href="/c">{long_text}</a>"#
        );
        for i in 0..25 {
            body.push_str(&format!(r#"<a href="/n{i}">Link {i}</a>"#));
        }
        let html = format!("<html><body>{body}</body></html>");

        let result = extract_full(&html);

        assert_eq!(result.links.len(), 20);
        assert!(result.links.iter().all(|l| {
            let n = l.text.chars().count();
            n > 0 && n < 100
        }));
        assert_eq!(result.links[0].text, "Good");
        assert_eq!(result.links[0].url, "https://example.com/a");
    }

    #[test]
    fn meta_description_and_keywords_collected() {
        let html = r#"<html><head>
            <meta name="description" content="A fine page">
            <meta name="keywords" content="rust, html">
        </head><body><p>x</p></body></html>"#;

        let result = extract_full(html);

        assert_eq!(result.meta_description, "A fine page");
        assert_eq!(result.meta_keywords, "rust, html");
    }

    #[test]
    fn missing_meta_yields_empty_strings() {
        let result = extract_full("<html><body><p>x</p></body></html>");
        assert_eq!(result.meta_description, "");
        assert_eq!(result.meta_keywords, "");
    }

    #[test]
    fn extraction_never_fails_degrades_with_error_marker() {
        let mut opts = ExtractOptions::full();
        opts.denylist.push(":::not-a-selector".to_string());

        let html = "<html><head><title>Broken</title></head><body><p>Body words</p></body></html>";
        let result = extract(html, URL, &opts);

        assert!(result.error.is_some());
        assert_eq!(result.title, "Broken");
        assert_eq!(result.url, URL);
        assert!(result.content.contains("Body words"));
        assert!(result.content.chars().count() <= FALLBACK_CONTENT_CHARS);
        assert!(result.headings.is_empty());
    }

    #[test]
    fn degraded_body_dump_is_hard_capped() {
        // No default candidate matches this document, so the probe reaches
        // the malformed selector and the degraded path takes over.
        let mut opts = ExtractOptions::full();
        opts.content_selectors.push("!!bad".to_string());

        let body = "a".repeat(6000);
        let html = format!("<html><body>{body}</body></html>");
        let result = extract(&html, URL, &opts);

        assert!(result.error.is_some());
        assert_eq!(result.content.chars().count(), FALLBACK_CONTENT_CHARS);
    }

    #[test]
    fn end_to_end_long_body_without_main() {
        let body = "Hello world. ".repeat(700); // > 9000 chars
        let html = format!("<html><head><title>Example</title></head><body>{body}</body></html>");

        let result = extract_full(&html);

        assert_eq!(result.title, "Example");
        assert!(result.content.chars().count() <= 8000 + TRUNCATION_MARKER.len());
        assert!(result.content.ends_with(TRUNCATION_MARKER));
        assert!(result.error.is_none());
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let result = extract_full("<html><body><p>x</p></body></html>");
        assert!(chrono::DateTime::parse_from_rfc3339(&result.timestamp).is_ok());
    }
}
