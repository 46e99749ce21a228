use super::error::ScrapeError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Always stripped before anything else.
pub const DEFAULT_NOISE_SELECTOR: &str = "script, style, nav, header, footer, aside";

/// Common main-content markers, tried when no include list matched.
pub const MAIN_CONTENT_SELECTOR: &str = "main, article, .content, #content, .main";

/// Elements whose text stands apart from its neighbours.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr",
    "ul",
];

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Trim, then collapse every whitespace run (newlines and tabs included) to a
/// single space.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text.trim(), " ").into_owned()
}

/// Extract readable text from an HTML page.
///
/// `exclude_tags` and `include_tags` are normalized selector lists, usually
/// straight from [`super::validate::ValidatedRequest`].
pub fn extract_text(
    html: &str,
    exclude_tags: Option<&str>,
    include_tags: Option<&str>,
) -> Result<String, ScrapeError> {
    if !html.contains("<html") && !html.contains("<body") {
        let preview: String = html.chars().take(200).collect();
        warn!("Response doesn't appear to be HTML: {}", preview);
    }

    let mut document = Html::parse_document(html);

    remove_matching(&mut document, DEFAULT_NOISE_SELECTOR);
    if let Some(exclude) = exclude_tags {
        remove_matching(&mut document, exclude);
    }

    let mut raw = include_tags
        .map(|include| select_text(&document, include))
        .unwrap_or_default();

    if raw.trim().is_empty() {
        raw = select_text(&document, MAIN_CONTENT_SELECTOR);
        if raw.trim().is_empty() {
            debug!("No main-content region matched; using whole body");
            raw = select_text(&document, "body");
        }
    }

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ScrapeError::NoContent);
    }
    Ok(text)
}

/// Detach every element matching `selector`. The tree belongs to this request
/// alone, so in-place removal is safe.
fn remove_matching(document: &mut Html, selector: &str) {
    let Ok(selector) = Selector::parse(selector) else {
        warn!("Skipping unparsable selector: {}", selector);
        return;
    };
    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Text of all matching elements, one space between elements.
fn select_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        warn!("Skipping unparsable selector: {}", selector);
        return String::new();
    };
    document
        .select(&selector)
        .map(|el| {
            let mut text = String::new();
            push_text(el, &mut text);
            text
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inline text runs stay glued; block elements are padded with spaces so
/// adjacent paragraphs and cells do not run together.
fn push_text(element: ElementRef<'_>, out: &mut String) {
    let block = BLOCK_ELEMENTS.contains(&element.value().name());
    if block {
        out.push(' ');
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            push_text(child, out);
        }
    }
    if block {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_content_is_excluded_by_default() {
        let text = extract_text("<body><script>x</script><p>Hello</p></body>", None, None).unwrap();
        assert_eq!(text, "Hello");
    }

    #[test]
    fn include_tags_concatenate_every_match() {
        let html = "<html><body><div>skip me</div><p>A</p><p>B</p></body></html>";
        let text = extract_text(html, None, Some("p")).unwrap();
        assert!(text.contains('A'));
        assert!(text.contains('B'));
        assert!(!text.contains("skip"));
    }

    #[test]
    fn falls_back_to_main_region_when_include_matches_nothing() {
        let html = "<body><div>sidebar</div><main>Decision text</main></body>";
        assert_eq!(extract_text(html, None, Some("table")).unwrap(), "Decision text");
    }

    #[test]
    fn main_region_preferred_over_body() {
        let html = r#"<body><div>menu</div><div id="content">Reasons for judgment</div></body>"#;
        assert_eq!(extract_text(html, None, None).unwrap(), "Reasons for judgment");
    }

    #[test]
    fn falls_back_to_body() {
        let html = "<body><div>Only <b>plain</b> divs</div></body>";
        assert_eq!(extract_text(html, None, None).unwrap(), "Only plain divs");
    }

    #[test]
    fn exclude_and_default_noise_are_cumulative() {
        let html = "<body><nav>Home</nav><table><tr><td>cells</td></tr></table><p>Kept</p><footer>(c)</footer></body>";
        let text = extract_text(html, Some("table"), None).unwrap();
        assert_eq!(text, "Kept");
    }

    #[test]
    fn block_elements_are_separated_inline_runs_are_not() {
        let html = "<body><div>First</div><div>Second</div><p>un<b>usual</b> <i>word</i></p></body>";
        assert_eq!(extract_text(html, None, None).unwrap(), "First Second unusual word");
    }

    #[test]
    fn table_cells_do_not_run_together() {
        let html = "<body><table><tr><td>2024 ONCA 1</td><td>A v B</td></tr></table></body>";
        assert_eq!(extract_text(html, None, Some("table")).unwrap(), "2024 ONCA 1 A v B");
    }

    #[test]
    fn exclude_applies_even_with_include() {
        let html = "<body><p>Keep <span class=\"fn\">note</span> this</p></body>";
        let text = extract_text(html, Some(".fn"), Some("p")).unwrap();
        assert_eq!(text, "Keep this");
    }

    #[test]
    fn whitespace_is_collapsed() {
        let html = "<body><p>  line one\n\n\tline   two  </p></body>";
        assert_eq!(extract_text(html, None, None).unwrap(), "line one line two");
    }

    #[test]
    fn empty_after_stripping_is_an_error() {
        let html = "<html><body><header>Top</header><script>var a;</script>  \n </body></html>";
        assert_eq!(extract_text(html, None, None), Err(ScrapeError::NoContent));
    }

    #[test]
    fn non_html_body_is_still_extracted() {
        assert_eq!(extract_text("plain text body", None, None).unwrap(), "plain text body");
    }

    #[test]
    fn normalize_whitespace_flattens_newlines_and_tabs() {
        assert_eq!(normalize_whitespace("\n a\tb \r\n c \n"), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
