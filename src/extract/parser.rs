//! Table-of-contents parser
//!
//! The first `<article>` of the thread page is the story's index post. Its
//! first `<div>` carries the post title, and its anchors, in document order,
//! link to the chapters until an anchor whose text equals the sentinel.
//!
//! When the second sibling node after a chapter anchor is non-blank text, the
//! index post itself continues the story after that link. That segment is
//! emitted as an extra chapter pointing at the thread, titled after the post.

use crate::model::{Chapter, ChapterList};
use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Appended to an inline segment's title when it repeats the chapter before it
pub const CONTINUATION_SUFFIX: &str = " (Cont.)";

/// Parses the thread page into an ordered chapter list
///
/// # Arguments
///
/// * `html` - The thread page markup
/// * `thread_url` - URL of the thread; base for relative hrefs and the url of
///   inline segments
/// * `sentinel` - Anchor text that ends the table of contents
///
/// # Example
///
/// ```
/// use chapter_mirror::extract::parse_thread;
/// use url::Url;
///
/// let html = r#"<article><div>
/// Index
/// </div><a href="/c1">1 - Intro</a><br/>
/// <a href="/end">The End</a></article>"#;
/// let base = Url::parse("https://forum.example.com/threads/1/").unwrap();
/// let chapters = parse_thread(html, &base, "The End").unwrap();
/// assert_eq!(chapters.len(), 1);
/// assert_eq!(chapters.get(1).unwrap().url, "https://forum.example.com/c1");
/// ```
pub fn parse_thread(
    html: &str,
    thread_url: &Url,
    sentinel: &str,
) -> Result<ChapterList, ExtractionError> {
    let document = Html::parse_document(html);

    // Locate the index post
    let article = Selector::parse("article")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .ok_or(ExtractionError::MissingArticle)?;

    let post_title = extract_post_title(&article).ok_or(ExtractionError::MissingTitle)?;

    // Collect anchors in document order
    let anchors: Vec<ElementRef> = Selector::parse("a")
        .map(|selector| article.select(&selector).collect())
        .unwrap_or_default();

    if anchors.is_empty() {
        return Err(ExtractionError::MissingAnchors);
    }

    let sentinel = sentinel.trim();
    let mut chapters = Vec::new();

    for anchor in anchors {
        let text = anchor_text(&anchor);
        if text == sentinel {
            return Ok(ChapterList::new(chapters));
        }

        let url = resolve_href(&anchor, &text, thread_url)?;
        chapters.push(Chapter::new(text.clone(), url));

        // The index post continues the story after this link
        if has_inline_segment(&anchor) {
            let title = if post_title == text {
                format!("{}{}", post_title, CONTINUATION_SUFFIX)
            } else {
                post_title.clone()
            };
            tracing::debug!("Inline segment after '{}' titled '{}'", text, title);
            chapters.push(Chapter::new(title, thread_url.as_str()));
        }
    }

    Err(ExtractionError::MissingSentinel {
        sentinel: sentinel.to_string(),
    })
}

/// First non-blank line of the article's first `<div>`
fn extract_post_title(article: &ElementRef) -> Option<String> {
    let div_selector = Selector::parse("div").ok()?;
    let div = article.select(&div_selector).next()?;
    let text = div.text().collect::<String>();

    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn anchor_text(anchor: &ElementRef) -> String {
    anchor.text().collect::<String>().trim().to_string()
}

/// Resolves the anchor's href against the thread URL
fn resolve_href(anchor: &ElementRef, text: &str, base: &Url) -> Result<String, ExtractionError> {
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| ExtractionError::MissingHref {
            text: text.to_string(),
        })?;

    base.join(href.trim())
        .map(|url| url.to_string())
        .map_err(|source| ExtractionError::InvalidHref {
            href: href.to_string(),
            source,
        })
}

/// The node after the anchor's line break holds story text
fn has_inline_segment(anchor: &ElementRef) -> bool {
    anchor
        .next_siblings()
        .nth(1)
        .and_then(|node| node.value().as_text().map(|text| !text.trim().is_empty()))
        .unwrap_or(false)
}
