//! Job-description fetcher — HTTP fetch plus visible-text extraction.
//!
//! Stateless: given a URL it returns the page's visible text, given raw
//! text the handlers pass it through without touching this module.

use scraper::Html;
use tracing::info;

use crate::errors::AppError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; TailorApi/0.1)";

/// Minimum word count for an extracted text block to be kept. Drops nav
/// links, cookie banners, "Apply now" buttons, and similar boilerplate
/// fragments that would dilute the job text.
const WORD_COUNT_THRESHOLD: usize = 10;

/// Fetches a job posting URL and returns its visible text.
pub async fn fetch_job_description(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, AppError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| AppError::Validation(format!("Invalid job URL '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "Unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    info!("Fetching job description from {url}");

    let response = client
        .get(parsed)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|e| AppError::Fetch(format!("Request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Fetch(format!(
            "{url} returned HTTP {status}. The site may block automated access; \
             paste the job text manually instead."
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| AppError::Fetch(format!("Failed to read response body from {url}: {e}")))?;

    let text = extract_visible_text(&html);
    if text.trim().is_empty() {
        return Err(AppError::Fetch(format!(
            "No visible text found at {url}. Paste the job text manually instead."
        )));
    }

    Ok(text)
}

/// Extracts visible text from an HTML document.
///
/// Text nodes under markup that never renders (script, style, head, ...)
/// are skipped; surviving blocks below `WORD_COUNT_THRESHOLD` words are
/// dropped as boilerplate.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut blocks: Vec<String> = Vec::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().map_or(false, |element| {
                matches!(
                    element.name(),
                    "script" | "style" | "noscript" | "head" | "template" | "iframe"
                )
            })
        });
        if hidden {
            continue;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() >= WORD_COUNT_THRESHOLD {
            blocks.push(words.join(" "));
        }
    }

    blocks.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB_PAGE: &str = r#"
        <html>
          <head><title>Job title in head is not visible text at all here</title>
            <style>body { color: red; } .nav a:hover { text-decoration: underline; }</style>
          </head>
          <body>
            <script>var trackingPayloadWithManyWords = "one two three four five six seven eight nine ten";</script>
            <nav>Home</nav>
            <p>We are hiring a senior systems engineer to build and operate our ingestion pipeline.</p>
            <p>You will design fault tolerant services, review code, and mentor a team of four engineers.</p>
            <div>Apply now</div>
          </body>
        </html>
    "#;

    #[test]
    fn test_script_and_style_content_is_excluded() {
        let text = extract_visible_text(JOB_PAGE);
        assert!(!text.contains("trackingPayloadWithManyWords"));
        assert!(!text.contains("text-decoration"));
        assert!(!text.contains("Job title in head"));
    }

    #[test]
    fn test_substantive_paragraphs_are_kept() {
        let text = extract_visible_text(JOB_PAGE);
        assert!(text.contains("senior systems engineer"));
        assert!(text.contains("mentor a team of four engineers"));
    }

    #[test]
    fn test_short_boilerplate_fragments_are_dropped() {
        let text = extract_visible_text(JOB_PAGE);
        assert!(!text.contains("Apply now"));
        assert!(!text.contains("Home"));
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let html = "<p>one  two\n three   four five six seven eight nine ten</p>";
        let text = extract_visible_text(html);
        assert_eq!(text, "one two three four five six seven eight nine ten");
    }

    #[test]
    fn test_empty_document_yields_empty_string() {
        assert_eq!(extract_visible_text(""), "");
        assert_eq!(extract_visible_text("<html><body></body></html>"), "");
    }
}
