//! Shared page pieces: the HTML shell, the footer and simple message pages.

use crate::markdown::html_escape;

use super::styles::STYLE;

// ============================================================================
// Base Template
// ============================================================================

/// Wrap `body` in the document shell. `head_extra` is inserted verbatim into
/// `<head>` for page-specific scripts and stylesheets.
pub fn base_html(title: &str, body: &str, head_extra: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
    {}
</head>
<body>
{}
</body>
</html>"#,
        html_escape(title),
        STYLE,
        head_extra,
        body
    )
}

// ============================================================================
// Footer
// ============================================================================

/// Page footer: "How to Use" on the left, `center` and `actions` are raw HTML.
pub fn page_footer(center: &str, actions: &str) -> String {
    format!(
        r#"<footer class="page-footer">
    <div class="footer-copyright">
        <div class="container footer-row">
            <div><a href="/how-to-use">How to Use</a></div>
            <div>{}</div>
            <div class="footer-actions">{}</div>
        </div>
    </div>
</footer>"#,
        center, actions
    )
}

/// The search link shown in the middle of the footer on private pages.
pub fn search_link() -> &'static str {
    r#"<a href="/search" title="Search">Search</a>"#
}

/// Standard page: content column plus footer.
pub fn layout(title: &str, content: &str, footer: &str, head_extra: &str) -> String {
    let body = format!(
        r#"<main>
    <div class="container">
        <div class="page">{}</div>
    </div>
</main>
{}"#,
        content, footer
    );
    base_html(title, &body, head_extra)
}

// ============================================================================
// Message Pages
// ============================================================================

/// Centered card with a heading, a message and one link.
pub fn message_page(title: &str, heading: &str, message: &str, link_href: &str, link_text: &str) -> String {
    let body = format!(
        r#"<div class="center-page">
    <div class="card">
        <h1>{}</h1>
        <p>{}</p>
        <a href="{}">{}</a>
    </div>
</div>"#,
        html_escape(heading),
        html_escape(message),
        html_escape(link_href),
        html_escape(link_text)
    );
    base_html(title, &body, "")
}
