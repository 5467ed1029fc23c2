//! Read-only note pages: the owner's view and the public share view.

use crate::markdown::{html_escape, needs_math, needs_mermaid, render_markdown};
use crate::models::{Note, SharedNote};

use super::components::{layout, page_footer, search_link};

/// Title used when a note has none.
pub const DEFAULT_TITLE: &str = "binfer";

// ============================================================================
// Client-side Assets
// ============================================================================

const HIGHLIGHT_ASSETS: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/highlight.js@11.9.0/styles/github.min.css">
    <script defer src="https://cdn.jsdelivr.net/npm/highlight.js@11.9.0/lib/highlight.min.js"></script>
    <script>document.addEventListener('DOMContentLoaded', function () { if (window.hljs) { document.querySelectorAll('.markdown-body pre code').forEach(function (el) { hljs.highlightElement(el); }); } });</script>"#;

const KATEX_ASSETS: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css">
    <script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js"></script>
    <script>document.addEventListener('DOMContentLoaded', function () { if (window.katex) { document.querySelectorAll('.math-inline, .math-display').forEach(function (el) { katex.render(el.textContent, el, { displayMode: el.classList.contains('math-display'), throwOnError: false }); }); } });</script>"#;

const MERMAID_ASSETS: &str = r#"<script type="module">import mermaid from 'https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs'; mermaid.initialize({ startOnLoad: true });</script>"#;

/// `<head>` tags for rendering `content`: highlighting always, KaTeX and
/// Mermaid only when the markdown uses them.
pub fn asset_tags(content: &str) -> String {
    let mut tags = String::from(HIGHLIGHT_ASSETS);
    if needs_math(content) {
        tags.push_str("\n    ");
        tags.push_str(KATEX_ASSETS);
    }
    if needs_mermaid(content) {
        tags.push_str("\n    ");
        tags.push_str(MERMAID_ASSETS);
    }
    tags
}

// ============================================================================
// Owner View
// ============================================================================

/// Rendered note with its footer actions. Edit is offered on unlocked notes;
/// share and delete only to signed-in users.
pub fn render_note_view(note: &Note, logged_in: bool) -> String {
    let title = if note.title.is_empty() {
        DEFAULT_TITLE
    } else {
        note.title.as_str()
    };
    let slug = urlencoding::encode(&note.slug);

    let mut actions = String::new();
    if !note.locked() {
        actions.push_str(&format!(
            r#"<a href="/{}?edit=1" title="Edit">Edit</a>"#,
            slug
        ));
    }
    if logged_in {
        if note.shared() {
            actions.push_str(&format!(
                r#"<a href="/share/{public}" title="Public link">Public link</a>
                <form method="POST" action="/{slug}/share"><input type="hidden" name="shared" value="0"><button type="submit" class="link-button">Unshare</button></form>"#,
                public = urlencoding::encode(note.public_slug()),
                slug = slug
            ));
        } else {
            actions.push_str(&format!(
                r#"<form method="POST" action="/{}/share"><input type="hidden" name="shared" value="1"><button type="submit" class="link-button">Share</button></form>"#,
                slug
            ));
        }
        actions.push_str(&format!(
            r#"<form method="POST" action="/{}/delete" onsubmit="return confirm('Delete this note?');"><button type="submit" class="link-button">Delete</button></form>"#,
            slug
        ));
    }

    let content = format!(
        r#"<div id="content-html" class="markdown-body">{}</div>"#,
        render_markdown(&note.content_md, true)
    );
    layout(
        title,
        &content,
        &page_footer(search_link(), &actions),
        &asset_tags(&note.content_md),
    )
}

// ============================================================================
// Public View
// ============================================================================

/// Public share page. Title comes from the first `# ` heading; the footer has
/// no search or owner actions.
pub fn render_shared_note(note: &SharedNote) -> String {
    let title = crate::markdown::title_from_markdown(&note.content_md)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let content = format!(
        r#"<div id="content-html" class="markdown-body">{}</div>"#,
        render_markdown(&note.content_md, true)
    );
    layout(
        &title,
        &content,
        &page_footer("", ""),
        &asset_tags(&note.content_md),
    )
}

/// Help page content.
pub fn render_how_to_use() -> String {
    let content = format!(
        r#"<div class="markdown-body">{}</div>"#,
        render_markdown(HOW_TO_USE, true)
    );
    layout(
        &format!("How to Use - {}", DEFAULT_TITLE),
        &content,
        &page_footer(search_link(), &format!(r#"<a href="/">{}</a>"#, html_escape("New note"))),
        &asset_tags(HOW_TO_USE),
    )
}

const HOW_TO_USE: &str = r#"# How to Use

Every page address is a note. Opening the site sends you to a fresh random
address; type some markdown and press **Save markdown** (or Ctrl/Cmd+Enter)
to keep it there.

## Writing

- Standard markdown with tables, task lists, footnotes and ~~strikethrough~~.
- Single line breaks are kept.
- Fenced code blocks are syntax highlighted.
- `$...$` and `$$...$$` are rendered as math.
- A ` ```mermaid ` block is drawn as a diagram.
- Paste an image into the editor to upload it (images only, under 5MB).

## Sharing

Signed-in owners can share a note; the footer then shows its public link
under `/share/`. Unsharing removes public access.

## Searching

Use **Search** in the footer to find notes by meaning rather than exact words.
"#;
