//! Markdown rendering and small text helpers for note content.
//!
//! Rendering is server-side with pulldown-cmark; math, diagrams and syntax
//! highlighting are finished in the browser by KaTeX, Mermaid and
//! highlight.js, which the page templates load only when needed.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

/// Number of lines shown in a collapsed search result.
pub const PREVIEW_LINES: usize = 5;

// ============================================================================
// Text Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Markdown Rendering
// ============================================================================

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_MATH);
    options
}

/// Render note markdown to sanitized HTML.
///
/// Soft line breaks become `<br>`, ```` ```mermaid ```` fences become
/// `<pre class="mermaid">` for the diagram script, and other fences keep
/// their `language-*` class. `$...$` and `$$...$$` skip markdown entirely
/// and come out as escaped TeX in `math-inline` / `math-display` spans.
/// With `allow_raw_html` off, inline and block HTML in the source is shown
/// as text.
pub fn render_markdown(content: &str, allow_raw_html: bool) -> String {
    let parser = Parser::new_ext(content, parser_options());

    let mut events: Vec<Event> = Vec::new();
    let mut mermaid: Option<String> = None;

    for event in parser {
        if let Some(buf) = mermaid.as_mut() {
            match event {
                Event::Text(text) => buf.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let diagram = format!("<pre class=\"mermaid\">{}</pre>\n", html_escape(buf));
                    events.push(Event::Html(CowStr::from(diagram)));
                    mermaid = None;
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang)))
                if lang.trim() == "mermaid" =>
            {
                mermaid = Some(String::new());
            }
            Event::InlineMath(tex) => events.push(math_span("math-inline", &tex)),
            Event::DisplayMath(tex) => events.push(math_span("math-display", &tex)),
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Html(raw) | Event::InlineHtml(raw) if !allow_raw_html => {
                events.push(Event::Text(raw));
            }
            other => events.push(other),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    sanitize(&html_output)
}

fn math_span(class: &str, tex: &str) -> Event<'static> {
    Event::InlineHtml(CowStr::from(format!(
        "<span class=\"{}\">{}</span>",
        class,
        html_escape(tex)
    )))
}

/// Strip scripts, handlers and unknown tags while keeping the classes the
/// client-side renderers look for.
fn sanitize(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .add_generic_attributes(&["class"])
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder.clean(html).to_string()
}

/// Whether the page should load KaTeX.
pub fn needs_math(content: &str) -> bool {
    content.contains('$')
}

/// Whether the page should load Mermaid.
pub fn needs_mermaid(content: &str) -> bool {
    content.contains("```mermaid")
}

// ============================================================================
// Titles and Previews
// ============================================================================

fn h1_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").expect("valid heading regex"))
}

/// Text of the first level-one ATX heading, if any.
pub fn title_from_markdown(content: &str) -> Option<String> {
    h1_pattern()
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('\r').to_string())
        .filter(|t| !t.is_empty())
}

/// First `max_lines` lines of `content`.
pub fn preview_lines(content: &str, max_lines: usize) -> String {
    content
        .split('\n')
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when `content` has more lines than a collapsed preview shows.
pub fn needs_expand(content: &str, max_lines: usize) -> bool {
    content.split('\n').count() > max_lines
}
