//! Similarity search page.

use crate::markdown::{html_escape, needs_expand, preview_lines, render_markdown, PREVIEW_LINES};
use crate::models::SearchNote;

use super::components::{layout, page_footer};
use super::viewer::{asset_tags, DEFAULT_TITLE};

/// Render the search form and, once a query was run, its results.
///
/// `results` is `None` before any search; `host` labels the URL line of
/// each hit.
pub fn render_search(query: &str, results: Option<&[SearchNote]>, host: &str) -> String {
    let title = if query.is_empty() {
        format!("Search - {}", DEFAULT_TITLE)
    } else {
        format!("{} - Search - {}", query, DEFAULT_TITLE)
    };

    let form_class = if results.is_some() {
        "search-form"
    } else {
        "search-form centered"
    };
    let mut content = format!(
        r#"<form class="{}" action="/search" method="get">
    <input type="text" name="q" value="{}" placeholder="Search notes..." autofocus>
    <button type="submit" class="btn btn-primary">Search</button>
</form>"#,
        form_class,
        html_escape(query)
    );

    let mut all_content = String::new();
    if let Some(results) = results {
        content.push_str(r#"<div class="search-results">"#);
        if results.is_empty() {
            content.push_str(&format!(
                r#"<div class="empty">No results found for &quot;{}&quot;</div>"#,
                html_escape(query)
            ));
        } else {
            content.push_str(&format!(
                r#"<p class="search-count">Found {} result{}</p>"#,
                results.len(),
                if results.len() == 1 { "" } else { "s" }
            ));
            for note in results {
                content.push_str(&render_result(note, host));
                all_content.push_str(&note.content_md);
                all_content.push('\n');
            }
        }
        content.push_str("</div>");
        content.push_str(TOGGLE_SCRIPT);
    }

    layout(&title, &content, &page_footer("", ""), &asset_tags(&all_content))
}

fn render_result(note: &SearchNote, host: &str) -> String {
    let link = format!("/{}", urlencoding::encode(note.link_slug()));
    let expandable = needs_expand(&note.content_md, PREVIEW_LINES);

    let body = if expandable {
        format!(
            r#"<div class="preview markdown-body">{}</div>
        <div class="full markdown-body">{}</div>
        <button type="button" class="toggle">Show more</button>"#,
            render_markdown(&preview_lines(&note.content_md, PREVIEW_LINES), false),
            render_markdown(&note.content_md, false)
        )
    } else {
        format!(
            r#"<div class="preview markdown-body">{}</div>"#,
            render_markdown(&note.content_md, false)
        )
    };

    format!(
        r#"<div class="result">
        <h3><a href="{link}">{title}</a></h3>
        <div><a class="result-url" href="{link}">{host}/{slug}</a></div>
        {body}
        <div class="meta">{date} &middot; Similarity: {similarity}</div>
    </div>"#,
        link = link,
        title = html_escape(&note.title),
        host = html_escape(host),
        slug = html_escape(note.link_slug()),
        body = body,
        date = html_escape(&note.updated_date()),
        similarity = note.similarity_percent(),
    )
}

const TOGGLE_SCRIPT: &str = r#"<script>
document.querySelectorAll('.result .toggle').forEach(function (btn) {
    btn.addEventListener('click', function () {
        var card = btn.closest('.result');
        var expanded = card.classList.toggle('expanded');
        btn.textContent = expanded ? 'Show less' : 'Show more';
    });
});
</script>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(slug: &str, inner: Option<&str>, content: &str) -> SearchNote {
        SearchNote {
            slug: slug.to_string(),
            inner_slug: inner.map(str::to_string),
            content_md: content.to_string(),
            title: format!("Title {}", slug),
            similarity: 0.5,
            create_time: "2024-01-01T00:00:00Z".to_string(),
            update_time: "2024-02-03T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_initial_page_has_only_form() {
        let html = render_search("", None, "binfer.net");
        assert!(html.contains("<title>Search - binfer</title>"));
        assert!(html.contains("search-form centered"));
        assert!(!html.contains(r#"class="search-results""#));
    }

    #[test]
    fn test_no_results_message() {
        let html = render_search("zzz", Some(&[][..]), "binfer.net");
        assert!(html.contains("<title>zzz - Search - binfer</title>"));
        assert!(html.contains("No results found for &quot;zzz&quot;"));
        assert!(html.contains(r#"class="search-results""#));
    }

    #[test]
    fn test_results_count_and_links() {
        let results = vec![hit("a1", Some("pub1"), "short"), hit("b2", None, "x")];
        let html = render_search("q", Some(results.as_slice()), "binfer.net");
        assert!(html.contains("Found 2 results"));
        assert!(html.contains(r#"href="/pub1""#));
        assert!(html.contains(r#"href="/b2""#));
        assert!(html.contains("binfer.net/pub1"));
        assert!(html.contains("2024-02-03 &middot; Similarity: 50.0%"));
    }

    #[test]
    fn test_single_result_wording() {
        let results = vec![hit("a1", None, "short")];
        let html = render_search("q", Some(results.as_slice()), "h");
        assert!(html.contains("Found 1 result<"));
    }

    #[test]
    fn test_long_result_gets_toggle() {
        let long = "l1\n\nl2\n\nl3\n\nl4";
        let results = vec![hit("a1", None, long), hit("b2", None, "one line")];
        let html = render_search("q", Some(results.as_slice()), "h");
        assert_eq!(html.matches(r#"class="toggle""#).count(), 1);
        assert!(html.contains(r#"<div class="full markdown-body">"#));
    }

    #[test]
    fn test_previews_escape_raw_html() {
        let results = vec![hit("a1", None, "<b>bold</b>")];
        let html = render_search("q", Some(results.as_slice()), "h");
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}
