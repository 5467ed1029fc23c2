//! Markdown editor page.
//!
//! A plain textarea form that posts back to the note's own URL. The inline
//! script auto-grows the textarea, submits on Ctrl/Cmd+Enter, warns before
//! leaving with unsaved edits, and uploads pasted images.

use crate::markdown::html_escape;
use crate::upload::MAX_IMAGE_BYTES;

use super::components::{layout, page_footer, search_link};
use super::viewer::DEFAULT_TITLE;

pub struct EditorPage<'a> {
    pub slug: &'a str,
    /// Page title; the note's title when it has one.
    pub title: &'a str,
    pub content: &'a str,
    /// Show Cancel, which only makes sense when there is saved content to
    /// go back to.
    pub show_cancel: bool,
    pub error: Option<&'a str>,
}

pub fn render_editor(page: &EditorPage) -> String {
    let slug = urlencoding::encode(page.slug);
    let error_html = page
        .error
        .map(|e| format!(r#"<div class="message error">{}</div>"#, html_escape(e)))
        .unwrap_or_default();
    let cancel_html = if page.show_cancel {
        format!(r#"<a class="btn" href="/{}">Cancel</a>"#, slug)
    } else {
        String::new()
    };

    // The newline after <textarea> is swallowed by the HTML parser, so
    // content that starts with a blank line keeps it.
    let content = format!(
        r#"<div id="content-md-edit">
    {error}
    <form method="POST" action="/{slug}" id="editor-form">
        <input type="hidden" name="had_content" value="{had_content}">
        <textarea name="content_md" id="content-md" placeholder="Enter markdown content...">
{text}</textarea>
        <div class="editor-actions">
            {cancel}
            <input class="btn btn-primary" type="submit" id="save-btn" value="Save markdown">
            <span class="upload-status" id="upload-status"></span>
        </div>
    </form>
</div>
<script>{script}</script>"#,
        error = error_html,
        slug = slug,
        had_content = if page.show_cancel { "1" } else { "0" },
        text = html_escape(page.content),
        cancel = cancel_html,
        script = editor_script(),
    );

    let title = if page.title.is_empty() {
        DEFAULT_TITLE
    } else {
        page.title
    };
    layout(title, &content, &page_footer(search_link(), ""), "")
}

fn editor_script() -> String {
    EDITOR_SCRIPT.replace("__MAX_IMAGE_BYTES__", &MAX_IMAGE_BYTES.to_string())
}

const EDITOR_SCRIPT: &str = r#"
(function () {
    var form = document.getElementById('editor-form');
    var textarea = document.getElementById('content-md');
    var saveBtn = document.getElementById('save-btn');
    var status = document.getElementById('upload-status');
    var dirty = false;
    var saving = false;

    function resize() {
        textarea.style.height = 'auto';
        textarea.style.height = Math.max(200, textarea.scrollHeight) + 'px';
    }
    resize();
    textarea.focus();

    textarea.addEventListener('input', function () {
        dirty = true;
        resize();
    });

    form.addEventListener('submit', function () {
        saving = true;
        saveBtn.value = 'Saving...';
        saveBtn.disabled = true;
    });

    window.addEventListener('keydown', function (e) {
        if ((e.metaKey || e.ctrlKey) && e.key === 'Enter') {
            e.preventDefault();
            if (!saving) {
                if (form.requestSubmit) { form.requestSubmit(); } else { form.submit(); }
            }
        }
    });

    window.addEventListener('beforeunload', function (e) {
        if (dirty && !saving) {
            e.preventDefault();
            e.returnValue = '';
        }
    });

    function insertAtCursor(text) {
        var start = textarea.selectionStart;
        var end = textarea.selectionEnd;
        textarea.value = textarea.value.slice(0, start) + text + textarea.value.slice(end);
        textarea.selectionStart = textarea.selectionEnd = start + text.length;
        dirty = true;
        resize();
    }

    function uploadImage(file) {
        if (!file.type || file.type.indexOf('image/') !== 0) {
            alert('Only image files are allowed');
            return;
        }
        if (file.size > __MAX_IMAGE_BYTES__) {
            alert('Image size must be less than 5MB');
            return;
        }
        var body = new FormData();
        body.append('file', file, file.name || 'image.png');
        body.append('return_to', window.location.pathname + window.location.search);
        status.textContent = 'Uploading image...';
        fetch('/api/upload', { method: 'POST', body: body, credentials: 'same-origin' })
            .then(function (res) {
                return res.json().then(function (data) { return { status: res.status, data: data }; });
            })
            .then(function (r) {
                status.textContent = '';
                if (r.status === 401 && r.data.redirect) {
                    saving = true;
                    window.location.href = r.data.redirect;
                    return;
                }
                if (r.data.url) {
                    insertAtCursor('![](' + r.data.url + ')');
                } else {
                    alert(r.data.error || 'Failed to upload image');
                }
            })
            .catch(function () {
                status.textContent = '';
                alert('Failed to upload image');
            });
    }

    textarea.addEventListener('paste', function (e) {
        var items = (e.clipboardData && e.clipboardData.items) || [];
        for (var i = 0; i < items.length; i++) {
            if (items[i].kind === 'file' && items[i].type.indexOf('image/') === 0) {
                var file = items[i].getAsFile();
                if (file) {
                    e.preventDefault();
                    uploadImage(file);
                    return;
                }
            }
        }
    });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(content: &'a str, show_cancel: bool, error: Option<&'a str>) -> EditorPage<'a> {
        EditorPage {
            slug: "abc1234",
            title: "",
            content,
            show_cancel,
            error,
        }
    }

    #[test]
    fn test_editor_escapes_content() {
        let html = render_editor(&page("</textarea><script>x</script>", false, None));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains(r#"action="/abc1234""#));
    }

    #[test]
    fn test_cancel_only_with_saved_content() {
        let html = render_editor(&page("", false, None));
        assert!(!html.contains(">Cancel<"));
        assert!(html.contains(r#"name="had_content" value="0""#));

        let html = render_editor(&page("x", true, None));
        assert!(html.contains(r#"<a class="btn" href="/abc1234">Cancel</a>"#));
        assert!(html.contains(r#"name="had_content" value="1""#));
    }

    #[test]
    fn test_error_message_shown() {
        let html = render_editor(&page("x", false, Some("Failed to save note")));
        assert!(html.contains(r#"<div class="message error">Failed to save note</div>"#));
    }

    #[test]
    fn test_script_has_size_limit() {
        let html = render_editor(&page("", false, None));
        assert!(html.contains(&format!("file.size > {}", MAX_IMAGE_BYTES)));
        assert!(!html.contains("__MAX_IMAGE_BYTES__"));
    }
}
