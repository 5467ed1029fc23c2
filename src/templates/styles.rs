//! CSS for every page.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
:root {
    --bg: #f9f9f9;
    --fg: rgba(0, 0, 0, 0.85);
    --muted: #9e9e9e;
    --footer-bg: #e9e9e9;
    --footer-link: #626262;
    --border: #d9d9d9;
    --input-border: #9e9e9e;
    --primary: rgb(79, 70, 229);
    --result-title: #1a0dab;
    --result-url: #006621;
    --error: #d93025;
    --code-bg: #f3f3f3;
}

* { box-sizing: border-box; }

html, body { margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
    min-height: 100vh;
    display: flex;
    flex-direction: column;
}

main { flex: 1; }

.container {
    max-width: 960px;
    margin: 0 auto;
    padding: 0 1rem;
}

.page { padding: 40px 0; }

a { color: var(--primary); }

/* Rendered markdown */

.markdown-body { word-wrap: break-word; }
.markdown-body h1, .markdown-body h2, .markdown-body h3 { line-height: 1.25; margin: 1.2em 0 0.5em; }
.markdown-body h1 { font-size: 2rem; }
.markdown-body h2 { font-size: 1.5rem; }
.markdown-body img { max-width: 100%; }
.markdown-body pre {
    background: var(--code-bg);
    padding: 0.75rem 1rem;
    overflow-x: auto;
    border-radius: 2px;
}
.markdown-body code { font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace; font-size: 0.9em; }
.markdown-body .math-display { display: block; text-align: center; margin: 1em 0; overflow-x: auto; }
.markdown-body pre.mermaid { background: transparent; text-align: center; }
.markdown-body table { border-collapse: collapse; margin: 1em 0; }
.markdown-body th, .markdown-body td { border: 1px solid var(--border); padding: 6px 13px; }
.markdown-body blockquote { margin: 0; padding: 0 1em; color: #6a737d; border-left: 0.25em solid #dfe2e5; }

/* Buttons */

.btn {
    line-height: 1.5715;
    display: inline-block;
    font-weight: 400;
    white-space: nowrap;
    text-align: center;
    border: 1px solid var(--border);
    box-shadow: 0 2px rgba(0, 0, 0, 0.015);
    cursor: pointer;
    transition: all .3s cubic-bezier(.645, .045, .355, 1);
    height: 32px;
    padding: 4px 15px;
    font-size: 14px;
    border-radius: 2px;
    background: #fff;
    color: var(--fg);
    text-decoration: none;
}
.btn-primary {
    border-color: var(--primary);
    background: var(--primary);
    color: #fff;
    text-shadow: 0 -1px 0 rgba(0, 0, 0, .12);
}
.btn:disabled { opacity: 0.6; cursor: not-allowed; }

.link-button {
    background: none;
    border: none;
    padding: 0;
    color: var(--footer-link);
    cursor: pointer;
    font: inherit;
}

/* Editor */

#content-md {
    padding: 10px;
    min-height: 200px;
    width: 100%;
    border: 1px solid var(--input-border);
    border-radius: 0;
    font-size: 14px;
    line-height: 1.5;
    font-family: monospace;
    resize: vertical;
    overflow: hidden;
}
.editor-actions { margin-top: 16px; display: flex; gap: 8px; align-items: center; }
.upload-status { color: var(--muted); font-size: 0.85rem; }

.message.error {
    color: var(--error);
    border: 1px solid var(--error);
    background: #fdecea;
    padding: 8px 12px;
    margin-bottom: 16px;
}

/* Footer */

.page-footer { background: var(--footer-bg); }
.footer-copyright { padding: 10px 0; color: var(--muted); }
.footer-row { display: flex; align-items: center; justify-content: space-between; gap: 1rem; }
.footer-row a { color: var(--footer-link); text-decoration: none; }
.footer-row form { display: inline; }
.footer-actions { display: flex; gap: 12px; align-items: center; }

/* Search */

.search-form { display: flex; align-items: stretch; max-width: 42rem; margin: 0 auto; }
.search-form.centered { min-height: 60vh; align-items: center; }
.search-form input {
    flex: 1;
    height: 40px;
    padding: 0 15px;
    font-size: 16px;
    border: 1px solid var(--input-border);
    border-right: none;
    border-radius: 2px 0 0 2px;
    outline: none;
}
.search-form button { height: 40px; padding: 0 20px; font-size: 16px; border-radius: 0 2px 2px 0; }
.search-results { max-width: 56rem; margin: 2rem auto 0; }
.search-count { color: var(--muted); }
.result {
    background: #fff;
    border: 1px solid #e5e7eb;
    border-radius: 2px;
    padding: 1rem;
    margin-bottom: 1.5rem;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
}
.result h3 { margin: 0 0 0.5rem; font-weight: 400; }
.result h3 a { color: var(--result-title); font-size: 1.25rem; text-decoration: none; }
.result h3 a:hover { text-decoration: underline; }
.result .result-url { color: var(--result-url); font-size: 0.875rem; text-decoration: none; }
.result .preview { font-size: 0.875rem; max-height: 150px; overflow: hidden; position: relative; }
.result.expanded .preview { max-height: none; }
.result .full { display: none; font-size: 0.875rem; }
.result.expanded .full { display: block; }
.result.expanded .preview { display: none; }
.result .toggle { color: var(--result-title); font-size: 0.875rem; margin-top: 0.5rem; background: none; border: none; padding: 0; cursor: pointer; }
.result .meta { color: var(--muted); font-size: 0.75rem; margin-top: 0.5rem; }
.empty { text-align: center; padding: 2rem 0; color: var(--muted); }

/* Login / message pages */

.center-page { min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 20px; }
.card {
    background: #fff;
    padding: 40px;
    border-radius: 8px;
    box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
    max-width: 400px;
    width: 100%;
    text-align: center;
}
.card h1 { font-size: 24px; margin: 0 0 30px; }
.card form { display: flex; flex-direction: column; gap: 12px; margin-bottom: 20px; }
.card input {
    height: 40px;
    padding: 0 12px;
    border: 1px solid var(--border);
    border-radius: 4px;
    font-size: 14px;
}
.google-btn {
    display: flex;
    align-items: center;
    justify-content: center;
    gap: 12px;
    width: 100%;
    padding: 12px 24px;
    font-size: 14px;
    font-weight: 500;
    color: #3c4043;
    background: #fff;
    border: 1px solid #dadce0;
    border-radius: 4px;
    text-decoration: none;
}
.google-btn:hover { background: #f8f9fa; box-shadow: 0 1px 2px 0 rgba(60,64,67,.30), 0 1px 3px 1px rgba(60,64,67,.15); }
.divider { color: var(--muted); margin: 16px 0; font-size: 0.85rem; }
.back-link { margin-top: 24px; font-size: 14px; }
.back-link a { color: var(--footer-link); text-decoration: none; }
"#;
