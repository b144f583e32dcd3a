//! Standalone HTML page around rendered fields, for previews and the CLI.

use std::fmt::Write;

use crate::escape::escape_html;

/// Base styles for the markup the primitives emit.
pub const MORPH_BASE_STYLES: &str = "html,body{margin:0;background:#fafaf9;color:#1c1917;font-family:system-ui,sans-serif;}\
main{max-width:960px;margin:0 auto;padding:2rem 1.5rem;}\
.morph-record{margin:0 0 2rem;}\
.morph-record h2{font-size:1.25rem;border-bottom:1px solid #e7e5e4;padding-bottom:0.3em;}\
.morph-row{display:grid;grid-template-columns:12rem 1fr;gap:1rem;padding:0.5rem 0;border-bottom:1px solid #f5f5f4;}\
.morph-row-label{font-weight:600;color:#57534e;}\
.morph-empty{color:#a8a29e;}\
.morph-unit,.morph-freq-count,.morph-more{color:#78716c;font-size:0.875em;}\
.morph-tags{display:flex;flex-wrap:wrap;gap:0.35rem;list-style:none;margin:0;padding:0;}\
.morph-tag,.morph-badge{display:inline-block;padding:0.1em 0.55em;border-radius:999px;background:#f5f5f4;border:1px solid #e7e5e4;font-size:0.875em;}\
.morph-bar-track,.morph-progress-track{position:relative;height:0.6rem;background:#e7e5e4;border-radius:4px;flex:1;}\
.morph-bar-fill,.morph-progress-fill{height:100%;border-radius:4px;background:#57534e;}\
.morph-bar-row{display:flex;align-items:center;gap:0.75rem;margin:0.25rem 0;}\
.morph-avg-marker{position:absolute;top:-3px;bottom:-3px;width:2px;background:#1c1917;}\
.morph-is-max{font-weight:700;}\
.morph-is-min{opacity:0.75;}\
.morph-swatch{display:inline-block;width:0.7rem;height:0.7rem;border-radius:50%;margin-right:0.3rem;vertical-align:middle;}\
.morph-legend{display:flex;flex-wrap:wrap;gap:0.75rem;margin-top:0.5rem;font-size:0.875em;}\
.morph-compare-row{display:flex;gap:0.75rem;align-items:flex-start;padding:0.25rem 0;}\
.morph-axis{display:flex;justify-content:space-between;font-size:0.8em;color:#78716c;}\
.morph-axis-track{position:relative;height:1.25rem;border-bottom:2px solid #d6d3d1;margin-bottom:0.5rem;}\
.morph-marker{position:absolute;bottom:-6px;width:10px;height:10px;margin-left:-5px;border-radius:50%;}\
.morph-converge{outline:2px solid #f59e0b;}\
.morph-table{border-collapse:collapse;width:100%;}\
.morph-table th,.morph-table td{border:1px solid #e7e5e4;padding:0.35em 0.6em;text-align:left;}\
.morph-calendar{display:inline-grid;grid-template-columns:repeat(12,1.5rem);gap:2px;}\
.morph-month{text-align:center;background:#f5f5f4;font-size:0.75em;border-radius:2px;}\
.morph-month--active{background:#16a34a;color:#fff;}\
.morph-severity-step{display:inline-block;width:1rem;height:0.5rem;margin-right:2px;background:#e7e5e4;}\
.morph-severity-step--on{background:#dc2626;}\
.morph-gauge-track{stroke:#e7e5e4;}\
.morph-gauge-fill{stroke:#57534e;}\
.morph-sparkline svg{width:8rem;height:2rem;}\
.morph-radar-svg,.morph-pie-svg{width:12rem;height:12rem;}\
.morph-radar-grid,.morph-radar-axis{stroke:#d6d3d1;}\
.morph-radar-shape{fill:#57534e;fill-opacity:0.25;stroke:#57534e;}\
.morph-image img{max-width:100%;height:auto;border-radius:4px;}";

/// Wrap `body` in a complete document. `body` is trusted markup produced by
/// the renderer; `title` is escaped.
pub fn render_page(title: &str, body: &str) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>
<main>
{}
</main>
</body>
</html>
"#,
        escape_html(title),
        MORPH_BASE_STYLES,
        body
    );
    html
}

/// One labelled row for a rendered field.
pub fn field_row(label: &str, markup: &str) -> String {
    format!(
        "<div class=\"morph-row\"><div class=\"morph-row-label\">{}</div><div class=\"morph-row-value\">{}</div></div>",
        escape_html(label),
        markup
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_title_not_body() {
        let page = render_page("<Moths>", "<p>ok</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>&lt;Moths&gt;</title>"));
        assert!(page.contains("<p>ok</p>"));
        assert!(page.contains(".morph-empty{"));
    }

    #[test]
    fn row_escapes_label() {
        assert!(field_row("a<b", "<i>x</i>").contains("a&lt;b</div><div class=\"morph-row-value\"><i>x</i>"));
    }
}
