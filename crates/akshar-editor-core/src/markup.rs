//! Markup builders for composite insertions.
//!
//! User text is always escaped before it becomes part of inserted markup.

use pulldown_cmark_escape::{escape_href, escape_html, escape_html_body_text};

use crate::commands::VideoRef;

/// Escape text for use inside an element body.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html_body_text(&mut out, text);
    out
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html(&mut out, text);
    out
}

fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let _ = escape_href(&mut out, url);
    out
}

/// `<table>` with `rows` × `cols` empty cells, followed by an empty paragraph
/// so the caret has somewhere to land.
pub fn table(rows: usize, cols: usize) -> String {
    let mut html = String::from(r#"<table class="editor-table" border="1"><tbody>"#);
    for _ in 0..rows {
        html.push_str("<tr>");
        for _ in 0..cols {
            html.push_str("<td>&nbsp;</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table><p><br></p>");
    html
}

/// Responsive iframe embed for a parsed video reference.
pub fn video_embed(video: &VideoRef) -> String {
    format!(
        r#"<div class="video-embed"><iframe src="{}" width="560" height="315" frameborder="0" allowfullscreen></iframe></div><p><br></p>"#,
        escape_url(&video.embed_url())
    )
}

pub fn blockquote(text: &str) -> String {
    format!("<blockquote>{}</blockquote><p><br></p>", escape_text(text.trim()))
}

/// Anchor whose visible text is the URL itself, used when nothing is selected.
pub fn link(url: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_url(url),
        escape_text(url)
    )
}

pub fn image(url: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" style="max-width: 100%;">"#,
        escape_url(url),
        escape_attr(alt)
    )
}
