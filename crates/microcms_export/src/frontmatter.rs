use std::fmt::Write;

use crate::ContentRecord;

/// Render a Hugo document: TOML front matter (`date`, `title`, `thumbnail`)
/// followed by the converted body.
///
/// Values are written as TOML basic strings, so quotes, backslashes and
/// control characters are escaped. The trailing `"\n\t"` after the body is
/// part of the established output format.
pub fn render_document(record: &ContentRecord, markdown_body: &str) -> String {
    format!(
        "+++\ndate = \"{date}\"\ntitle = \"{title}\"\nthumbnail = \"{thumbnail}\"\n+++\n\n{body}\n\t",
        date = escape_basic_string(&record.created_at),
        title = escape_basic_string(&record.title),
        thumbnail = escape_basic_string(&record.image.url),
        body = markdown_body,
    )
}

fn escape_basic_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut escaped, "\\u{:04X}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

