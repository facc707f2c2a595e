/// Output filename for a record: `{id}.md`.
///
/// The identifier is used verbatim, so the same record always maps to the
/// same file. Identifiers that would escape the output directory or are not
/// valid file names on common platforms are rejected rather than rewritten.
pub fn markdown_filename(id: &str) -> Result<String, UnsafeIdentifier> {
    if id.is_empty() {
        return Err(UnsafeIdentifier::new(id, "identifier is empty"));
    }
    if id == "." || id == ".." {
        return Err(UnsafeIdentifier::new(id, "identifier is a relative path"));
    }
    if let Some(c) = id.chars().find(|c| is_forbidden(*c)) {
        return Err(UnsafeIdentifier::new(
            id,
            format!("identifier contains forbidden character {c:?}"),
        ));
    }
    if is_reserved_windows_name(id) {
        return Err(UnsafeIdentifier::new(id, "identifier is a reserved device name"));
    }
    Ok(format!("{id}.md"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsafe identifier {id:?}: {reason}")]
pub struct UnsafeIdentifier {
    pub id: String,
    pub reason: String,
}

impl UnsafeIdentifier {
    fn new(id: &str, reason: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
