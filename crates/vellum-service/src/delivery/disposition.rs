//! `Content-Disposition` values.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Attachment,
    Inline,
}

impl Disposition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// Quoted-string fallback: printable ASCII only, with `"` and `\` escaped.
fn quoted_ascii(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('_'),
        }
    }
    out
}

/// ## Summary
/// Builds `attachment; filename="..."; filename*=UTF-8''...` (or `inline`).
///
/// An empty filename yields the bare disposition type.
#[must_use]
pub fn content_disposition(disposition: Disposition, filename: &str) -> String {
    if filename.is_empty() {
        return disposition.as_str().to_string();
    }
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition.as_str(),
        quoted_ascii(filename),
        urlencoding::encode(filename)
    )
}
