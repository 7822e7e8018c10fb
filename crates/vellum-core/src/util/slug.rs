//! Filename stems for downloads, safe inside a `Content-Disposition` header.

/// Fallback stem when a name has no usable characters.
pub const EMPTY_SLUG: &str = "export";

/// Lowercases ASCII alphanumerics and turns every other run of characters
/// into a single hyphen, without leading or trailing hyphens.
///
/// `"123456789/2"` becomes `"123456789-2"`.
#[must_use]
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}
