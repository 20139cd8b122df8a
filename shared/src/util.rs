/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Maximum slug length (same limit as entity names)
pub const MAX_SLUG_LEN: usize = 200;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII, drops every character that is not an ASCII letter,
/// digit, whitespace or `-`, collapses runs of whitespace/hyphens into a
/// single `-` and trims hyphens from both ends. Valid slugs map to
/// themselves.
///
/// ```
/// use shared::util::derive_slug;
///
/// assert_eq!(derive_slug("Living Room Furniture!!"), "living-room-furniture");
/// assert_eq!(derive_slug("living-room-furniture"), "living-room-furniture");
/// ```
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        }
        // anything else is stripped without acting as a separator
    }

    slug
}

/// Check a slug against `^[a-z0-9]+(-[a-z0-9]+)*$` and the length limit.
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return false;
    }
    slug.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
