//! iCalendar text escaping.

/// Escapes a free-text value (RFC 5545 §3.3.11).
///
/// Backslash is escaped first so the escapes added for `,` `;` and newline
/// are not doubled.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 8);

    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }

    result
}
