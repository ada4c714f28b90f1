//! iCalendar line folding.

/// Maximum line length in octets (not characters) per RFC 5545 §3.1.
pub const MAX_LINE_OCTETS: usize = 75;

/// Earliest octet a delimiter break may end at.
const MIN_BREAK_OCTETS: usize = 60;

/// Folds a line to the maximum length.
///
/// Lines longer than 75 octets are folded by inserting CRLF + space. Each
/// break follows the last `;` or `:` within the line width, provided that
/// leaves at least 60 octets on the line; otherwise the line is cut at the
/// width, backed up to a UTF-8 character boundary. No trailing CRLF is
/// added.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut rest = line;
    // Continuation lines spend one octet on the leading space
    let mut width = MAX_LINE_OCTETS;

    while rest.len() > width {
        let cut = break_point(rest, width);
        result.push_str(&rest[..cut]);
        result.push_str("\r\n ");
        rest = &rest[cut..];
        width = MAX_LINE_OCTETS - 1;
    }
    result.push_str(rest);

    result
}

/// Returns the octet offset to break `segment` at, given that it is longer
/// than `width`.
fn break_point(segment: &str, width: usize) -> usize {
    let delimiter = segment.as_bytes()[..width]
        .iter()
        .rposition(|&b| b == b';' || b == b':')
        .map(|pos| pos + 1)
        .filter(|&cut| cut >= MIN_BREAK_OCTETS);

    if let Some(cut) = delimiter {
        return cut;
    }

    let mut cut = width;
    while !segment.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}
