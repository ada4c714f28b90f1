//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter, Parameters};

/// Unfolds content lines by removing line breaks followed by whitespace.
///
/// Per RFC 5545 §3.1:
/// - Lines are folded by inserting CRLF followed by whitespace (SPACE or HTAB)
/// - Unfolding removes the CRLF and the single whitespace character
///
/// Bare LF and bare CR are accepted as line breaks and normalized to CRLF.
#[must_use]
pub fn unfold(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    let mut segment = 0;

    while i < len {
        let break_len = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
            b'\r' | b'\n' => 1,
            _ => {
                i += 1;
                continue;
            }
        };

        // Only ASCII bytes are dropped, so every slice lands on a char boundary.
        result.push_str(&input[segment..i]);
        let next = i + break_len;
        if matches!(bytes.get(next), Some(b' ' | b'\t')) {
            i = next + 1;
        } else {
            result.push_str("\r\n");
            i = next;
        }
        segment = i;
    }
    result.push_str(&input[segment..]);

    result
}

/// An unfolded content line and the physical line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based physical line number of the first segment.
    pub number: usize,
    pub text: String,
}

/// Splits input into logical lines, merging folded continuations.
///
/// CRLF, bare LF and bare CR all end a line. Lines starting with SP/HTAB are
/// continuations of the previous line; the break and the single whitespace
/// character are removed. Blank lines are dropped and end the previous line,
/// so a continuation after a blank line starts a new logical line.
#[must_use]
pub fn split_lines(input: &str) -> Vec<LogicalLine> {
    let mut lines: Vec<LogicalLine> = Vec::new();
    let mut joinable = false;

    for (i, line) in physical_lines(input).enumerate() {
        if line.is_empty() {
            joinable = false;
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t'])
            && joinable
            && let Some(prev) = lines.last_mut()
        {
            prev.text.push_str(continuation);
            continue;
        }

        let text = line.strip_prefix([' ', '\t']).unwrap_or(line);
        lines.push(LogicalLine {
            number: i + 1,
            text: text.to_string(),
        });
        joinable = true;
    }

    lines
}

/// Splits on CRLF, LF or a lone CR. A trailing break yields a final empty line.
fn physical_lines(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(input);
    std::iter::from_fn(move || {
        let text = rest?;
        let Some(pos) = text.find(['\r', '\n']) else {
            rest = None;
            return Some(text);
        };
        let break_len = if text[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = Some(&text[pos + break_len..]);
        Some(&text[..pos])
    })
}

/// A BEGIN or END line with its component tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMarker<'a> {
    Begin(&'a str),
    End(&'a str),
}

impl BlockMarker<'_> {
    /// Returns the component tag.
    #[must_use]
    pub const fn tag(&self) -> &str {
        match self {
            Self::Begin(tag) | Self::End(tag) => tag,
        }
    }
}

/// Recognizes `BEGIN:<tag>` and `END:<tag>` lines (keyword case-insensitive).
#[must_use]
pub fn block_marker(line: &str) -> Option<BlockMarker<'_>> {
    let (name, tag) = line.split_once(':')?;
    let tag = tag.trim();
    if tag.is_empty() {
        return None;
    }
    if name.eq_ignore_ascii_case("BEGIN") {
        Some(BlockMarker::Begin(tag))
    } else if name.eq_ignore_ascii_case("END") {
        Some(BlockMarker::End(tag))
    } else {
        None
    }
}

type Chars<'a> = Peekable<CharIndices<'a>>;

/// What follows a parameter.
enum Next {
    Param,
    /// Byte offset where the value starts.
    Value(usize),
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`. The value starts after the first
/// colon that is not inside a quoted parameter value. A parameter may be a
/// bare key without `=`; a repeated key overwrites the earlier one.
///
/// ## Errors
/// Returns an error if the line is malformed or contains invalid characters.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let mut chars = line.char_indices().peekable();
    let mut name_end = None;

    // Find the property name (ends at ';' or ':')
    while let Some(&(i, c)) = chars.peek() {
        if c == ';' || c == ':' {
            name_end = Some(i);
            break;
        }
        if !is_name_char(c) {
            return Err(
                ParseError::new(ParseErrorKind::InvalidContentLine, line_num, i + 1)
                    .with_context(format!("unexpected character '{c}' in property name")),
            );
        }
        chars.next();
    }

    let Some(name_end) = name_end else {
        return Err(ParseError::new(
            ParseErrorKind::MissingColon,
            line_num,
            line.len(),
        ));
    };
    if name_end == 0 {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
            1,
        ));
    }

    let name = &line[..name_end];
    let mut params = Parameters::new();

    let value_start = match chars.next() {
        Some((i, ':')) => i + 1,
        _ => loop {
            let (param, next) = parse_parameter(&mut chars, line, line_num)?;
            params.insert(param);
            if let Next::Value(start) = next {
                break start;
            }
        },
    };

    Ok(ContentLine::with_params(name, params, &line[value_start..]))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Parses a single parameter, consuming its terminator.
fn parse_parameter(
    chars: &mut Chars<'_>,
    line: &str,
    line_num: usize,
) -> ParseResult<(Parameter, Next)> {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);

    // Parse parameter name (up to '=', or ';'/':' for a bare key)
    let mut name_end = None;
    let mut terminator = None;
    while let Some(&(i, c)) = chars.peek() {
        if matches!(c, '=' | ';' | ':') {
            name_end = Some(i);
            terminator = Some(c);
            chars.next();
            break;
        }
        if !is_name_char(c) {
            return Err(
                ParseError::new(ParseErrorKind::InvalidParameter, line_num, i + 1)
                    .with_context(format!("unexpected character '{c}' in parameter name")),
            );
        }
        chars.next();
    }

    let (Some(name_end), Some(terminator)) = (name_end, terminator) else {
        return Err(ParseError::new(
            ParseErrorKind::MissingColon,
            line_num,
            line.len(),
        ));
    };
    if name_end == start {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            start + 1,
        ));
    }

    let param_name = &line[start..name_end];
    match terminator {
        ';' => return Ok((Parameter::flag(param_name), Next::Param)),
        ':' => return Ok((Parameter::flag(param_name), Next::Value(name_end + 1))),
        _ => {}
    }

    // Parse parameter values (comma-separated, may be quoted)
    let mut values = Vec::new();
    loop {
        values.push(parse_param_value(chars, line, line_num)?);

        match chars.next() {
            Some((_, ',')) => {}
            Some((_, ';')) => {
                return Ok((Parameter::with_values(param_name, values), Next::Param));
            }
            Some((i, ':')) => {
                return Ok((Parameter::with_values(param_name, values), Next::Value(i + 1)));
            }
            Some((i, c)) => {
                return Err(
                    ParseError::new(ParseErrorKind::InvalidParameter, line_num, i + 1)
                        .with_context(format!("unexpected character '{c}'")),
                );
            }
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingColon,
                    line_num,
                    line.len(),
                ));
            }
        }
    }
}

/// Parses a parameter value (possibly quoted), leaving the terminator.
fn parse_param_value(chars: &mut Chars<'_>, line: &str, line_num: usize) -> ParseResult<String> {
    let Some(&(start, first)) = chars.peek() else {
        return Ok(String::new());
    };

    if first == '"' {
        chars.next();
        for (i, c) in chars.by_ref() {
            if c == '"' {
                return Ok(caret_decode(&line[start + 1..i]));
            }
        }
        return Err(ParseError::new(
            ParseErrorKind::UnclosedQuote,
            line_num,
            start + 1,
        ));
    }

    // Unquoted value (ends at ',' ';' or ':')
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c == ',' || c == ';' || c == ':' {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    Ok(caret_decode(&line[start..end]))
}

/// Decodes RFC 6868 caret escapes. Unknown sequences are kept as-is.
fn caret_decode(s: &str) -> String {
    if !s.contains('^') {
        return s.to_string();
    }

    let mut value = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            value.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => {
                value.push('^');
                chars.next();
            }
            Some('n') => {
                value.push('\n');
                chars.next();
            }
            Some('\'') => {
                value.push('"');
                chars.next();
            }
            _ => value.push('^'),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfold_simple() {
        let input = "DESCRIPTION:This is a long description\r\n that continues here";
        assert_eq!(
            unfold(input),
            "DESCRIPTION:This is a long descriptionthat continues here"
        );
    }

    #[test]
    fn unfold_multiple() {
        let input = "DESCRIPTION:First\r\n Second\r\n\tThird";
        assert_eq!(unfold(input), "DESCRIPTION:FirstSecondThird");
    }

    #[test]
    fn unfold_removes_only_one_whitespace() {
        assert_eq!(unfold("SUMMARY:a\r\n  b"), "SUMMARY:a b");
    }

    #[test]
    fn unfold_bare_lf() {
        assert_eq!(unfold("DESCRIPTION:First\n Second"), "DESCRIPTION:FirstSecond");
        assert_eq!(unfold("A:1\nB:2"), "A:1\r\nB:2");
    }

    #[test]
    fn unfold_bare_cr() {
        assert_eq!(unfold("DESCRIPTION:First\r Second"), "DESCRIPTION:FirstSecond");
        assert_eq!(unfold("A:1\rB:2"), "A:1\r\nB:2");
    }

    #[test]
    fn unfold_preserves_newlines() {
        let input = "LINE1:Value1\r\nLINE2:Value2\r\n";
        assert_eq!(unfold(input), "LINE1:Value1\r\nLINE2:Value2\r\n");
    }

    #[test]
    fn unfold_keeps_multibyte_text() {
        assert_eq!(unfold("SUMMARY:Grüße\r\n aus Köln"), "SUMMARY:Grüßeaus Köln");
    }

    #[test]
    fn split_lines_tracks_physical_numbers() {
        let input = "BEGIN:VEVENT\r\nSUMMARY:Long\r\n  text\r\nUID:1\r\nEND:VEVENT\r\n";
        let lines = split_lines(input);
        let summary: Vec<_> = lines.iter().map(|l| (l.number, l.text.as_str())).collect();
        assert_eq!(
            summary,
            [
                (1, "BEGIN:VEVENT"),
                (2, "SUMMARY:Long text"),
                (4, "UID:1"),
                (5, "END:VEVENT"),
            ]
        );
    }

    #[test]
    fn split_lines_treats_lone_cr_as_break() {
        let lines = split_lines("SUMMARY:a\rb\r\nUID:1\n X\rEND:VEVENT");
        let summary: Vec<_> = lines.iter().map(|l| (l.number, l.text.as_str())).collect();
        assert_eq!(
            summary,
            [(1, "SUMMARY:a"), (2, "b"), (3, "UID:1X"), (5, "END:VEVENT")]
        );
    }

    #[test]
    fn split_lines_blank_line_ends_logical_line() {
        let lines = split_lines("A:1\r\n\r\n B:2\r\n");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["A:1", "B:2"]);
    }

    #[test]
    fn block_markers() {
        assert_eq!(block_marker("BEGIN:VEVENT"), Some(BlockMarker::Begin("VEVENT")));
        assert_eq!(block_marker("end:vevent"), Some(BlockMarker::End("vevent")));
        assert_eq!(block_marker("BEGIN:"), None);
        assert_eq!(block_marker("SUMMARY:BEGIN"), None);
        assert_eq!(block_marker("BEGINNING:X"), None);
    }

    #[test]
    fn parse_simple_line() {
        let result = parse_content_line("SUMMARY:Team Meeting", 1).unwrap();
        assert_eq!(result.name, "SUMMARY");
        assert!(result.params.is_empty());
        assert_eq!(result.raw_value, "Team Meeting");
    }

    #[test]
    fn parse_line_lowercase_name() {
        let result = parse_content_line("dtstart:20260123T120000Z", 1).unwrap();
        assert_eq!(result.name, "DTSTART");
    }

    #[test]
    fn parse_line_with_params() {
        let line = "DTSTART;TZID=America/New_York:20260123T120000";
        let result = parse_content_line(line, 1).unwrap();
        assert_eq!(result.name, "DTSTART");
        assert_eq!(result.params.len(), 1);
        assert_eq!(result.params.value("TZID"), Some("America/New_York"));
        assert_eq!(result.raw_value, "20260123T120000");
    }

    #[test]
    fn parse_line_value_keeps_colons() {
        let result = parse_content_line("URL:http://example.com:8080/x", 1).unwrap();
        assert_eq!(result.raw_value, "http://example.com:8080/x");
    }

    #[test]
    fn parse_line_with_quoted_param() {
        let line = "ATTENDEE;CN=\"Doe, Jane: PhD\":mailto:jane@example.com";
        let result = parse_content_line(line, 1).unwrap();
        assert_eq!(result.params.value("CN"), Some("Doe, Jane: PhD"));
        assert_eq!(result.raw_value, "mailto:jane@example.com");
    }

    #[test]
    fn parse_line_with_multiple_param_values() {
        let line = "ATTENDEE;ROLE=REQ-PARTICIPANT,OPT-PARTICIPANT:mailto:test@example.com";
        let result = parse_content_line(line, 1).unwrap();
        let role = result.params.get("ROLE").unwrap();
        assert_eq!(role.values, ["REQ-PARTICIPANT", "OPT-PARTICIPANT"]);
    }

    #[test]
    fn parse_line_with_bare_parameter() {
        let line = "ATTENDEE;RSVP;CN=Jo:mailto:jo@example.com";
        let result = parse_content_line(line, 1).unwrap();
        assert!(result.params.get("RSVP").unwrap().values.is_empty());
        assert_eq!(result.params.value("CN"), Some("Jo"));

        let result = parse_content_line("X-FLAG;DRAFT:yes", 1).unwrap();
        assert!(result.params.contains("DRAFT"));
        assert_eq!(result.raw_value, "yes");
    }

    #[test]
    fn parse_line_duplicate_param_overwrites() {
        let line = "DTSTART;VALUE=DATE-TIME;VALUE=DATE:20260123";
        let result = parse_content_line(line, 1).unwrap();
        assert_eq!(result.params.len(), 1);
        assert_eq!(result.value_type(), Some("DATE"));
    }

    #[test]
    fn parse_line_with_caret_encoding() {
        let line = "ATTENDEE;CN=\"Test^nName ^'Q^'\":mailto:test@example.com";
        let result = parse_content_line(line, 1).unwrap();
        assert_eq!(result.params.value("CN"), Some("Test\nName \"Q\""));
    }

    #[test]
    fn parse_line_unclosed_quote() {
        let line = "ATTENDEE;CN=\"Unclosed:mailto:test@example.com";
        let err = parse_content_line(line, 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedQuote);
    }

    #[test]
    fn parse_line_missing_colon() {
        let err = parse_content_line("INVALID", 4).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
        assert_eq!(err.line, 4);
    }

    #[test]
    fn parse_line_missing_name() {
        let err = parse_content_line(":value", 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingPropertyName);
    }

    #[test]
    fn parse_line_bad_name_character() {
        let err = parse_content_line("SUM MARY:x", 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidContentLine);
        assert_eq!(err.column, 4);
    }
}
