//! Value type parsers for iCalendar (RFC 5545 §3.3).
//!
//! Every parser takes the line and column of the value so errors point into
//! the document.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{
    Date, DateTime, Duration, GeoPair, Period, PropertyKind, Time, UtcOffset, Value, ValueKind,
};

/// Parses a DATE value (RFC 5545 §3.3.4).
///
/// Format: YYYYMMDD (e.g., "19970714")
///
/// ## Errors
/// Returns an error if the string is not exactly eight digits forming a
/// month 1-12 and day 1-31.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<Date> {
    let err = || ParseError::new(ParseErrorKind::InvalidDate, line, col);
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err().with_context(format!("expected YYYYMMDD, found '{s}'")));
    }

    let year = s[0..4].parse::<u16>().map_err(|_e| err())?;
    let month = s[4..6].parse::<u8>().map_err(|_e| err())?;
    let day = s[6..8].parse::<u8>().map_err(|_e| err())?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(err());
    }

    Ok(Date { year, month, day })
}

/// Parses a TIME value (RFC 5545 §3.3.12).
///
/// Format: HHMMSS[Z] (e.g., "133000", "133000Z")
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time.
pub fn parse_time(s: &str, line: usize, col: usize) -> ParseResult<Time> {
    let err = || ParseError::new(ParseErrorKind::InvalidTime, line, col);
    let (time_str, is_utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };

    if time_str.len() != 6 || !time_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let hour = time_str[0..2].parse::<u8>().map_err(|_e| err())?;
    let minute = time_str[2..4].parse::<u8>().map_err(|_e| err())?;
    let second = time_str[4..6].parse::<u8>().map_err(|_e| err())?;

    // Allow 60 for leap seconds
    if hour > 23 || minute > 59 || second > 60 {
        return Err(err());
    }

    Ok(Time::new(hour, minute, second, is_utc))
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5).
///
/// Format: YYYYMMDD"T"HHMMSS[Z] (e.g., "19970714T133000Z"). A value without
/// `Z` is local time and is stored as if local time were UTC. A bare DATE
/// is accepted and decodes as midnight UTC.
///
/// ## Errors
/// Returns an error if the string is neither a date-time nor a date, or
/// names a day that does not exist.
pub fn parse_datetime(s: &str, line: usize, col: usize) -> ParseResult<DateTime> {
    let err = || ParseError::new(ParseErrorKind::InvalidDateTime, line, col);

    let Some((date_str, time_str)) = s.split_once('T') else {
        let date = parse_date(s, line, col).map_err(|_e| err())?;
        return DateTime::start_of_day(date).ok_or_else(err);
    };

    let date = parse_date(date_str, line, col)?;
    let time = parse_time(time_str, line, col + date_str.len() + 1)?;

    DateTime::from_parts(date, time)
        .ok_or_else(|| err().with_context(format!("'{s}' is not a calendar date")))
}

/// Parses a UTC-OFFSET value (RFC 5545 §3.3.14).
///
/// Format: (+|-)HHMM[SS] (e.g., "+0530", "-0800")
///
/// ## Errors
/// Returns an error if the string is not a sign followed by four or six digits.
pub fn parse_utc_offset(s: &str, line: usize, col: usize) -> ParseResult<UtcOffset> {
    let err = || ParseError::new(ParseErrorKind::InvalidUtcOffset, line, col);

    let (ahead, digits) = if let Some(rest) = s.strip_prefix('+') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (false, rest)
    } else {
        return Err(err());
    };

    if !matches!(digits.len(), 4 | 6) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let hours = digits[0..2].parse::<u8>().map_err(|_e| err())?;
    let minutes = digits[2..4].parse::<u8>().map_err(|_e| err())?;
    let seconds = if digits.len() == 6 {
        Some(digits[4..6].parse::<u8>().map_err(|_e| err())?)
    } else {
        None
    };

    Ok(UtcOffset {
        ahead,
        hours,
        minutes,
        seconds,
    })
}

/// Parses a DURATION value (RFC 5545 §3.3.6).
///
/// Format: `[+|-]P[nW][nD][T[nH][nM][nS]]`. Designators must appear in this
/// order, each at most once. Weeks and days may be combined, and empty forms
/// such as `P` or `PT` decode to zero. Surrounding whitespace is ignored.
///
/// ## Errors
/// Returns an error if the string does not follow the grammar or the total
/// does not fit in an `i64` number of seconds.
pub fn parse_duration(s: &str, line: usize, col: usize) -> ParseResult<Duration> {
    let err = || ParseError::new(ParseErrorKind::InvalidDuration, line, col);
    let s = s.trim();

    let (negative, rest) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };
    let rest = rest.strip_prefix('P').ok_or_else(err)?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((date_part, time_part)) => (date_part, Some(time_part)),
        None => (rest, None),
    };

    let mut total: i64 = 0;
    let mut add = |count: i64, unit: i64| -> ParseResult<()> {
        total = count
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(err)?;
        Ok(())
    };

    for (count, designator) in duration_fields(date_part, &['W', 'D']).ok_or_else(err)? {
        add(count, designator_seconds(designator))?;
    }
    if let Some(time_part) = time_part {
        for (count, designator) in duration_fields(time_part, &['H', 'M', 'S']).ok_or_else(err)? {
            add(count, designator_seconds(designator))?;
        }
    }

    Ok(Duration::from_seconds(if negative { -total } else { total }))
}

/// Splits `1W2D`-style text into `(count, designator)` pairs, requiring the
/// designators to appear in the given order, each at most once.
fn duration_fields(s: &str, order: &[char]) -> Option<Vec<(i64, char)>> {
    let mut fields = Vec::new();
    let mut allowed = order;
    let mut digits_start = 0;

    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        let pos = allowed.iter().position(|&d| d == c)?;
        let digits = &s[digits_start..i];
        if digits.is_empty() {
            return None;
        }
        fields.push((digits.parse::<i64>().ok()?, c));
        allowed = &allowed[pos + 1..];
        digits_start = i + c.len_utf8();
    }

    // Trailing digits without a designator
    if digits_start != s.len() {
        return None;
    }
    Some(fields)
}

const fn designator_seconds(designator: char) -> i64 {
    match designator {
        'W' => 604_800,
        'D' => 86_400,
        'H' => 3_600,
        'M' => 60,
        _ => 1,
    }
}

/// Parses a PERIOD value (RFC 5545 §3.3.9).
///
/// Format: start"/"end or start"/"duration. The part after the first `/` is
/// a duration when it parses as one, otherwise an end date-time.
///
/// ## Errors
/// Returns an error if there is no `/` or either side fails to parse.
pub fn parse_period(s: &str, line: usize, col: usize) -> ParseResult<Period> {
    let err = || ParseError::new(ParseErrorKind::InvalidPeriod, line, col);
    let (start_str, end_str) = s.split_once('/').ok_or_else(err)?;

    let start = parse_datetime(start_str, line, col).map_err(|_e| err())?;
    let end_col = col + start_str.len() + 1;

    if let Ok(duration) = parse_duration(end_str, line, end_col) {
        return Ok(Period::Duration { start, duration });
    }
    let end = parse_datetime(end_str, line, end_col).map_err(|_e| {
        ParseError::new(ParseErrorKind::InvalidPeriod, line, end_col)
            .with_context(format!("'{end_str}' is neither a duration nor a date-time"))
    })?;
    Ok(Period::Explicit { start, end })
}

/// Parses a GEO value (RFC 5545 §3.8.1.6).
///
/// Format: latitude";"longitude. Each half is read as the longest leading
/// float; a half with no number reads as 0.
///
/// ## Errors
/// Returns an error if there is no `;` separator.
pub fn parse_geo(s: &str, line: usize, col: usize) -> ParseResult<GeoPair> {
    let (lat, lon) = s
        .split_once(';')
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidGeo, line, col))?;
    Ok(GeoPair::new(parse_float_prefix(lat), parse_float_prefix(lon)))
}

/// Parses an INTEGER value (RFC 5545 §3.3.8) leniently.
///
/// Reads an optional sign and the leading run of digits after any
/// whitespace; anything after the digits is ignored. Text with no leading
/// digits reads as 0, and out-of-range values saturate.
#[must_use]
pub fn parse_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        let digit = if negative { -digit } else { digit };
        value = value.saturating_mul(10).saturating_add(digit);
    }
    value
}

/// Reads the longest prefix of `s` (after leading whitespace) that is a float.
fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let candidate_len = s
        .char_indices()
        .find(|&(_, c)| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .map_or(s.len(), |(i, _)| i);

    (1..=candidate_len)
        .rev()
        .find_map(|len| s[..len].parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Unescapes text values (RFC 5545 §3.3.11).
///
/// Escape sequences: \\ \, \; \n \N. Each backslash is consumed with the
/// character after it, so `\\n` yields a backslash followed by `n`.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(',') => result.push(','),
                Some(';') => result.push(';'),
                Some('\\') | None => result.push('\\'),
                Some(other) => {
                    // Invalid escape, preserve as-is
                    result.push('\\');
                    result.push(other);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Decodes a raw property value under the given kind.
///
/// List kinds split on `,` and decode each element; one bad element fails
/// the whole list.
///
/// ## Errors
/// Returns the first value-level error encountered.
pub fn decode_value(raw: &str, kind: PropertyKind, line: usize, col: usize) -> ParseResult<Value> {
    if !kind.list {
        return decode_single(raw, kind.value, line, col);
    }

    let mut items = Vec::new();
    let mut item_col = col;
    for part in raw.split(',') {
        items.push(decode_single(part, kind.value, line, item_col)?);
        item_col += part.len() + 1;
    }
    Ok(Value::List(items))
}

fn decode_single(raw: &str, kind: ValueKind, line: usize, col: usize) -> ParseResult<Value> {
    Ok(match kind {
        ValueKind::Text => Value::Text(raw.to_string()),
        ValueKind::FreeText => Value::Text(unescape_text(raw)),
        ValueKind::Integer => Value::Integer(parse_integer(raw)),
        ValueKind::Date => Value::Date(parse_date(raw, line, col)?),
        ValueKind::DateTime => Value::DateTime(parse_datetime(raw, line, col)?),
        ValueKind::Duration => Value::Duration(parse_duration(raw, line, col)?),
        ValueKind::Period => Value::Period(parse_period(raw, line, col)?),
        ValueKind::UtcOffset => Value::UtcOffset(parse_utc_offset(raw, line, col)?),
        ValueKind::Geo => Value::Geo(parse_geo(raw, line, col)?),
    })
}
