//! iCalendar parsing (RFC 5545).
//!
//! This module provides parsers for iCalendar content:
//! - Lexer: Line unfolding and content line tokenization
//! - Values: Type-specific value decoders
//! - Parser: Component tree construction

mod error;
mod lexer;
mod parser;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{BlockMarker, LogicalLine, block_marker, parse_content_line, split_lines, unfold};
pub use parser::{ParseOptions, parse, parse_into, parse_with};
pub use values::{
    decode_value, parse_date, parse_datetime, parse_duration, parse_geo, parse_integer,
    parse_period, parse_time, parse_utc_offset, unescape_text,
};
