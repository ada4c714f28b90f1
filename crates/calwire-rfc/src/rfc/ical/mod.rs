//! iCalendar implementation (RFC 5545).
//!
//! This module provides types, parsing, and serialization for iCalendar
//! data.
//!
//! ## Overview
//!
//! An iCalendar document is a tree of BEGIN/END-delimited components, each
//! holding an ordered list of properties. Property values are decoded into
//! typed [`Value`]s by a single name-to-type table that the serializer also
//! consults, so a parsed tree serializes back to equivalent text.
//!
//! ## Usage
//!
//! ### Parsing
//!
//! ```rust
//! use calwire_rfc::rfc::ical::parse;
//!
//! let input = "\
//! BEGIN:VCALENDAR\r\n\
//! VERSION:2.0\r\n\
//! BEGIN:VEVENT\r\n\
//! UID:kickoff@example.com\r\n\
//! DTSTART:20230101T120000Z\r\n\
//! SUMMARY:Kickoff\\, round two\r\n\
//! END:VEVENT\r\n\
//! END:VCALENDAR\r\n";
//!
//! let root = parse(input).unwrap();
//! let event = &root.components()[0];
//! assert_eq!(event.summary(), Some("Kickoff, round two"));
//! assert_eq!(
//!     event.get_property("DTSTART").unwrap().as_datetime().unwrap().timestamp(),
//!     1_672_574_400
//! );
//! ```
//!
//! ### Serializing
//!
//! ```rust
//! use calwire_rfc::rfc::ical::{Component, Property, serialize};
//!
//! let mut event = Component::event();
//! event.add_property(Property::text("UID", "standup@example.com"));
//! event.add_property(Property::text("SUMMARY", "Standup; daily"));
//!
//! let mut root = Component::calendar();
//! root.add_component(event);
//!
//! let output = serialize(&root);
//! assert!(output.contains("SUMMARY:Standup\\; daily\r\n"));
//! assert!(output.contains("METHOD:PUBLISH\r\n"));
//! ```
//!
//! ## Submodules
//!
//! - [`core`] - Core types (`Component`, `Property`, `Value`, etc.)
//! - [`parse`] - Parsing functions and error types
//! - [`build`] - Serialization functions

pub mod build;
pub mod core;
pub mod parse;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use build::{ExportDefaults, serialize, serialize_with};
pub use core::{
    AttributeValue, Calendar, Component, ComponentKind, Date, DateTime, Duration, GeoPair,
    KindRegistry, Parameter, Parameters, Period, Property, UtcOffset, Value,
};
pub use parse::{
    ParseError, ParseErrorKind, ParseOptions, ParseResult, parse, parse_into, parse_with,
};
