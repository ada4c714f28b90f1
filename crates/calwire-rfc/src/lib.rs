//! iCalendar (RFC 5545) codec.
//!
//! Parses BEGIN/END-delimited, folded and escaped calendar text into a tree
//! of typed components, and serializes that tree back to wire text.

pub mod rfc;
