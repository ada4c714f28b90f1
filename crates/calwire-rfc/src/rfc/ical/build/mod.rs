//! iCalendar serialization (RFC 5545).
//!
//! This module provides serializers for iCalendar content:
//! - Escape: Free-text value escaping
//! - Fold: Content line folding at 75 octets
//! - Serializer: Full document serialization with export defaults

mod escape;
mod fold;
mod serializer;

pub use escape::escape_text;
pub use fold::{MAX_LINE_OCTETS, fold_line};
pub use serializer::{
    ExportDefaults, serialize, serialize_component, serialize_property, serialize_with,
};
