//! iCalendar core models (RFC 5545).
//!
//! This module defines the data structures for representing iCalendar
//! content:
//! - Components own their properties and children in insertion order
//! - Values are decoded into typed variants, with verbatim text as fallback
//! - One table maps property names to value types for both directions

mod component;
mod datetime;
mod duration;
mod kind;
mod parameter;
mod property;
mod registry;
mod value;

pub use component::{AttributeValue, Calendar, Component, ComponentKind};
pub use datetime::{DateTime, Time, UtcOffset, ZoneTag};
pub use duration::Duration;
pub use kind::{PropertyKind, ValueKind};
pub use parameter::{Parameter, Parameters, names as param_names};
pub use property::{ContentLine, Property};
pub use registry::{ComponentValidator, KindRegistry};
pub use value::{Date, GeoPair, Period, Value};
