//! Cross-module tests for the iCalendar codec.
