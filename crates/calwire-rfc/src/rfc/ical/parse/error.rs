//! iCalendar parsing error types.

use thiserror::Error;

/// Result type for iCalendar parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type for iCalendar parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}{}", suffix(.context.as_deref()))]
pub struct ParseError {
    /// Kind of error.
    pub kind: ParseErrorKind,
    /// Line number where the error occurred (1-based).
    pub line: usize,
    /// Column number where the error occurred (1-based).
    pub column: usize,
    /// Additional context about the error.
    pub context: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns whether the error concerns block structure, which aborts the
    /// parse, rather than a single line or value.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }
}

fn suffix(context: Option<&str>) -> String {
    context.map(|c| format!(": {c}")).unwrap_or_default()
}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Invalid content line format.
    #[error("invalid content line format")]
    InvalidContentLine,
    /// Missing property name.
    #[error("missing property name")]
    MissingPropertyName,
    /// Missing colon separator.
    #[error("missing colon separator")]
    MissingColon,
    /// Invalid parameter format.
    #[error("invalid parameter format")]
    InvalidParameter,
    /// Unclosed quoted string.
    #[error("unclosed quoted string")]
    UnclosedQuote,
    /// Invalid date format.
    #[error("invalid date format")]
    InvalidDate,
    /// Invalid time format.
    #[error("invalid time format")]
    InvalidTime,
    /// Invalid date-time format.
    #[error("invalid date-time format")]
    InvalidDateTime,
    /// Invalid duration format.
    #[error("invalid duration format")]
    InvalidDuration,
    /// Invalid period format.
    #[error("invalid period format")]
    InvalidPeriod,
    /// Invalid UTC offset format.
    #[error("invalid UTC offset format")]
    InvalidUtcOffset,
    /// Invalid GEO pair.
    #[error("invalid geographic position")]
    InvalidGeo,
    /// No BEGIN line for the root component.
    #[error("missing BEGIN line")]
    MissingBegin,
    /// Input ended inside an open component.
    #[error("missing END line")]
    MissingEnd,
    /// END tag differs from the open BEGIN tag.
    #[error("mismatched BEGIN/END")]
    MismatchedComponent,
    /// END line with no open component.
    #[error("END without matching BEGIN")]
    UnmatchedEnd,
    /// A registered validator rejected the component.
    #[error("invalid component")]
    InvalidComponent,
}

impl ParseErrorKind {
    /// Returns whether this kind aborts the whole parse.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::MissingBegin
                | Self::MissingEnd
                | Self::MismatchedComponent
                | Self::UnmatchedEnd
                | Self::InvalidComponent
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
