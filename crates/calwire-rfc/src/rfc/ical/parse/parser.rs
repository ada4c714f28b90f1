//! iCalendar document parser (RFC 5545).
//!
//! Parses complete iCalendar documents into component trees.

use std::str::FromStr;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{BlockMarker, LogicalLine, block_marker, parse_content_line, split_lines};
use super::values::decode_value;
use crate::rfc::ical::core::{
    Calendar, Component, ComponentKind, ContentLine, KindRegistry, Property, PropertyKind, Value,
};

/// Parser settings.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Tag of the outermost component. Text before its BEGIN line and after
    /// its END line is ignored.
    pub root: String,
    /// Tag to kind mapping, with optional validators.
    pub registry: KindRegistry,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            root: ComponentKind::Calendar.as_str().to_string(),
            registry: KindRegistry::new(),
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: KindRegistry) -> Self {
        self.registry = registry;
        self
    }
}

/// Parses an iCalendar document with a VCALENDAR root.
///
/// ## Errors
///
/// Returns an error if the block structure is broken: no root BEGIN, an END
/// without BEGIN, an END whose tag differs from its BEGIN, or input ending
/// inside an open component. No partial tree is returned.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<Component> {
    parse_with(input, &ParseOptions::default())
}

/// Parses a document with explicit options.
///
/// ## Errors
///
/// Same as [`parse`], plus [`ParseErrorKind::InvalidComponent`] when a
/// registered validator rejects a component.
#[tracing::instrument(skip(input, options), fields(input_len = input.len(), root = %options.root))]
pub fn parse_with(input: &str, options: &ParseOptions) -> ParseResult<Component> {
    tracing::debug!("Parsing iCalendar document");

    let lines = split_lines(input);
    tracing::trace!(count = lines.len(), "Split lines");

    let begin = lines
        .iter()
        .position(|l| {
            matches!(block_marker(&l.text), Some(BlockMarker::Begin(tag)) if tag.eq_ignore_ascii_case(&options.root))
        })
        .ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingBegin, 1, 1)
                .with_context(format!("expected BEGIN:{}", options.root))
        })?;

    let mut open = vec![Frame::new(&options.root, lines[begin].number, options)];

    for (idx, line) in lines.iter().enumerate().skip(begin + 1) {
        match block_marker(&line.text) {
            Some(BlockMarker::Begin(tag)) => open.push(Frame::new(tag, line.number, options)),
            Some(BlockMarker::End(tag)) => {
                let component = close_frame(&mut open, tag, line)?.finish(options)?;
                let Some(parent) = open.last_mut() else {
                    if idx + 1 < lines.len() {
                        tracing::debug!(
                            ignored = lines.len() - idx - 1,
                            "Ignoring lines after the root component"
                        );
                    }
                    tracing::debug!(
                        children = component.children.len(),
                        properties = component.properties.len(),
                        "iCalendar document parsed successfully"
                    );
                    return Ok(component);
                };
                parent.component.add_component(component);
            }
            None => {
                if let (Some(property), Some(frame)) = (parse_property(line), open.last_mut()) {
                    frame.component.add_property(property);
                }
            }
        }
    }

    Err(missing_end(&open))
}

/// Parses a document and merges its root into an existing component.
///
/// The root's properties and children are appended to `target`. With
/// `clear`, `target` is emptied first. `target` is untouched on error.
///
/// ## Errors
///
/// Same as [`parse_with`].
pub fn parse_into(
    input: &str,
    target: &mut Component,
    options: &ParseOptions,
    clear: bool,
) -> ParseResult<()> {
    let mut parsed = parse_with(input, options)?;
    if clear {
        target.clear();
    }
    target.properties.append(&mut parsed.properties);
    target.children.append(&mut parsed.children);
    Ok(())
}

/// A component whose END line has not been reached yet.
struct Frame<'a> {
    tag: &'a str,
    begin: usize,
    component: Component,
}

impl<'a> Frame<'a> {
    fn new(tag: &'a str, begin: usize, options: &ParseOptions) -> Self {
        Self {
            tag,
            begin,
            component: options.registry.instantiate(tag),
        }
    }

    /// Runs the registered validator on the completed component.
    fn finish(self, options: &ParseOptions) -> ParseResult<Component> {
        let Self {
            begin, component, ..
        } = self;
        options.registry.validate(&component).map_err(|reason| {
            ParseError::new(ParseErrorKind::InvalidComponent, begin, 1).with_context(reason)
        })?;

        tracing::trace!(
            component = %component.name,
            properties = component.properties.len(),
            children = component.children.len(),
            "Parsed component"
        );
        Ok(component)
    }
}

/// Pops the innermost open frame for an END line.
///
/// An END naming no open block is unmatched; one naming an outer block
/// while an inner one is still open is mismatched.
fn close_frame<'a>(open: &mut Vec<Frame<'a>>, end_tag: &str, line: &LogicalLine) -> ParseResult<Frame<'a>> {
    let Some(frame) = open.pop() else {
        return Err(ParseError::new(ParseErrorKind::UnmatchedEnd, line.number, 1)
            .with_context(format!("END:{end_tag}")));
    };
    if frame.tag.eq_ignore_ascii_case(end_tag) {
        return Ok(frame);
    }

    if open.iter().any(|outer| outer.tag.eq_ignore_ascii_case(end_tag)) {
        Err(
            ParseError::new(ParseErrorKind::MismatchedComponent, line.number, 1).with_context(
                format!("expected END:{}, found END:{end_tag}", frame.tag),
            ),
        )
    } else {
        Err(ParseError::new(ParseErrorKind::UnmatchedEnd, line.number, 1)
            .with_context(format!("END:{end_tag} inside {}", frame.tag)))
    }
}

fn missing_end(open: &[Frame<'_>]) -> ParseError {
    let (tag, line) = open.last().map_or(("", 1), |frame| (frame.tag, frame.begin));
    ParseError::new(ParseErrorKind::MissingEnd, line, 1).with_context(format!("missing END:{tag}"))
}

/// Parses an attribute line into a property.
///
/// Lines that are not `NAME[;params]:value` are skipped. Values that do not
/// decode under their expected type are kept verbatim as text.
fn parse_property(line: &LogicalLine) -> Option<Property> {
    let content_line = match parse_content_line(&line.text, line.number) {
        Ok(cl) => cl,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed content line");
            return None;
        }
    };

    let ContentLine {
        name,
        params,
        raw_value,
    } = content_line;
    let kind = PropertyKind::resolve(&name, &params);
    let col = line.text.len() - raw_value.len() + 1;

    let value = match decode_value(&raw_value, kind, line.number, col) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(property = %name, error = %e, "Keeping undecodable value as text");
            Value::Text(raw_value)
        }
    };

    Some(Property {
        name,
        params,
        value,
    })
}

impl FromStr for Calendar {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map(Self::from)
    }
}
