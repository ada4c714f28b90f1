//! Component tag registry.
//!
//! Maps BEGIN/END tags to [`ComponentKind`]s. Built-in RFC 5545 tags are
//! always known; callers register extension tags, optionally with a
//! validator that runs once the component has been parsed.

use super::{Component, ComponentKind};

/// Checks a parsed component; the error string becomes the parse error context.
pub type ComponentValidator = fn(&Component) -> Result<(), String>;

#[derive(Debug, Clone)]
struct Registration {
    tag: String,
    validator: Option<ComponentValidator>,
}

#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    registrations: Vec<Registration>,
}

impl KindRegistry {
    /// Registry with only the built-in tags.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Registers a tag, replacing an earlier registration of the same tag.
    ///
    /// Registering a built-in tag only attaches the validator; its kind is
    /// unchanged.
    pub fn register(&mut self, tag: &str, validator: Option<ComponentValidator>) {
        let tag = tag.to_ascii_uppercase();
        match self.registrations.iter_mut().find(|r| r.tag == tag) {
            Some(existing) => existing.validator = validator,
            None => self.registrations.push(Registration { tag, validator }),
        }
    }

    /// Builder form of [`KindRegistry::register`].
    #[must_use]
    pub fn with(mut self, tag: &str, validator: Option<ComponentValidator>) -> Self {
        self.register(tag, validator);
        self
    }

    /// Returns whether the tag is built in or registered.
    #[must_use]
    pub fn is_known(&self, tag: &str) -> bool {
        self.resolve(tag) != ComponentKind::Unknown
    }

    /// Resolves a tag to its kind.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> ComponentKind {
        match ComponentKind::parse(tag) {
            ComponentKind::Unknown if self.find(tag).is_some() => ComponentKind::Extension,
            kind => kind,
        }
    }

    /// Creates an empty component for the tag.
    #[must_use]
    pub fn instantiate(&self, tag: &str) -> Component {
        Component::with_kind(self.resolve(tag), tag)
    }

    /// Runs the validator registered for the component's tag, if any.
    ///
    /// # Errors
    ///
    /// Returns the validator's message when it rejects the component.
    pub fn validate(&self, component: &Component) -> Result<(), String> {
        match self.find(&component.name).and_then(|r| r.validator) {
            Some(validator) => validator(component),
            None => Ok(()),
        }
    }

    fn find(&self, tag: &str) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|r| r.tag.eq_ignore_ascii_case(tag))
    }
}
