//! iCalendar component types (RFC 5545 §3.4-3.6).

use super::{Parameters, Property, Value};

/// Component kind for iCalendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// STANDARD sub-component of VTIMEZONE.
    Standard,
    /// DAYLIGHT sub-component of VTIMEZONE.
    Daylight,
    /// Tag registered by the caller in a [`KindRegistry`](super::KindRegistry).
    Extension,
    /// Unregistered tag; the component is kept with its original name.
    Unknown,
}

impl ComponentKind {
    /// Returns the string name for this component kind.
    ///
    /// `Extension` and `Unknown` have no fixed tag; the component's own
    /// `name` carries it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Timezone => "VTIMEZONE",
            Self::Alarm => "VALARM",
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
            Self::Extension => "X-EXTENSION",
            Self::Unknown => "X-UNKNOWN",
        }
    }

    /// Parses a built-in component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of an attribute lookup: one value, or every value when the name
/// repeats.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue<'a> {
    Single(&'a Value),
    Multiple(Vec<&'a Value>),
}

impl<'a> AttributeValue<'a> {
    /// Returns the first value.
    #[must_use]
    pub fn first(&self) -> Option<&'a Value> {
        match self {
            Self::Single(v) => Some(*v),
            Self::Multiple(vs) => vs.first().copied(),
        }
    }

    /// Returns all values in insertion order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<&'a Value> {
        match self {
            Self::Single(v) => vec![*v],
            Self::Multiple(vs) => vs.clone(),
        }
    }
}

/// An iCalendar component.
///
/// Components can contain properties and nested sub-components.
/// For example, a VCALENDAR contains VEVENTs, which may contain VALARMs.
/// Both lists keep insertion order, and a property name may repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Component type.
    pub kind: ComponentKind,
    /// Tag as written (uppercase), preserved for extension and unknown kinds.
    pub name: String,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
    /// Nested sub-components.
    pub children: Vec<Component>,
}

impl Component {
    /// Creates a new component with the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self::with_kind(kind, kind.as_str())
    }

    /// Creates a new component with a custom name (for X-components).
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = ComponentKind::parse(&name);
        Self::with_kind(kind, name)
    }

    /// Creates a component with an explicit kind and tag.
    #[must_use]
    pub fn with_kind(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into().to_ascii_uppercase(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a VCALENDAR component.
    #[must_use]
    pub fn calendar() -> Self {
        Self::new(ComponentKind::Calendar)
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    /// Creates a VTODO component.
    #[must_use]
    pub fn todo() -> Self {
        Self::new(ComponentKind::Todo)
    }

    /// Creates a VJOURNAL component.
    #[must_use]
    pub fn journal() -> Self {
        Self::new(ComponentKind::Journal)
    }

    /// Creates a VTIMEZONE component.
    #[must_use]
    pub fn timezone() -> Self {
        Self::new(ComponentKind::Timezone)
    }

    /// Creates a VALARM component.
    #[must_use]
    pub fn alarm() -> Self {
        Self::new(ComponentKind::Alarm)
    }

    /// Appends a property.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Appends a child component.
    pub fn add_component(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .collect()
    }

    /// Returns the value of the named attribute.
    ///
    /// A name that appears once yields [`AttributeValue::Single`]; a name
    /// that repeats yields every value in insertion order.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<AttributeValue<'_>> {
        let mut values: Vec<&Value> = self
            .get_properties(name)
            .into_iter()
            .map(|p| &p.value)
            .collect();
        match values.len() {
            0 => None,
            1 => values.pop().map(AttributeValue::Single),
            _ => Some(AttributeValue::Multiple(values)),
        }
    }

    /// Returns the named attribute, or `default` when it is absent.
    #[must_use]
    pub fn get_attribute_or<'a>(&'a self, name: &str, default: &'a Value) -> AttributeValue<'a> {
        self.get_attribute(name)
            .unwrap_or(AttributeValue::Single(default))
    }

    /// Returns the parameters of every attribute with the given name.
    #[must_use]
    pub fn get_attribute_params(&self, name: &str) -> Vec<&Parameters> {
        self.get_properties(name)
            .into_iter()
            .map(|p| &p.params)
            .collect()
    }

    /// Sets an attribute.
    ///
    /// With `append` the attribute is added after the existing ones;
    /// otherwise the first attribute with the same name is replaced in place
    /// (or the attribute is appended if there is none).
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        params: Parameters,
        append: bool,
    ) {
        let mut prop = Property::new(name, value);
        prop.params = params;
        self.upsert_first_or_append(prop, append);
    }

    /// Replaces the first property with the same name, or appends.
    ///
    /// When `append` is set the property is always appended.
    pub fn upsert_first_or_append(&mut self, prop: Property, append: bool) {
        if !append
            && let Some(existing) = self.properties.iter_mut().find(|p| p.name == prop.name)
        {
            *existing = prop;
            return;
        }
        self.properties.push(prop);
    }

    /// Removes every attribute with the given name and returns how many
    /// were removed.
    pub fn remove_attribute(&mut self, name: &str) -> usize {
        let before = self.properties.len();
        self.properties.retain(|p| !p.name.eq_ignore_ascii_case(name));
        before - self.properties.len()
    }

    /// Returns the child components in order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.children
    }

    /// Returns the child at `idx`.
    #[must_use]
    pub fn component(&self, idx: usize) -> Option<&Component> {
        self.children.get(idx)
    }

    /// Returns the first child with the given tag (case-insensitive).
    #[must_use]
    pub fn find_component(&self, tag: &str) -> Option<&Component> {
        self.children
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(tag))
    }

    /// Mutable variant of [`Component::find_component`].
    pub fn find_component_mut(&mut self, tag: &str) -> Option<&mut Component> {
        self.children
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(tag))
    }

    /// Drops every property and child.
    pub fn clear(&mut self) {
        self.properties.clear();
        self.children.clear();
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_property("UID")?.as_text()
    }

    /// Returns the SUMMARY property value if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.get_property("SUMMARY")?.as_text()
    }

    /// Returns the DESCRIPTION property value if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get_property("DESCRIPTION")?.as_text()
    }

    /// Returns children of a specific kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.children.iter().filter(|c| c.kind == kind).collect()
    }

    /// Returns all VEVENT children.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Event)
    }

    /// Returns all VTODO children.
    #[must_use]
    pub fn todos(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Todo)
    }

    /// Returns all VTIMEZONE children.
    #[must_use]
    pub fn timezones(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Timezone)
    }

    /// Returns all VALARM children.
    #[must_use]
    pub fn alarms(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Alarm)
    }
}

/// Tears the tree down with an explicit stack so that deeply nested input
/// does not exhaust the call stack.
impl Drop for Component {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

/// Top-level iCalendar object.
///
/// This is a convenience wrapper around a VCALENDAR component
/// with helper methods for common operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    /// The root VCALENDAR component.
    pub root: Component,
}

impl Calendar {
    /// Creates an empty calendar.
    ///
    /// VERSION, PRODID and METHOD are filled in on export if still absent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Component::calendar(),
        }
    }

    /// Returns the VERSION value.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.root.get_property("VERSION")?.as_text()
    }

    /// Returns the PRODID value.
    #[must_use]
    pub fn prodid(&self) -> Option<&str> {
        self.root.get_property("PRODID")?.as_text()
    }

    /// Returns the METHOD value.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.root.get_property("METHOD")?.as_text()
    }

    /// Adds a VEVENT component.
    pub fn add_event(&mut self, event: Component) {
        self.root.add_component(event);
    }

    /// Adds a VTODO component.
    pub fn add_todo(&mut self, todo: Component) {
        self.root.add_component(todo);
    }

    /// Returns all VEVENT components.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.root.events()
    }

    /// Returns all VTODO components.
    #[must_use]
    pub fn todos(&self) -> Vec<&Component> {
        self.root.todos()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Component> for Calendar {
    fn from(root: Component) -> Self {
        Self { root }
    }
}
