//! Narrow read/write interface onto the report's band tree.
//!
//! The evaluation engine walks sections to re-apply styles in response to
//! layout events and caches "is there anything to do here" per section. Two
//! things make that cache sound: every ordinary mutation bumps a change
//! tracker, and cache payloads live in a dedicated attribute namespace whose
//! writes deliberately do *not* bump it (the cache write must not invalidate
//! the cache).

use crate::value::Value;
use ahash::AHashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Attribute namespace for ordinary, user-visible attributes.
pub const NS_CORE: &str = "core";

/// Attribute namespace reserved for engine-internal payloads such as
/// evaluation caches. Writes under this namespace do not bump the change
/// tracker.
pub const NS_INTERNAL: &str = "internal";

/// Style slots the format functions mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Visible,
    BackgroundColor,
    Bold,
    FontSize,
}

/// The kind of band a section represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Root,
    ReportHeader,
    GroupHeader,
    ItemBand,
    GroupFooter,
    ReportFooter,
    PageHeader,
    PageFooter,
}

/// An attribute store entry: either a plain row value or an opaque payload
/// (downcast by whoever stored it).
#[derive(Clone)]
pub enum AttributeValue {
    Value(Value),
    Payload(Arc<dyn Any + Send + Sync>),
}

impl AttributeValue {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            AttributeValue::Value(v) => Some(v),
            AttributeValue::Payload(_) => None,
        }
    }

    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            AttributeValue::Value(_) => None,
            AttributeValue::Payload(p) => p.downcast_ref::<T>(),
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            AttributeValue::Payload(_) => f.write_str("Payload(..)"),
        }
    }
}

/// A leaf element inside a band (label, field, image placeholder).
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    styles: AHashMap<StyleKey, Value>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn style(&self, key: StyleKey) -> Option<&Value> {
        self.styles.get(&key)
    }
}

/// A band in the report's section tree.
///
/// Mutations go through the section so the change tracker stays accurate;
/// the tracker is monotonic and [`Section::change_tracker_deep`] aggregates
/// over the subtree so a nested change invalidates caches held on the root.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    kind: SectionKind,
    styles: AHashMap<StyleKey, Value>,
    attributes: AHashMap<(String, String), AttributeValue>,
    elements: Vec<Element>,
    sections: Vec<Section>,
    change_tracker: u64,
}

impl Section {
    #[must_use]
    pub fn new(kind: SectionKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            styles: AHashMap::new(),
            attributes: AHashMap::new(),
            elements: Vec::new(),
            sections: Vec::new(),
            change_tracker: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    #[must_use]
    pub fn style(&self, key: StyleKey) -> Option<&Value> {
        self.styles.get(&key)
    }

    pub fn set_style(&mut self, key: StyleKey, value: Value) {
        self.styles.insert(key, value);
        self.change_tracker += 1;
    }

    #[must_use]
    pub fn attribute(&self, namespace: &str, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .get(&(namespace.to_string(), name.to_string()))
    }

    /// Store an attribute. Writes under [`NS_INTERNAL`] skip the change
    /// tracker; everything else bumps it.
    pub fn set_attribute(
        &mut self,
        namespace: &str,
        name: impl Into<String>,
        value: AttributeValue,
    ) {
        self.attributes
            .insert((namespace.to_string(), name.into()), value);
        if namespace != NS_INTERNAL {
            self.change_tracker += 1;
        }
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
        self.change_tracker += 1;
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
        self.change_tracker += 1;
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Style a child element through the section so the tracker observes it.
    pub fn set_element_style(&mut self, index: usize, key: StyleKey, value: Value) {
        if let Some(element) = self.elements.get_mut(index) {
            element.styles.insert(key, value);
            self.change_tracker += 1;
        }
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// This section's own mutation counter.
    #[must_use]
    pub fn change_tracker(&self) -> u64 {
        self.change_tracker
    }

    /// Mutation counter aggregated over the whole subtree. Monotonic, since
    /// every per-section counter only ever increments.
    #[must_use]
    pub fn change_tracker_deep(&self) -> u64 {
        self.change_tracker
            + self
                .sections
                .iter()
                .map(Section::change_tracker_deep)
                .sum::<u64>()
    }
}
