//! Element model: immutable descriptions of what to render.
//!
//! An [`Element`] is either a host element (tag name, attributes, children) or a
//! text element carrying a literal string. Elements are cheap to clone: the
//! payload is shared behind an `Rc` and never mutated after construction.

use std::fmt;
use std::rc::Rc;

/// Attribute key reserved for child elements. Never applied to a display node.
pub const CHILDREN_KEY: &str = "children";

// ---------------------------------------------------------------------------
// AttrValue
// ---------------------------------------------------------------------------

/// The value of a single attribute on a host element.
///
/// Only [`AttrValue::String`] values and [`AttrValue::Style`] maps under the
/// `style` key reach the display tree. Every other shape is carried along but
/// skipped when a display node is materialized.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Number(f64),
    Bool(bool),
    /// Style declarations in insertion order.
    Style(Vec<(String, String)>),
    List(Vec<AttrValue>),
    Object(Vec<(String, AttrValue)>),
}

impl AttrValue {
    /// Build a style map from `(property, value)` pairs, keeping their order.
    pub fn style<K, V>(declarations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        AttrValue::Style(
            declarations
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Borrow the string payload, if this is a plain string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(f64::from(value))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(values: Vec<T>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// An insertion-ordered attribute list.
pub type Attributes = Vec<(String, AttrValue)>;

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// What an element renders as.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A display node of the given tag kind.
    Host { tag: String, attributes: Attributes },
    /// A text node wrapping the literal string.
    Text(String),
}

#[derive(Debug, PartialEq)]
struct ElementData {
    kind: ElementKind,
    children: Vec<Element>,
}

/// An immutable description of one node to render, plus its children.
#[derive(Clone, PartialEq)]
pub struct Element {
    inner: Rc<ElementData>,
}

impl Element {
    fn from_parts(kind: ElementKind, children: Vec<Element>) -> Self {
        Self {
            inner: Rc::new(ElementData { kind, children }),
        }
    }

    /// Start building a host element with no attributes or children.
    pub fn host(tag: impl Into<String>) -> ElementBuilder {
        ElementBuilder {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The element's kind (host or text).
    pub fn kind(&self) -> &ElementKind {
        &self.inner.kind
    }

    /// Declared children, in order. Always empty for text elements built
    /// through this module.
    pub fn children(&self) -> &[Element] {
        &self.inner.children
    }

    /// Whether this is a text element.
    pub fn is_text(&self) -> bool {
        matches!(self.inner.kind, ElementKind::Text(_))
    }

    /// The tag name of a host element.
    pub fn tag(&self) -> Option<&str> {
        match &self.inner.kind {
            ElementKind::Host { tag, .. } => Some(tag),
            ElementKind::Text(_) => None,
        }
    }

    /// Look up an attribute by key on a host element.
    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        match &self.inner.kind {
            ElementKind::Host { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            ElementKind::Text(_) => None,
        }
    }

    /// Total number of elements in this tree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Element::count).sum::<usize>()
    }

    #[cfg(test)]
    pub(crate) fn text_with_children(value: &str, children: Vec<Element>) -> Self {
        Self::from_parts(ElementKind::Text(value.to_owned()), children)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            ElementKind::Host { tag, attributes } => f
                .debug_struct("Element")
                .field("tag", tag)
                .field("attributes", attributes)
                .field("children", &self.inner.children)
                .finish(),
            ElementKind::Text(value) => f.debug_tuple("Text").field(value).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Child
// ---------------------------------------------------------------------------

/// A child passed to [`create_element`]: a literal string or a built element.
#[derive(Debug, Clone)]
pub enum Child {
    Text(String),
    Element(Element),
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_owned())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

impl From<Element> for Child {
    fn from(value: Element) -> Self {
        Child::Element(value)
    }
}

impl From<ElementBuilder> for Child {
    fn from(value: ElementBuilder) -> Self {
        Child::Element(value.build())
    }
}

impl From<Child> for Element {
    fn from(child: Child) -> Self {
        match child {
            Child::Text(value) => text(value),
            Child::Element(element) => element,
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a host element.
///
/// String children are wrapped into text elements; element children are kept
/// as they are. A `children` entry in `attributes` is dropped, since children
/// are only ever taken from the `children` argument.
pub fn create_element(
    tag: impl Into<String>,
    attributes: Attributes,
    children: impl IntoIterator<Item = Child>,
) -> Element {
    let attributes = attributes
        .into_iter()
        .filter(|(k, _)| k != CHILDREN_KEY)
        .collect();
    Element::from_parts(
        ElementKind::Host {
            tag: tag.into(),
            attributes,
        },
        children.into_iter().map(Element::from).collect(),
    )
}

/// Build a text element.
pub fn text(value: impl Into<String>) -> Element {
    Element::from_parts(ElementKind::Text(value.into()), Vec::new())
}

/// Builder for host elements, returned by [`Element::host`].
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attributes: Attributes,
    children: Vec<Child>,
}

impl ElementBuilder {
    /// Add an attribute (builder). Later values for the same key are kept as
    /// separate entries, applied in order.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Append a child (builder).
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children (builder).
    pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Child>>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Finish building.
    pub fn build(self) -> Element {
        create_element(self.tag, self.attributes, self.children)
    }
}

impl From<ElementBuilder> for Element {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}
