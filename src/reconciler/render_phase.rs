//! Render phase: one unit of work per fiber.

use tracing::{debug, trace};

use crate::display::DisplayAdapter;
use crate::element::{AttrValue, ElementKind, CHILDREN_KEY};
use crate::fiber::{FiberId, FiberPayload};

use super::Reconciler;

/// Attribute key whose mapping value is serialized to a declaration string.
const STYLE_KEY: &str = "style";

impl<A: DisplayAdapter> Reconciler<A> {
    /// Process one fiber and return the next one to visit.
    ///
    /// Creates and binds the fiber's display node if it has none, expands its
    /// declared children into a linked chain of new fibers, then picks the
    /// next fiber in pre-order. Nothing is attached to the display tree here.
    pub fn perform_unit_of_work(&mut self, id: FiberId) -> Option<FiberId> {
        let fiber = self.fibers.get_mut(id)?;
        trace!(?id, tag = fiber.payload.tag(), "unit of work");

        if fiber.display().is_none() {
            let node = materialize(&mut self.adapter, &fiber.payload);
            fiber.bind_display(node);
        }

        if !fiber.payload.is_text() {
            self.fibers.expand_children(id);
        }

        self.fibers.next_after(id)
    }
}

/// Create the detached display node for a fiber payload.
///
/// Text payloads become text nodes. Host payloads become element nodes with
/// every attribute except `children` applied: strings verbatim, a mapping
/// under `style` as a `k: v; k: v` declaration string. Other value shapes
/// are skipped.
pub fn materialize<A: DisplayAdapter>(adapter: &mut A, payload: &FiberPayload) -> A::Node {
    match payload {
        FiberPayload::Root { tag, .. } => adapter.create_element(tag),
        FiberPayload::Element(element) => match element.kind() {
            ElementKind::Text(value) => adapter.create_text(value),
            ElementKind::Host { tag, attributes } => {
                let node = adapter.create_element(tag);
                for (key, value) in attributes {
                    if key == CHILDREN_KEY {
                        continue;
                    }
                    match (key.as_str(), value) {
                        (_, AttrValue::String(s)) => adapter.set_attribute(node, key, s),
                        (STYLE_KEY, value) => match serialize_style(value) {
                            Some(style) => adapter.set_attribute(node, key, &style),
                            None => debug!(%tag, %key, "skipping unsupported style value"),
                        },
                        _ => debug!(%tag, %key, "skipping non-string attribute"),
                    }
                }
                node
            }
        },
    }
}

/// Serialize a style mapping as `prop: value` declarations joined by `; `.
///
/// Accepts [`AttrValue::Style`] and an [`AttrValue::Object`] whose values are
/// primitives (strings, numbers, booleans). Entries with other values are
/// left out. Returns `None` for any other shape.
pub fn serialize_style(value: &AttrValue) -> Option<String> {
    let declarations: Vec<String> = match value {
        AttrValue::Style(entries) => entries.iter().map(|(k, v)| format!("{k}: {v}")).collect(),
        AttrValue::Object(entries) => entries
            .iter()
            .filter_map(|(k, v)| primitive_text(v).map(|v| format!("{k}: {v}")))
            .collect(),
        _ => return None,
    };
    Some(declarations.join("; "))
}

fn primitive_text(value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::String(s) => Some(s.clone()),
        AttrValue::Number(n) => Some(n.to_string()),
        AttrValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
