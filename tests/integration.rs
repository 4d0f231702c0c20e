//! Integration tests for tidact.
//!
//! These exercise the public API from outside the crate: element factory,
//! reconciler, in-memory display tree, deadlines and the headless pilot.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tidact::display::{DisplayAdapter, DisplayNodeId, DisplayNodeKind, MemoryDisplay};
use tidact::element::{create_element, text, AttrValue, Child, Element, ElementKind};
use tidact::reconciler::Reconciler;
use tidact::scheduler::{IdleDeadline, IdleHost, UnitDeadline};
use tidact::testing::Pilot;
use tidact::{ConfigError, RuntimeConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scenario() -> Element {
    create_element(
        "div",
        vec![],
        vec![Child::from(create_element(
            "span",
            vec![("id".into(), AttrValue::from("x"))],
            vec![Child::from("hi")],
        ))],
    )
}

fn wide_and_deep() -> Element {
    Element::host("section")
        .attr("class", "outer")
        .child(
            Element::host("ul")
                .child(Element::host("li").child("one"))
                .child(Element::host("li").child("two").child(Element::host("b").child("!")))
                .child(Element::host("li")),
        )
        .child("tail")
        .child(Element::host("footer").child(Element::host("p").child("end")))
        .build()
}

/// Assert that the display subtree at `node` mirrors `element` exactly.
fn assert_mirrors(display: &MemoryDisplay, node: DisplayNodeId, element: &Element) {
    match (display.get(node).unwrap(), element.kind()) {
        (DisplayNodeKind::Text(actual), ElementKind::Text(expected)) => {
            assert_eq!(actual, expected);
        }
        (DisplayNodeKind::Element { tag, .. }, ElementKind::Host { tag: expected, .. }) => {
            assert_eq!(tag, expected);
        }
        (actual, expected) => panic!("kind mismatch: {actual:?} vs {expected:?}"),
    }
    let kids = display.children(node);
    assert_eq!(kids.len(), element.children().len());
    for (&kid, child) in kids.iter().zip(element.children()) {
        assert_eq!(display.parent(kid), Some(node));
        assert_mirrors(display, kid, child);
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn test_div_span_text_scenario() {
    let mut pilot = Pilot::new("main");
    pilot.render(scenario());
    pilot.flush();
    insta::assert_snapshot!(pilot.markup(), @r#"<div><span id="x">hi</span></div>"#);
}

#[test]
fn test_style_attribute_serialized() {
    let mut pilot = Pilot::new("main");
    pilot.render(
        Element::host("div")
            .attr("id", "10")
            .attr(
                "style",
                AttrValue::style([("background", "salmon"), ("color", "blue")]),
            )
            .child(Element::host("div").attr("id", "20").child("Hello, Worlds"))
            .build(),
    );
    pilot.flush();

    let outer = pilot.display().children(pilot.container())[0];
    assert_eq!(
        pilot.display().attribute(outer, "style"),
        Some("background: salmon; color: blue")
    );
    assert_eq!(
        pilot.markup(),
        r#"<div id="10" style="background: salmon; color: blue"><div id="20">Hello, Worlds</div></div>"#
    );
}

// ---------------------------------------------------------------------------
// Traversal and attachment
// ---------------------------------------------------------------------------

#[test]
fn test_every_fiber_visited_once_and_materialized() {
    let mut display = MemoryDisplay::new();
    let container = display.create_element("main");
    let mut rec = Reconciler::new(display);
    let tree = wide_and_deep();
    rec.render(tree.clone(), container);

    let mut visited = Vec::new();
    let mut cursor = rec.wip_root();
    while let Some(id) = cursor {
        visited.push(id);
        cursor = rec.perform_unit_of_work(id);
    }

    // One fiber per element plus the synthetic root.
    assert_eq!(visited.len(), tree.count() + 1);
    let mut unique = visited.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), visited.len());

    assert_eq!(rec.fibers().len(), visited.len());
    assert!(rec.fibers().iter().all(|(_, fiber)| fiber.display().is_some()));
    // Nodes exist but nothing is attached yet.
    assert!(rec.adapter().children(container).is_empty());
}

#[test]
fn test_committed_tree_mirrors_elements() {
    let mut pilot = Pilot::new("main");
    let tree = wide_and_deep();
    pilot.render(tree.clone());
    pilot.flush();

    let kids = pilot.display().children(pilot.container()).to_vec();
    assert_eq!(kids.len(), 1);
    assert_mirrors(pilot.display(), kids[0], &tree);
    assert_eq!(pilot.display().parent(pilot.container()), None);
}

#[test]
fn test_text_nodes_carry_no_attributes() {
    let mut pilot = Pilot::new("main");
    pilot.render(Element::host("p").attr("id", "p").child("plain").build());
    pilot.flush();

    let p = pilot.display().children(pilot.container())[0];
    let leaf = pilot.display().children(p)[0];
    assert_eq!(
        pilot.display().get(leaf),
        Some(&DisplayNodeKind::Text("plain".into()))
    );
    assert_eq!(pilot.display().attribute(leaf, "id"), None);
}

// ---------------------------------------------------------------------------
// Re-rendering
// ---------------------------------------------------------------------------

#[test]
fn test_rerender_replaces_previous_tree() {
    let mut pilot = Pilot::new("main");
    pilot.render(wide_and_deep());
    pilot.flush();
    pilot.render(scenario());
    pilot.flush();

    assert_eq!(pilot.markup(), r#"<div><span id="x">hi</span></div>"#);
    let kids = pilot.display().children(pilot.container()).to_vec();
    assert_eq!(kids.len(), 1);
    assert_mirrors(pilot.display(), kids[0], &scenario());
    assert_eq!(pilot.reconciler().commits(), 2);
}

#[test]
fn test_rerenders_do_not_grow_display() {
    let mut pilot = Pilot::new("main");
    for i in 0..1000 {
        pilot.render(Element::host("div").child(i.to_string()).build());
        if i % 2 == 0 {
            pilot.flush();
        } else {
            pilot.step_units(2);
        }
    }
    pilot.flush();

    assert_eq!(pilot.markup(), "<div>999</div>");
    // container + div + text, whatever was abandoned or replaced before
    assert_eq!(pilot.display().len(), 3);
    assert!(pilot.display().log().is_empty());
}

#[test]
fn test_render_mid_cycle_last_write_wins() {
    let mut pilot = Pilot::new("main");
    pilot.render(wide_and_deep());
    pilot.step_units(4);
    assert!(!pilot.has_attachments());

    pilot.render(text("replacement"));
    pilot.flush();
    assert_eq!(pilot.markup(), "replacement");
    assert_eq!(pilot.reconciler().commits(), 1);
}

// ---------------------------------------------------------------------------
// Yield / resume
// ---------------------------------------------------------------------------

#[test]
fn test_one_unit_slices_defer_attachment_until_commit() {
    let mut pilot = Pilot::new("main");
    let tree = wide_and_deep();
    let fibers = tree.count() + 1;
    pilot.render(tree);

    for _ in 0..fibers - 1 {
        let report = pilot.step();
        assert_eq!(report.units, 1);
        assert!(!report.committed);
        assert!(!pilot.has_attachments());
        assert_eq!(pilot.markup(), "");
    }

    let last = pilot.step();
    assert!(last.committed);
    assert!(pilot.has_attachments());
    assert_eq!(pilot.slices(), fibers);
    assert!(pilot.reconciler().is_idle());
}

#[test]
fn test_resume_after_exhausted_wall_clock_deadline() {
    let mut pilot = Pilot::new("main");
    pilot.render(scenario());

    // An already-spent slice still performs one unit.
    let spent = IdleDeadline::new(Duration::ZERO);
    let report = pilot.slice(&spent);
    assert_eq!(report.units, 1);
    assert!(pilot.reconciler().has_pending_work());

    pilot.flush();
    assert_eq!(pilot.markup(), r#"<div><span id="x">hi</span></div>"#);
}

#[test]
fn test_unit_deadline_budget() {
    let mut pilot = Pilot::new("main");
    pilot.render(scenario());
    // root, div, span, text
    let report = pilot.slice(&UnitDeadline::new(10));
    assert_eq!(report.units, 4);
    assert!(report.committed);
}

// ---------------------------------------------------------------------------
// Idle host
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_idle_host_paused_clock_drains_in_one_slice() {
    let mut display = MemoryDisplay::new();
    let container = display.create_element("main");
    let config = RuntimeConfig::new()
        .with_slice_budget(Duration::from_millis(2))
        .with_yield_threshold(Duration::from_millis(1));
    let rec = Rc::new(RefCell::new(Reconciler::with_config(display, config).unwrap()));

    rec.borrow_mut().render(scenario(), container);
    let slices = IdleHost::new().run_until_committed(&rec).await;

    // The clock is paused, so every slice has its full budget and drains.
    assert_eq!(slices, 1);
    assert_eq!(
        rec.borrow().adapter().inner_markup(container),
        r#"<div><span id="x">hi</span></div>"#
    );
}

#[test]
fn test_threshold_above_budget_never_reaches_a_host() {
    let mut display = MemoryDisplay::new();
    display.create_element("main");
    let config = RuntimeConfig::new().with_yield_threshold(Duration::from_secs(10));
    assert!(matches!(
        Reconciler::with_config(display, config),
        Err(ConfigError::ThresholdExceedsBudget { .. })
    ));
}

/// Memory display that burns wall-clock time for every node it creates.
struct SlowDisplay {
    inner: MemoryDisplay,
    cost: Duration,
}

impl DisplayAdapter for SlowDisplay {
    type Node = DisplayNodeId;

    fn create_element(&mut self, tag: &str) -> DisplayNodeId {
        std::thread::sleep(self.cost);
        self.inner.create_element(tag)
    }

    fn create_text(&mut self, text: &str) -> DisplayNodeId {
        std::thread::sleep(self.cost);
        self.inner.create_text(text)
    }

    fn set_attribute(&mut self, node: DisplayNodeId, key: &str, value: &str) {
        self.inner.set_attribute(node, key, value);
    }

    fn append_child(&mut self, parent: DisplayNodeId, child: DisplayNodeId) {
        self.inner.append_child(parent, child);
    }

    fn clear_children(&mut self, node: DisplayNodeId) {
        self.inner.clear_children(node);
    }

    fn tag_name(&self, node: DisplayNodeId) -> String {
        self.inner.tag_name(node)
    }

    fn release(&mut self, node: DisplayNodeId) {
        self.inner.release(node);
    }
}

#[test]
fn test_idle_host_yields_when_slice_runs_out() {
    let mut inner = MemoryDisplay::new();
    let container = inner.create_element("main");
    let display = SlowDisplay {
        inner,
        cost: Duration::from_millis(3),
    };
    // Each node costs more than budget minus threshold, so a slice can fit
    // at most one node.
    let config = RuntimeConfig::new()
        .with_slice_budget(Duration::from_millis(4))
        .with_yield_threshold(Duration::from_millis(2));
    let rec = RefCell::new(Reconciler::with_config(display, config).unwrap());

    rec.borrow_mut().render(scenario(), container);
    let slices = tokio_test::block_on(IdleHost::new().run_until_committed(&rec));

    // div, span and text each need a slice of their own.
    assert!(slices >= 3, "expected at least 3 slices, got {slices}");
    assert_eq!(rec.borrow().commits(), 1);
    assert_eq!(
        rec.borrow().adapter().inner.inner_markup(container),
        r#"<div><span id="x">hi</span></div>"#
    );
}

#[test]
fn test_idle_host_on_real_clock() {
    let mut display = MemoryDisplay::new();
    let container = display.create_element("main");
    let rec = RefCell::new(Reconciler::new(display));
    let host = IdleHost::new();

    rec.borrow_mut().render(wide_and_deep(), container);
    let slices = tokio_test::block_on(host.run_until_committed(&rec));

    assert!(slices >= 1);
    assert!(rec.borrow().is_idle());
    let kids = rec.borrow().adapter().children(container).to_vec();
    assert_mirrors(rec.borrow().adapter(), kids[0], &wide_and_deep());
}

// ---------------------------------------------------------------------------
// Custom adapter
// ---------------------------------------------------------------------------

/// Adapter that only records operations as strings.
#[derive(Default)]
struct Recorder {
    next: u32,
    ops: Vec<String>,
}

impl DisplayAdapter for Recorder {
    type Node = u32;

    fn create_element(&mut self, tag: &str) -> u32 {
        self.next += 1;
        self.ops.push(format!("create {tag}#{}", self.next));
        self.next
    }

    fn create_text(&mut self, text: &str) -> u32 {
        self.next += 1;
        self.ops.push(format!("text {text:?}#{}", self.next));
        self.next
    }

    fn set_attribute(&mut self, node: u32, key: &str, value: &str) {
        self.ops.push(format!("set #{node} {key}={value}"));
    }

    fn append_child(&mut self, parent: u32, child: u32) {
        self.ops.push(format!("append #{child} -> #{parent}"));
    }

    fn clear_children(&mut self, node: u32) {
        self.ops.push(format!("clear #{node}"));
    }

    fn tag_name(&self, _node: u32) -> String {
        "body".into()
    }
}

#[test]
fn test_custom_adapter_sees_render_then_commit() {
    let mut rec = Reconciler::new(Recorder::default());
    rec.render(scenario(), 0);
    rec.flush();
    assert_eq!(
        rec.adapter().ops,
        vec![
            "create div#1",
            "create span#2",
            "set #2 id=x",
            "text \"hi\"#3",
            "clear #0",
            "append #1 -> #0",
            "append #2 -> #1",
            "append #3 -> #2",
        ]
    );
}
