//! `view!` expands to the same trees as the element factory.

#![cfg(feature = "macros")]

use pretty_assertions::assert_eq;
use tidact::element::{AttrValue, Element};
use tidact::testing::Pilot;
use tidact::view;

#[test]
fn test_view_matches_builder() {
    let from_macro = view! {
        <div id="10" style={AttrValue::style([("background", "salmon"), ("color", "blue")])}>
            <div id="20">"Hello, Worlds"</div>
        </div>
    };
    let from_builder = Element::host("div")
        .attr("id", "10")
        .attr("style", AttrValue::style([("background", "salmon"), ("color", "blue")]))
        .child(Element::host("div").attr("id", "20").child("Hello, Worlds"))
        .build();
    assert_eq!(from_macro, from_builder);
}

#[test]
fn test_view_renders_through_pilot() {
    let name = String::from("world");
    let item = view! { <li>"nested"</li> };
    let tree = view! {
        <ul data-kind="list">
            {item}
            <li>"hello " {name}</li>
            <li />
        </ul>
    };

    let mut pilot = Pilot::new("main");
    pilot.render(tree);
    pilot.flush();
    insta::assert_snapshot!(
        pilot.markup(),
        @r#"<ul data-kind="list"><li>nested</li><li>hello world</li><li></li></ul>"#
    );
}
