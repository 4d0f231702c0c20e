//! # tidact
//!
//! A minimal virtual-DOM runtime with an interruptible fiber reconciler.
//!
//! Rendering is split in two. The render phase walks a fiber tree one unit of
//! work at a time, creating detached display nodes, and can pause between any
//! two units when the host's time slice runs out. The commit phase then
//! attaches everything to the live display tree in one uninterrupted pass.
//! Every render rebuilds the whole subtree; there is no diffing.
//!
//! ## Core Systems
//!
//! - **[`element`]** - Immutable element descriptions and the factory functions
//! - **[`fiber`]** - Slotmap-backed fiber arena with pre-order traversal
//! - **[`reconciler`]** - Render phase, commit phase, cooperative work loop
//! - **[`scheduler`]** - Deadlines and the tokio-driven idle host
//! - **[`display`]** - Display adapter trait and an in-memory display tree
//! - **[`config`]** - Slice budget and yield threshold
//! - **[`testing`]** - Headless [`Pilot`](testing::Pilot)
//!
//! ```
//! use tidact::display::{DisplayAdapter, MemoryDisplay};
//! use tidact::element::{AttrValue, Element};
//! use tidact::reconciler::Reconciler;
//!
//! let mut display = MemoryDisplay::new();
//! let root = display.create_element("main");
//! let mut reconciler = Reconciler::new(display);
//!
//! reconciler.render(
//!     Element::host("div")
//!         .attr("style", AttrValue::style([("color", "blue")]))
//!         .child("Hello")
//!         .build(),
//!     root,
//! );
//! reconciler.flush();
//!
//! assert_eq!(
//!     reconciler.adapter().inner_markup(root),
//!     r#"<div style="color: blue">Hello</div>"#
//! );
//! ```

// Foundation
pub mod config;
pub mod element;

// Core systems
pub mod display;
pub mod fiber;
pub mod reconciler;
pub mod scheduler;

// Testing
pub mod testing;

pub use config::{ConfigError, RuntimeConfig};
pub use display::DisplayAdapter;
pub use element::{create_element, text, AttrValue, Child, Element};
pub use reconciler::Reconciler;

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use tidact_macros::view;
