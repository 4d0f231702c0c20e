//! Headless testing support.
//!
//! Use the [`Pilot`] to drive a reconciler over an in-memory display tree one
//! slice at a time and inspect the committed markup.

pub mod pilot;

pub use pilot::Pilot;
