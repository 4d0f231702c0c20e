//! Scheduling: time-slice deadlines and the host loop that grants them.

pub mod deadline;
pub mod host;

pub use deadline::{Deadline, IdleDeadline, Unbounded, UnitDeadline};
pub use host::IdleHost;
