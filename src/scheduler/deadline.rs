//! Deadlines: how much of the current slice is left.

use std::cell::Cell;
use std::time::Duration;

use tokio::time::Instant;

/// Remaining budget of one scheduling slice, as reported by the host.
pub trait Deadline {
    /// Time left in this slice. Zero once the slice is spent.
    fn time_remaining(&self) -> Duration;
}

/// A wall-clock slice that ends `budget` after it was opened.
///
/// Uses tokio's clock, so a paused test runtime freezes it.
#[derive(Debug, Clone, Copy)]
pub struct IdleDeadline {
    ends_at: Instant,
}

impl IdleDeadline {
    /// Open a slice of `budget` starting now.
    pub fn new(budget: Duration) -> Self {
        Self {
            ends_at: Instant::now() + budget,
        }
    }
}

impl Deadline for IdleDeadline {
    fn time_remaining(&self) -> Duration {
        self.ends_at.saturating_duration_since(Instant::now())
    }
}

/// A slice that never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// A slice with budget for exactly `units` units of work.
///
/// The work loop consults its deadline once after every unit; this deadline
/// reports an unlimited budget for the first `units - 1` queries and nothing
/// afterwards. Since a slice always performs one unit, `new(0)` behaves like
/// `new(1)`.
#[derive(Debug)]
pub struct UnitDeadline {
    units: usize,
    queries: Cell<usize>,
}

impl UnitDeadline {
    pub fn new(units: usize) -> Self {
        Self {
            units,
            queries: Cell::new(0),
        }
    }

    /// How many times the budget has been queried.
    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl Deadline for UnitDeadline {
    fn time_remaining(&self) -> Duration {
        let queries = self.queries.get() + 1;
        self.queries.set(queries);
        if queries < self.units {
            Duration::MAX
        } else {
            Duration::ZERO
        }
    }
}
