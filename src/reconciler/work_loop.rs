//! The cooperative work loop.

use crate::display::DisplayAdapter;
use crate::scheduler::{Deadline, Unbounded};

use super::Reconciler;

/// What one work-loop slice did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceReport {
    /// Units of work performed.
    pub units: usize,
    /// Whether the slice ended with a commit.
    pub committed: bool,
}

impl<A: DisplayAdapter> Reconciler<A> {
    /// Run one scheduling slice.
    ///
    /// Performs units of work while the cursor is set, consulting `deadline`
    /// after each one and stopping once less than the configured yield
    /// threshold remains. A slice with pending work always performs at least
    /// one unit. If the cursor ends up empty with a cycle in flight, the
    /// commit phase runs before returning.
    pub fn work_loop(&mut self, deadline: &dyn Deadline) -> SliceReport {
        let mut report = SliceReport::default();

        while let Some(current) = self.next_unit_of_work {
            self.next_unit_of_work = self.perform_unit_of_work(current);
            report.units += 1;
            if deadline.time_remaining() < self.config.yield_threshold {
                break;
            }
        }

        if self.next_unit_of_work.is_none() && self.wip_root.is_some() {
            self.commit_root();
            report.committed = true;
        }
        report
    }

    /// Drain all pending work in a single unbounded slice and commit.
    pub fn flush(&mut self) -> SliceReport {
        self.work_loop(&Unbounded)
    }
}
