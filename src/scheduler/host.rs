//! Idle host: the self-perpetuating loop that feeds time slices to a
//! reconciler.
//!
//! Each iteration waits out the idle interval, opens an [`IdleDeadline`] of
//! `slice_budget` and runs one [`Reconciler::work_loop`] slice. Both values
//! come from the reconciler's own validated [`RuntimeConfig`], so the slice
//! budget and the yield threshold it is compared against never disagree.
//!
//! [`RuntimeConfig`]: crate::config::RuntimeConfig
//!
//! The reconciler
//! is shared through `Rc<RefCell<_>>` so callers on the same thread can issue
//! `render` requests between slices; the borrow is never held across an await.
//! Everything runs on one thread, so the futures here are `!Send` and belong on
//! a current-thread runtime or a `LocalSet`.

use std::cell::RefCell;

use tracing::trace;

use crate::display::DisplayAdapter;
use crate::reconciler::Reconciler;

use super::deadline::IdleDeadline;

/// Grants idle-time slices to a reconciler.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleHost;

impl IdleHost {
    pub fn new() -> Self {
        Self
    }

    async fn slice<A: DisplayAdapter>(&self, reconciler: &RefCell<Reconciler<A>>) -> bool {
        let (idle_interval, slice_budget) = {
            let reconciler = reconciler.borrow();
            let config = reconciler.config();
            (config.idle_interval, config.slice_budget)
        };
        tokio::time::sleep(idle_interval).await;
        let deadline = IdleDeadline::new(slice_budget);
        let report = reconciler.borrow_mut().work_loop(&deadline);
        if report.units > 0 {
            trace!(units = report.units, committed = report.committed, "idle slice");
        }
        report.committed
    }

    /// Grant slices forever, rescheduling after every one whether or not it
    /// had work to do.
    pub async fn run<A: DisplayAdapter>(&self, reconciler: &RefCell<Reconciler<A>>) {
        loop {
            self.slice(reconciler).await;
        }
    }

    /// Grant slices until the cycle in flight has been committed.
    ///
    /// Returns the number of slices granted; zero if nothing was pending.
    pub async fn run_until_committed<A: DisplayAdapter>(
        &self,
        reconciler: &RefCell<Reconciler<A>>,
    ) -> usize {
        let mut slices = 0;
        while !reconciler.borrow().is_idle() {
            slices += 1;
            if self.slice(reconciler).await {
                break;
            }
        }
        slices
    }
}
