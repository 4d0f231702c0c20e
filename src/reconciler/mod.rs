//! Incremental reconciler: render phase, commit phase and the work loop.
//!
//! A [`Reconciler`] is one runtime instance. It owns the display adapter, the
//! fiber arena of the cycle in flight, the scheduling cursor
//! (`next_unit_of_work`) and the work-in-progress root. There is no global
//! state; tests build a fresh reconciler each time.
//!
//! ```text
//! render(el, container)          work_loop(deadline) ...           commit
//!   root fiber = cursor  ──►  perform_unit_of_work × n  ──►  attach all nodes
//!                             (yields between units)          (never yields)
//! ```

mod commit;
mod render_phase;
mod work_loop;

pub use render_phase::{materialize, serialize_style};
pub use work_loop::SliceReport;

use tracing::debug;

use crate::config::{ConfigError, RuntimeConfig};
use crate::display::DisplayAdapter;
use crate::element::Element;
use crate::fiber::{FiberId, FiberTree};

/// Fiber reconciler over a display adapter `A`.
pub struct Reconciler<A: DisplayAdapter> {
    adapter: A,
    config: RuntimeConfig,
    fibers: FiberTree<A::Node>,
    next_unit_of_work: Option<FiberId>,
    wip_root: Option<FiberId>,
    commits: u64,
}

impl<A: DisplayAdapter> Reconciler<A> {
    /// Create a reconciler with the default config.
    pub fn new(adapter: A) -> Self {
        Self::from_parts(adapter, RuntimeConfig::default())
    }

    /// Create a reconciler with an explicit config.
    ///
    /// The config is the single source of scheduling parameters: the work
    /// loop reads the yield threshold from it and an
    /// [`IdleHost`](crate::scheduler::IdleHost) reads the slice budget and
    /// idle interval from it, so it is validated here.
    pub fn with_config(adapter: A, config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(adapter, config))
    }

    fn from_parts(adapter: A, config: RuntimeConfig) -> Self {
        Self {
            adapter,
            config,
            fibers: FiberTree::new(),
            next_unit_of_work: None,
            wip_root: None,
            commits: 0,
        }
    }

    /// Request that `element` be rendered into `container`.
    ///
    /// Returns immediately. The tree is built over later [`work_loop`]
    /// slices and attached in one commit once every fiber has been visited.
    ///
    /// Calling this while an earlier cycle is still in flight abandons that
    /// cycle: its fibers are dropped and the detached display nodes it
    /// created are handed to [`DisplayAdapter::release`]. The last request
    /// wins.
    ///
    /// [`work_loop`]: Reconciler::work_loop
    pub fn render(&mut self, element: Element, container: A::Node) {
        if self.wip_root.take().is_some() {
            debug!(
                fibers = self.fibers.len(),
                "render requested mid-cycle; abandoning in-flight fiber tree"
            );
            self.release_abandoned();
        }
        self.fibers.clear();

        let tag = self.adapter.tag_name(container);
        let root = self.fibers.insert_root(tag, element, container);
        self.wip_root = Some(root);
        self.next_unit_of_work = Some(root);
    }

    /// Release every node materialized by the current fiber arena. The root
    /// fiber's node is the container and stays.
    fn release_abandoned(&mut self) {
        let abandoned: Vec<A::Node> = self
            .fibers
            .iter()
            .filter(|(_, fiber)| fiber.parent.is_some())
            .filter_map(|(_, fiber)| fiber.display())
            .collect();
        for node in abandoned {
            self.adapter.release(node);
        }
    }

    /// The root fiber of the cycle in flight, if any.
    pub fn wip_root(&self) -> Option<FiberId> {
        self.wip_root
    }

    /// The fiber the next unit of work will process.
    pub fn next_unit_of_work(&self) -> Option<FiberId> {
        self.next_unit_of_work
    }

    /// Whether render-phase work remains.
    pub fn has_pending_work(&self) -> bool {
        self.next_unit_of_work.is_some()
    }

    /// Whether no cycle is in flight (nothing to render, nothing to commit).
    pub fn is_idle(&self) -> bool {
        self.wip_root.is_none()
    }

    /// Number of cycles committed so far.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// The fiber arena of the cycle in flight.
    pub fn fibers(&self) -> &FiberTree<A::Node> {
        &self.fibers
    }

    /// The scheduling config.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Borrow the display adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutably borrow the display adapter.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Consume the reconciler and return its adapter.
    pub fn into_adapter(self) -> A {
        self.adapter
    }
}
