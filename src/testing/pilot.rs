//! Pilot: step-by-step driving of a headless reconciler.
//!
//! The `Pilot` owns a [`Reconciler`] over a [`MemoryDisplay`] with a mounted
//! container node, and exposes slice-level controls plus markup inspection.

use crate::config::{ConfigError, RuntimeConfig};
use crate::display::{DisplayAdapter, DisplayNodeId, MemoryDisplay};
use crate::element::Element;
use crate::reconciler::{Reconciler, SliceReport};
use crate::scheduler::{Deadline, UnitDeadline};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless reconciler driver for tests.
///
/// # Examples
///
/// ```
/// use tidact::element::Element;
/// use tidact::testing::Pilot;
///
/// let mut pilot = Pilot::new("main");
/// pilot.render(Element::host("div").child("hi").build());
/// pilot.flush();
/// assert_eq!(pilot.markup(), "<div>hi</div>");
/// ```
pub struct Pilot {
    reconciler: Reconciler<MemoryDisplay>,
    container: DisplayNodeId,
    slices: usize,
}

impl Pilot {
    /// Create a pilot whose mount point is an empty `container_tag` node.
    pub fn new(container_tag: &str) -> Self {
        let (display, container) = Self::mount(container_tag);
        Self::from_parts(Reconciler::new(display), container)
    }

    /// Create a pilot with an explicit config.
    pub fn with_config(container_tag: &str, config: RuntimeConfig) -> Result<Self, ConfigError> {
        let (display, container) = Self::mount(container_tag);
        Ok(Self::from_parts(
            Reconciler::with_config(display, config)?,
            container,
        ))
    }

    fn mount(container_tag: &str) -> (MemoryDisplay, DisplayNodeId) {
        let mut display = MemoryDisplay::new();
        let container = display.create_element(container_tag);
        (display, container)
    }

    fn from_parts(reconciler: Reconciler<MemoryDisplay>, container: DisplayNodeId) -> Self {
        Self {
            reconciler,
            container,
            slices: 0,
        }
    }

    // ── Driving ──────────────────────────────────────────────────────

    /// Request a render into the pilot's container.
    pub fn render(&mut self, element: Element) {
        self.reconciler.render(element, self.container);
    }

    /// Run one slice that grants budget for a single unit of work.
    pub fn step(&mut self) -> SliceReport {
        self.step_units(1)
    }

    /// Run one slice that grants budget for `units` units of work.
    pub fn step_units(&mut self, units: usize) -> SliceReport {
        self.slice(&UnitDeadline::new(units))
    }

    /// Run one slice against an arbitrary deadline.
    pub fn slice(&mut self, deadline: &dyn Deadline) -> SliceReport {
        self.slices += 1;
        self.reconciler.work_loop(deadline)
    }

    /// Drain everything pending in one unbounded slice.
    pub fn flush(&mut self) -> SliceReport {
        self.slices += 1;
        self.reconciler.flush()
    }

    /// Step one unit at a time until the cycle commits. Returns the number of
    /// slices it took; zero if nothing was pending.
    pub fn step_until_committed(&mut self) -> usize {
        let mut taken = 0;
        while !self.reconciler.is_idle() {
            taken += 1;
            if self.step().committed {
                break;
            }
        }
        taken
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Markup of the container's children.
    pub fn markup(&self) -> String {
        self.display().inner_markup(self.container)
    }

    /// The mount point.
    pub fn container(&self) -> DisplayNodeId {
        self.container
    }

    /// Total slices run through this pilot.
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Whether the live tree has been mutated since the pilot was created.
    pub fn has_attachments(&self) -> bool {
        self.display().attachments() > 0
    }

    /// Borrow the display tree.
    pub fn display(&self) -> &MemoryDisplay {
        self.reconciler.adapter()
    }

    /// Mutably borrow the display tree.
    pub fn display_mut(&mut self) -> &mut MemoryDisplay {
        self.reconciler.adapter_mut()
    }

    /// Borrow the reconciler.
    pub fn reconciler(&self) -> &Reconciler<MemoryDisplay> {
        &self.reconciler
    }

    /// Mutably borrow the reconciler.
    pub fn reconciler_mut(&mut self) -> &mut Reconciler<MemoryDisplay> {
        &mut self.reconciler
    }
}
