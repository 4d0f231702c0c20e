//! Commit phase: attach every materialized node in one uninterrupted pass.

use tracing::debug;

use crate::display::DisplayAdapter;
use crate::fiber::FiberId;

use super::Reconciler;

impl<A: DisplayAdapter> Reconciler<A> {
    /// Attach the finished work tree to the live display tree and end the
    /// cycle.
    ///
    /// The container's previous children are cleared first, since each cycle
    /// rebuilds the whole subtree. The synthetic root itself is never
    /// attached. Does nothing while render-phase work is still pending or
    /// when no cycle is in flight. Returns the number of nodes attached.
    pub fn commit_root(&mut self) -> usize {
        if self.next_unit_of_work.is_some() {
            return 0;
        }
        let Some(root) = self.wip_root else {
            return 0;
        };

        let (container, first) = match self.fibers.get(root) {
            Some(fiber) => (fiber.display(), fiber.child),
            None => (None, None),
        };
        if let Some(container) = container {
            self.adapter.clear_children(container);
        }
        let attached = self.commit_work(first);

        self.wip_root = None;
        self.fibers.clear();
        self.commits += 1;
        debug!(attached, commits = self.commits, "committed render cycle");
        attached
    }

    /// Depth-first attach starting at `start`: each fiber, then its child
    /// subtree, then its next sibling.
    fn commit_work(&mut self, start: Option<FiberId>) -> usize {
        let mut attached = 0;
        let mut stack: Vec<FiberId> = start.into_iter().collect();

        while let Some(id) = stack.pop() {
            let Some(fiber) = self.fibers.get(id) else {
                continue;
            };
            let parent_node = fiber
                .parent
                .and_then(|p| self.fibers.get(p))
                .and_then(|p| p.display());
            if let (Some(parent_node), Some(node)) = (parent_node, fiber.display()) {
                self.adapter.append_child(parent_node, node);
                attached += 1;
            }

            // Sibling goes under the child so the child subtree is finished first.
            if let Some(sibling) = fiber.sibling {
                stack.push(sibling);
            }
            if let Some(child) = fiber.child {
                stack.push(child);
            }
        }
        attached
    }
}

#[cfg(test)]
mod tests {
    use crate::display::{DisplayAdapter, DisplayOp, MemoryDisplay};
    use crate::element::Element;
    use crate::reconciler::Reconciler;
    use crate::scheduler::UnitDeadline;
    use pretty_assertions::assert_eq;

    #[test]
    fn commit_is_noop_while_work_pending() {
        let mut display = MemoryDisplay::new();
        let container = display.create_element("main");
        let mut rec = Reconciler::new(display);
        rec.render(Element::host("div").child("x").build(), container);
        rec.work_loop(&UnitDeadline::new(1));
        assert_eq!(rec.commit_root(), 0);
        assert!(!rec.is_idle());
    }

    #[test]
    fn commit_is_noop_without_cycle() {
        let mut rec = Reconciler::new(MemoryDisplay::new());
        assert_eq!(rec.commit_root(), 0);
        assert_eq!(rec.commits(), 0);
    }

    #[test]
    fn commit_attaches_in_preorder() {
        let mut display = MemoryDisplay::recording();
        let container = display.create_element("main");
        let mut rec = Reconciler::new(display);
        rec.render(
            Element::host("div")
                .child(Element::host("span").child("a"))
                .child("b")
                .build(),
            container,
        );
        rec.flush();

        let appends: Vec<_> = rec
            .adapter()
            .log()
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Append { child, .. } => Some(rec.adapter().to_markup(*child)),
                _ => None,
            })
            .collect();
        assert_eq!(
            appends,
            vec!["<div><span>a</span>b</div>", "<span>a</span>", "a", "b"]
        );
        assert!(rec.fibers().is_empty());
    }
}
