//! Cooperative work queue.
//!
//! Work items run from the main loop, once per scheduling pass, in priority
//! order. An item that returns `false` is dropped after that pass.

use alloc::vec::Vec;

/// Work priorities, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkPriority {
    Redisplay,
    Paint,
    Layout,
}

/// A work procedure over context `C`. Returns whether to keep the item.
pub type WorkFn<C> = fn(&mut C) -> bool;

struct Work<C> {
    priority: WorkPriority,
    f: WorkFn<C>,
}

pub struct WorkQueue<C> {
    items: Vec<Work<C>>,
}

impl<C> WorkQueue<C> {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Queue `f` behind all items of the same or higher priority.
    pub fn add(&mut self, f: WorkFn<C>, priority: WorkPriority) {
        let at = self
            .items
            .iter()
            .position(|w| w.priority > priority)
            .unwrap_or(self.items.len());
        self.items.insert(at, Work { priority, f });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Run every item once. Returns how many ran.
    pub fn run(&mut self, ctx: &mut C) -> usize {
        let ran = self.items.len();
        self.items.retain(|w| {
            let keep = (w.f)(ctx);
            if !keep {
                log::debug!("[WORK] {:?} item finished", w.priority);
            }
            keep
        });
        ran
    }
}

impl<C> Default for WorkQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
