//! Per-thread bound on nested routing.
//!
//! A handler that sends from inside `receive` re-enters the router on the same
//! thread. The guard counts those nested calls so a ping-pong between two
//! handlers fails instead of recursing until the stack overflows.
//!
//! Counts are kept per mediator: a handler that bridges into another mediator
//! starts that mediator at depth zero.

use std::{cell::RefCell, collections::HashMap};

thread_local! {
    static DELIVERY_DEPTH: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
}

/// Held for the duration of one `route` call.
#[derive(Debug)]
pub(crate) struct DepthGuard {
    key: usize,
}

impl DepthGuard {
    /// Enter one more routing level for the mediator identified by `key`, or
    /// `None` if `limit` levels are already active for it.
    pub(crate) fn enter(key: usize, limit: usize) -> Option<Self> {
        DELIVERY_DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            let depth = depths.entry(key).or_insert(0);
            if *depth >= limit {
                return None;
            }
            *depth += 1;
            Some(Self { key })
        })
    }

    /// Routing levels active on this thread for `key`.
    pub(crate) fn current(key: usize) -> usize {
        DELIVERY_DEPTH.with(|depths| depths.borrow().get(&key).copied().unwrap_or(0))
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DELIVERY_DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            if let Some(depth) = depths.get_mut(&self.key) {
                *depth = depth.saturating_sub(1);
                if *depth == 0 {
                    depths.remove(&self.key);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_counts_and_releases() {
        assert_eq!(DepthGuard::current(1), 0);
        let outer = DepthGuard::enter(1, 2);
        assert!(outer.is_some());
        let inner = DepthGuard::enter(1, 2);
        assert!(inner.is_some());
        assert_eq!(DepthGuard::current(1), 2);

        assert!(DepthGuard::enter(1, 2).is_none());

        drop(inner);
        drop(outer);
        assert_eq!(DepthGuard::current(1), 0);
    }

    #[test]
    fn keys_are_counted_separately() {
        let first = DepthGuard::enter(1, 1);
        assert!(first.is_some());
        assert!(DepthGuard::enter(1, 1).is_none());

        let second = DepthGuard::enter(2, 1);
        assert!(second.is_some());
        assert_eq!(DepthGuard::current(2), 1);

        drop(second);
        drop(first);
        assert_eq!(DepthGuard::current(1), 0);
        assert_eq!(DepthGuard::current(2), 0);
    }
}
