//! Mediator configuration.
//!
//! Defines how the mediator treats the sender during broadcast, what happens
//! when an address is registered twice, and how deep handlers may nest
//! `send` calls.

/// Default bound on nested `route` calls per thread.
pub const DEFAULT_MAX_DELIVERY_DEPTH: usize = 8;

/// Whether a broadcast is delivered back to its sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenderPolicy {
    /// Every registered participant except the sender receives the message.
    #[default]
    ExcludeSender,

    /// The sender receives its own broadcast as well.
    IncludeSender,
}

/// What `register` does when the address is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateAddress` and leave the registry unchanged.
    #[default]
    Reject,

    /// Detach the existing participant and register the new one in its place.
    Replace,
}

/// Mediator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediatorConfig {
    sender_policy: SenderPolicy,
    duplicate_policy: DuplicatePolicy,
    max_delivery_depth: usize,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            sender_policy: SenderPolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
            max_delivery_depth: DEFAULT_MAX_DELIVERY_DEPTH,
        }
    }
}

impl MediatorConfig {
    /// Broadcast sender handling.
    pub fn sender_policy(&self) -> SenderPolicy {
        self.sender_policy
    }

    /// Duplicate address handling.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// Maximum nested `route` calls into one mediator on one thread. Never
    /// below 1.
    pub fn max_delivery_depth(&self) -> usize {
        self.max_delivery_depth.max(1)
    }

    /// Set the broadcast sender policy.
    #[must_use]
    pub fn with_sender_policy(mut self, policy: SenderPolicy) -> Self {
        self.sender_policy = policy;
        self
    }

    /// Set the duplicate registration policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the nesting limit. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_delivery_depth(mut self, depth: usize) -> Self {
        self.max_delivery_depth = depth.max(1);
        self
    }
}
