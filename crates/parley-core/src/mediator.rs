//! Mediator
//!
//! Owns the participant registry and routes messages between participants.
//!
//! ## Responsibilities
//!
//! - Registration: Unique addresses, back-reference set on every entry
//! - Addressed delivery: Exactly one `receive` on the named recipient
//! - Broadcast: One `receive` per registered participant (sender excluded by
//!   default), over a snapshot taken at the start of the call
//!
//! ## Design
//!
//! - The registry lock is never held while participant code runs, so handlers
//!   may send, register or unregister from inside `receive`
//! - Broadcast order is registration order
//! - Per-recipient failures are collected, never short-circuit a broadcast

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak},
};

use crate::{
    config::{DuplicatePolicy, MediatorConfig, SenderPolicy},
    depth::DepthGuard,
    error::{DeliveryFailure, RouterError},
    participant::{Address, Message, Participant, same_participant},
};

/// A registry entry.
struct Entry<A, M> {
    /// Registration order, used to order broadcasts.
    seq: u64,
    participant: Arc<dyn Participant<A, M>>,
}

struct Registry<A, M> {
    entries: HashMap<A, Entry<A, M>>,
    next_seq: u64,
}

/// State shared between mediator handles and weakly referenced by endpoints.
pub(crate) struct Shared<A, M> {
    registry: RwLock<Registry<A, M>>,
    config: MediatorConfig,
}

/// Routing hub decoupling participants from one another.
///
/// Cloning is cheap and yields another handle to the same registry.
pub struct Mediator<A, M> {
    shared: Arc<Shared<A, M>>,
}

impl<A, M> Mediator<A, M> {
    /// Create a mediator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MediatorConfig::default())
    }

    /// Create a mediator with the given configuration.
    pub fn with_config(config: MediatorConfig) -> Self {
        let registry = Registry { entries: HashMap::new(), next_seq: 0 };
        Self { shared: Arc::new(Shared { registry: RwLock::new(registry), config }) }
    }

    pub(crate) fn from_shared(shared: Arc<Shared<A, M>>) -> Self {
        Self { shared }
    }

    pub(crate) fn downgrade(&self) -> Weak<Shared<A, M>> {
        Arc::downgrade(&self.shared)
    }

    /// The configuration this mediator was built with.
    pub fn config(&self) -> &MediatorConfig {
        &self.shared.config
    }

    /// Returns true if both handles refer to the same mediator.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Returns true if nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Identifies this mediator's nesting count.
    fn depth_key(&self) -> usize {
        Arc::as_ptr(&self.shared).addr()
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry<A, M>> {
        self.shared.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry<A, M>> {
        self.shared.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Address, M: Message> Mediator<A, M> {
    /// Check if an address is registered.
    pub fn contains(&self, address: &A) -> bool {
        self.read().entries.contains_key(address)
    }

    /// Registered addresses in registration order.
    pub fn addresses(&self) -> Vec<A> {
        let registry = self.read();
        let mut entries: Vec<_> = registry.entries.iter().map(|(a, e)| (e.seq, a)).collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, a)| a.clone()).collect()
    }

    /// The participant registered under `address`.
    pub fn participant(&self, address: &A) -> Option<Arc<dyn Participant<A, M>>> {
        self.read().entries.get(address).map(|e| Arc::clone(&e.participant))
    }

    /// Register a participant under its own address.
    ///
    /// On success the participant becomes `Active` and its endpoint points
    /// back at this mediator. On failure the registry is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::DuplicateAddress` if the address is taken and
    /// the duplicate policy is `Reject`.
    /// Returns `RouterError::AlreadyAttached` if the participant is active in
    /// another mediator.
    pub fn register(&self, participant: Arc<dyn Participant<A, M>>) -> Result<(), RouterError<A>> {
        let address = participant.address().clone();
        let mut registry = self.write();

        if let Some(existing) = registry.entries.get(&address) {
            match self.shared.config.duplicate_policy() {
                DuplicatePolicy::Reject => return Err(RouterError::DuplicateAddress(address)),
                DuplicatePolicy::Replace if same_participant(&existing.participant, &participant) => {
                    return Ok(());
                },
                DuplicatePolicy::Replace => {},
            }
        }

        if !participant.endpoint().attach(self.downgrade()) {
            return Err(RouterError::AlreadyAttached(address));
        }

        let seq = registry.next_seq;
        registry.next_seq += 1;

        let previous = registry.entries.insert(address.clone(), Entry { seq, participant });
        if let Some(previous) = previous {
            previous.participant.endpoint().detach();
            tracing::debug!(address = ?address, "replaced registered participant");
        } else {
            tracing::debug!(address = ?address, "registered participant");
        }

        Ok(())
    }

    /// Remove a participant and move it to `Detached`.
    ///
    /// The participant itself is returned, not destroyed.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::NotFound` if the address is not registered.
    pub fn unregister(&self, address: &A) -> Result<Arc<dyn Participant<A, M>>, RouterError<A>> {
        let mut registry = self.write();
        let entry =
            registry.entries.remove(address).ok_or_else(|| RouterError::NotFound(address.clone()))?;
        entry.participant.endpoint().detach();
        drop(registry);

        tracing::debug!(address = ?address, "unregistered participant");
        Ok(entry.participant)
    }

    /// Route a message from `from` to `to`, or to everyone when `to` is
    /// `None`.
    ///
    /// Delivery is synchronous: every recipient's `receive` has returned
    /// when this does.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::DeliveryDepthExceeded` if called from too many
    /// nested handlers on this thread.
    /// Returns `RouterError::UnknownSender` if `from` is not registered.
    /// Returns `RouterError::UnknownRecipient` if `to` is not registered.
    /// Returns `RouterError::Delivery` if the addressed recipient fails.
    /// Returns `RouterError::PartialDelivery` if any broadcast recipient
    /// fails; all other recipients still receive the message.
    pub fn route(&self, message: M, from: &A, to: Option<&A>) -> Result<(), RouterError<A>> {
        let limit = self.shared.config.max_delivery_depth();
        let Some(_guard) = DepthGuard::enter(self.depth_key(), limit) else {
            tracing::warn!(from = ?from, limit, "delivery depth exceeded");
            return Err(RouterError::DeliveryDepthExceeded { limit });
        };

        match to {
            Some(to) => self.deliver_to(&message, from, to),
            None => self.broadcast(&message, from),
        }
    }

    fn deliver_to(&self, message: &M, from: &A, to: &A) -> Result<(), RouterError<A>> {
        let recipient = {
            let registry = self.read();
            if !registry.entries.contains_key(from) {
                return Err(RouterError::UnknownSender(from.clone()));
            }
            registry
                .entries
                .get(to)
                .map(|e| Arc::clone(&e.participant))
                .ok_or_else(|| RouterError::UnknownRecipient(to.clone()))?
        };

        tracing::debug!(
            from = ?from,
            to = ?to,
            depth = DepthGuard::current(self.depth_key()),
            "addressed delivery"
        );

        recipient.receive(message, from).map_err(|source| {
            tracing::warn!(from = ?from, to = ?to, error = %source, "delivery failed");
            RouterError::Delivery { recipient: to.clone(), source }
        })
    }

    fn broadcast(&self, message: &M, from: &A) -> Result<(), RouterError<A>> {
        let recipients = self.snapshot(from)?;

        tracing::debug!(
            from = ?from,
            recipients = recipients.len(),
            depth = DepthGuard::current(self.depth_key()),
            "broadcast"
        );

        let mut delivered = 0;
        let mut failures = Vec::new();
        for recipient in recipients {
            match recipient.receive(message, from) {
                Ok(()) => delivered += 1,
                Err(error) => {
                    tracing::warn!(
                        from = ?from,
                        to = ?recipient.address(),
                        error = %error,
                        "broadcast delivery failed"
                    );
                    failures.push(DeliveryFailure { recipient: recipient.address().clone(), error });
                },
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RouterError::PartialDelivery { delivered, failures })
        }
    }

    /// Broadcast recipients for `from`, in registration order.
    fn snapshot(&self, from: &A) -> Result<Vec<Arc<dyn Participant<A, M>>>, RouterError<A>> {
        let registry = self.read();
        if !registry.entries.contains_key(from) {
            return Err(RouterError::UnknownSender(from.clone()));
        }

        let include_sender = self.shared.config.sender_policy() == SenderPolicy::IncludeSender;
        let mut entries: Vec<_> = registry
            .entries
            .iter()
            .filter(|(address, _)| include_sender || *address != from)
            .map(|(_, e)| (e.seq, Arc::clone(&e.participant)))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);

        Ok(entries.into_iter().map(|(_, p)| p).collect())
    }
}

impl<A, M> Clone for Mediator<A, M> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<A, M> Default for Mediator<A, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, M> fmt::Debug for Mediator<A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("participant_count", &self.len())
            .field("config", &self.shared.config)
            .finish()
    }
}
