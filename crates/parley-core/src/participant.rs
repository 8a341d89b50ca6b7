//! Participants and their link back to a mediator.
//!
//! A participant is anything implementing [`Participant`]. It owns an
//! [`Endpoint`], which carries the participant's immutable address and a weak
//! back-reference to the mediator it is registered with. The mediator owns
//! registry entries, never the participant's lifetime, and the endpoint never
//! keeps the mediator alive.
//!
//! # States
//!
//! ```text
//! Unregistered ──register──▶ Active ──unregister──▶ Detached
//!                              ▲                       │
//!                              └───────register────────┘
//! ```
//!
//! `send` is only valid while `Active`. An endpoint whose mediator has been
//! dropped reports `Detached`.

use std::{
    fmt,
    hash::Hash,
    sync::{Arc, PoisonError, RwLock, Weak},
};

use crate::{
    error::{ReceiveError, RouterError},
    mediator::{Mediator, Shared},
};

/// Identifier of a participant within one mediator.
///
/// Implemented for every type with equality and stable hashing, e.g.
/// `String` or integer ids.
pub trait Address: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> Address for T where T: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

/// Opaque message payload. The router never inspects it.
pub trait Message: Send + Sync + 'static {}

impl<T> Message for T where T: Send + Sync + 'static {}

/// Lifecycle state of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantState {
    /// Never registered.
    Unregistered,
    /// Registered with a live mediator.
    Active,
    /// Removed from its mediator, or the mediator is gone.
    Detached,
}

/// Back-reference held by an endpoint.
enum Link<A, M> {
    Unregistered,
    Active(Weak<Shared<A, M>>),
    Detached,
}

/// The participant-side half of a registration.
pub struct Endpoint<A, M> {
    address: A,
    link: RwLock<Link<A, M>>,
}

impl<A, M> Endpoint<A, M> {
    /// Create an unregistered endpoint.
    pub fn new(address: A) -> Self {
        Self { address, link: RwLock::new(Link::Unregistered) }
    }

    /// The address this endpoint was created with.
    pub fn address(&self) -> &A {
        &self.address
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ParticipantState {
        match &*self.link.read().unwrap_or_else(PoisonError::into_inner) {
            Link::Unregistered => ParticipantState::Unregistered,
            Link::Active(shared) if shared.strong_count() > 0 => ParticipantState::Active,
            Link::Active(_) | Link::Detached => ParticipantState::Detached,
        }
    }

    /// The mediator this endpoint is registered with, if it is still alive.
    pub fn mediator(&self) -> Option<Mediator<A, M>> {
        match &*self.link.read().unwrap_or_else(PoisonError::into_inner) {
            Link::Active(shared) => shared.upgrade().map(Mediator::from_shared),
            Link::Unregistered | Link::Detached => None,
        }
    }

    /// Link this endpoint to a mediator.
    ///
    /// Returns false if it is already active in a live mediator.
    pub(crate) fn attach(&self, shared: Weak<Shared<A, M>>) -> bool {
        let mut link = self.link.write().unwrap_or_else(PoisonError::into_inner);
        if let Link::Active(current) = &*link {
            if current.strong_count() > 0 {
                return false;
            }
        }
        *link = Link::Active(shared);
        true
    }

    pub(crate) fn detach(&self) {
        *self.link.write().unwrap_or_else(PoisonError::into_inner) = Link::Detached;
    }
}

impl<A: Address, M: Message> Endpoint<A, M> {
    /// Send through the owning mediator with this endpoint as sender.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::NotRegistered` unless the endpoint is active, and
    /// otherwise whatever [`Mediator::route`] returns.
    pub fn send(&self, message: M, to: Option<&A>) -> Result<(), RouterError<A>> {
        // Resolve first so the link lock is released before routing.
        let mediator =
            self.mediator().ok_or_else(|| RouterError::NotRegistered(self.address.clone()))?;
        mediator.route(message, &self.address, to)
    }
}

impl<A: fmt::Debug, M> fmt::Debug for Endpoint<A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("address", &self.address)
            .field("state", &self.state())
            .finish()
    }
}

/// An addressable endpoint that can send and receive through a mediator.
///
/// Implementors supply the endpoint and the `receive` hook; `send`, `address`
/// and `state` come for free.
///
/// `receive` runs synchronously on the sender's thread with no router lock
/// held. It may call `send`, but nested routing is bounded by
/// [`MediatorConfig::max_delivery_depth`](crate::MediatorConfig).
pub trait Participant<A, M>: Send + Sync {
    /// The endpoint carrying this participant's address and mediator link.
    fn endpoint(&self) -> &Endpoint<A, M>;

    /// Handle a message routed to this participant.
    fn receive(&self, message: &M, from: &A) -> Result<(), ReceiveError>;

    /// This participant's address.
    fn address<'a>(&'a self) -> &'a A
    where
        A: 'a,
        M: 'a,
    {
        self.endpoint().address()
    }

    /// Current lifecycle state.
    fn state<'a>(&'a self) -> ParticipantState
    where
        A: 'a,
        M: 'a,
    {
        self.endpoint().state()
    }

    /// Send a message, addressed when `to` is given and broadcast otherwise.
    fn send(&self, message: M, to: Option<&A>) -> Result<(), RouterError<A>>
    where
        A: Address,
        M: Message,
    {
        self.endpoint().send(message, to)
    }
}

/// Returns true if both handles point at the same participant.
pub(crate) fn same_participant<A, M>(
    a: &Arc<dyn Participant<A, M>>,
    b: &Arc<dyn Participant<A, M>>,
) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
