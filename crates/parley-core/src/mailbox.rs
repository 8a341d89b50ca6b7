//! Queue-backed participant.
//!
//! A `Mailbox` accepts deliveries by pushing an [`Envelope`] onto a tokio
//! channel and returns immediately. The consumer drains the channel on its own
//! task, so a slow consumer never stalls the sender and a handler that replies
//! does so outside the original `route` call.
//!
//! Bounded mailboxes push back with [`ReceiveError::Full`]; a dropped receiver
//! yields [`ReceiveError::Closed`]. Either only fails that one recipient.

use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{
    error::ReceiveError,
    participant::{Address, Endpoint, Message, Participant},
};

/// A message queued for a mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<A, M> {
    /// Sender address.
    pub from: A,
    /// The message.
    pub message: M,
}

enum Outbox<A, M> {
    Bounded(mpsc::Sender<Envelope<A, M>>),
    Unbounded(mpsc::UnboundedSender<Envelope<A, M>>),
}

/// Participant that forwards deliveries to a channel.
pub struct Mailbox<A, M> {
    endpoint: Endpoint<A, M>,
    outbox: Outbox<A, M>,
}

impl<A, M> Mailbox<A, M> {
    /// Mailbox holding at most `capacity` undelivered envelopes.
    ///
    /// A capacity of zero is treated as one.
    pub fn bounded(address: A, capacity: usize) -> (Self, mpsc::Receiver<Envelope<A, M>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { endpoint: Endpoint::new(address), outbox: Outbox::Bounded(tx) }, rx)
    }

    /// Mailbox without a capacity limit.
    pub fn unbounded(address: A) -> (Self, mpsc::UnboundedReceiver<Envelope<A, M>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { endpoint: Endpoint::new(address), outbox: Outbox::Unbounded(tx) }, rx)
    }

    /// Returns true once the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        match &self.outbox {
            Outbox::Bounded(tx) => tx.is_closed(),
            Outbox::Unbounded(tx) => tx.is_closed(),
        }
    }
}

impl<A, M> Participant<A, M> for Mailbox<A, M>
where
    A: Address,
    M: Message + Clone,
{
    fn endpoint(&self) -> &Endpoint<A, M> {
        &self.endpoint
    }

    fn receive(&self, message: &M, from: &A) -> Result<(), ReceiveError> {
        let envelope = Envelope { from: from.clone(), message: message.clone() };
        match &self.outbox {
            Outbox::Bounded(tx) => tx.try_send(envelope).map_err(|e| match e {
                TrySendError::Full(_) => ReceiveError::Full,
                TrySendError::Closed(_) => ReceiveError::Closed,
            }),
            Outbox::Unbounded(tx) => tx.send(envelope).map_err(|_| ReceiveError::Closed),
        }
    }
}

impl<A: fmt::Debug, M> fmt::Debug for Mailbox<A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.outbox {
            Outbox::Bounded(_) => "bounded",
            Outbox::Unbounded(_) => "unbounded",
        };
        f.debug_struct("Mailbox").field("endpoint", &self.endpoint).field("kind", &kind).finish()
    }
}
