//! Router error types.

use thiserror::Error;

/// Errors a participant reports from [`Participant::receive`].
///
/// [`Participant::receive`]: crate::Participant::receive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// The participant refused the message.
    #[error("message rejected: {reason}")]
    Rejected {
        /// Why the participant refused it.
        reason: String,
    },

    /// The participant's queue is at capacity.
    #[error("mailbox full")]
    Full,

    /// The consuming side of the participant's queue is gone.
    #[error("mailbox closed")]
    Closed,
}

impl ReceiveError {
    /// Shorthand for [`ReceiveError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected { reason: reason.into() }
    }
}

/// A single recipient that failed during a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure<A> {
    /// Address of the recipient.
    pub recipient: A,
    /// What the recipient reported.
    pub error: ReceiveError,
}

/// Errors from [`Mediator`] and [`Endpoint`] operations.
///
/// [`Mediator`]: crate::Mediator
/// [`Endpoint`]: crate::Endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError<A> {
    /// Another participant is already registered under this address.
    #[error("address already registered: {0:?}")]
    DuplicateAddress(A),

    /// The participant is active in another mediator.
    #[error("participant already attached to a mediator: {0:?}")]
    AlreadyAttached(A),

    /// `route` was called with a sender that is not registered.
    #[error("unknown sender: {0:?}")]
    UnknownSender(A),

    /// Addressed delivery to an address that is not registered.
    #[error("unknown recipient: {0:?}")]
    UnknownRecipient(A),

    /// A participant tried to send while not attached to a mediator.
    #[error("participant not registered: {0:?}")]
    NotRegistered(A),

    /// `unregister` was called for an address that is not registered.
    #[error("address not found: {0:?}")]
    NotFound(A),

    /// Nested routing on this thread reached the configured limit.
    #[error("delivery depth limit reached ({limit})")]
    DeliveryDepthExceeded {
        /// The configured maximum depth.
        limit: usize,
    },

    /// The addressed recipient failed to accept the message.
    #[error("delivery to {recipient:?} failed: {source}")]
    Delivery {
        /// Address of the recipient.
        recipient: A,
        /// What the recipient reported.
        #[source]
        source: ReceiveError,
    },

    /// A broadcast reached every recipient but some of them failed.
    #[error("broadcast partially failed: {delivered} delivered, {} failed", .failures.len())]
    PartialDelivery {
        /// Number of recipients that accepted the message.
        delivered: usize,
        /// Recipients that failed, in delivery order.
        failures: Vec<DeliveryFailure<A>>,
    },
}

impl<A> RouterError<A> {
    /// Returns true if repeating the same call later may succeed.
    ///
    /// Registration races and delivery failures depend on state that can
    /// change; depth violations and attachment conflicts are caller bugs.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UnknownRecipient(_)
            | Self::Delivery { .. }
            | Self::PartialDelivery { .. }
            | Self::NotRegistered(_)
            | Self::UnknownSender(_) => true,

            Self::DuplicateAddress(_)
            | Self::AlreadyAttached(_)
            | Self::NotFound(_)
            | Self::DeliveryDepthExceeded { .. } => false,
        }
    }

    /// Recipients that failed, empty unless this is a delivery error.
    pub fn failed_recipients(&self) -> Vec<&A> {
        match self {
            Self::Delivery { recipient, .. } => vec![recipient],
            Self::PartialDelivery { failures, .. } => failures.iter().map(|f| &f.recipient).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_recipient_is_retryable() {
        let err = RouterError::UnknownRecipient("bob".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn duplicate_address_is_not_retryable() {
        let err = RouterError::DuplicateAddress("bob".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn partial_delivery_display() {
        let err = RouterError::PartialDelivery {
            delivered: 2,
            failures: vec![DeliveryFailure { recipient: 7u32, error: ReceiveError::Closed }],
        };
        assert_eq!(err.to_string(), "broadcast partially failed: 2 delivered, 1 failed");
        assert_eq!(err.failed_recipients(), vec![&7]);
    }

    #[test]
    fn delivery_error_exposes_source() {
        use std::error::Error as _;

        let err = RouterError::Delivery { recipient: 1u8, source: ReceiveError::rejected("busy") };
        assert_eq!(err.source().map(ToString::to_string), Some("message rejected: busy".to_string()));
    }
}
