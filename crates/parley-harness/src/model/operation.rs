//! Operations for model-based testing.
//!
//! Operations represent everything an embedder can do with a mediator. They
//! are generated randomly (proptest, `arbitrary`, or a seeded RNG) and applied
//! to both the model and the real implementation.

use arbitrary::Arbitrary;

/// Participant identifier (0-indexed). Doubles as the participant's address.
pub type ParticipantId = u8;

/// Operations that can be applied to the system.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Register a participant under its own id.
    Register {
        /// Participant to register.
        participant: ParticipantId,
    },

    /// Unregister the participant with this id.
    Unregister {
        /// Participant to remove.
        participant: ParticipantId,
    },

    /// Participant sends through its endpoint.
    Send {
        /// Sending participant.
        from: ParticipantId,
        /// Addressed recipient, broadcast when `None`.
        to: Option<ParticipantId>,
        /// Message content.
        content: SmallMessage,
    },

    /// Embedder calls `route` directly, possibly with an unknown sender.
    Route {
        /// Claimed sender address.
        from: ParticipantId,
        /// Addressed recipient, broadcast when `None`.
        to: Option<ParticipantId>,
        /// Message content.
        content: SmallMessage,
    },
}

impl Operation {
    /// Map every id into `0..=num_participants`.
    ///
    /// The id `num_participants` names no participant, so unknown senders and
    /// recipients stay reachable.
    #[must_use]
    pub fn clamp(self, num_participants: usize) -> Self {
        let modulus = u8::try_from(num_participants + 1).unwrap_or(u8::MAX);
        let c = |id: ParticipantId| id % modulus;
        match self {
            Self::Register { participant } => Self::Register { participant: c(participant) },
            Self::Unregister { participant } => Self::Unregister { participant: c(participant) },
            Self::Send { from, to, content } => Self::Send { from: c(from), to: to.map(c), content },
            Self::Route { from, to, content } => {
                Self::Route { from: c(from), to: to.map(c), content }
            },
        }
    }
}

/// Small message content for testing.
#[derive(Debug, Clone, Arbitrary)]
pub struct SmallMessage {
    /// Message seed (expanded to content).
    pub seed: u8,
    /// Message length hint (0-3 maps to empty/small/medium/large).
    pub size_class: u8,
}

impl SmallMessage {
    /// Expand to actual message bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len: u8 = match self.size_class % 4 {
            0 => 0,
            1 => 4,
            2 => 16,
            _ => 64,
        };

        (0..len).map(|i| self.seed.wrapping_add(i)).collect()
    }
}

/// Result of applying an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Address already registered.
    DuplicateAddress,

    /// Route from an address that is not registered.
    UnknownSender,

    /// Addressed delivery to an address that is not registered.
    UnknownRecipient,

    /// Send from a participant that is not active.
    NotRegistered,

    /// Unregister of an address that is not registered.
    NotFound,

    /// Participant id does not exist in this world.
    InvalidParticipant,

    /// Any router error the model does not produce.
    Unexpected,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}
