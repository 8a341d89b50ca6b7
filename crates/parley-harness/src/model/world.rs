//! Model world - the reference mediator.
//!
//! Tracks each participant's lifecycle state and inbox with plain vectors and
//! delivers instantly. It is the oracle against which the real `Mediator` is
//! verified.

use parley_core::ParticipantState;

use super::operation::{Operation, OperationError, OperationResult, ParticipantId};

/// Message as seen by a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMessage {
    /// Sender address.
    pub from: ParticipantId,
    /// Message content.
    pub content: Vec<u8>,
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Registered addresses, sorted.
    pub registered: Vec<ParticipantId>,
    /// Lifecycle state per participant.
    pub states: Vec<ParticipantState>,
    /// Messages received per participant, oldest first.
    pub inboxes: Vec<Vec<ModelMessage>>,
}

#[derive(Debug, Clone)]
struct ModelParticipant {
    state: ParticipantState,
    inbox: Vec<ModelMessage>,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    participants: Vec<ModelParticipant>,
}

impl ModelWorld {
    /// Create a world with `num_participants` unregistered participants.
    pub fn new(num_participants: usize) -> Self {
        let participants = (0..num_participants)
            .map(|_| ModelParticipant { state: ParticipantState::Unregistered, inbox: Vec::new() })
            .collect();
        Self { participants }
    }

    /// Number of participants in the world.
    pub fn num_participants(&self) -> usize {
        self.participants.len()
    }

    /// Check if a participant is currently registered.
    pub fn is_registered(&self, id: ParticipantId) -> bool {
        self.participants
            .get(usize::from(id))
            .is_some_and(|p| p.state == ParticipantState::Active)
    }

    /// Messages received by a participant.
    pub fn inbox(&self, id: ParticipantId) -> Option<&[ModelMessage]> {
        self.participants.get(usize::from(id)).map(|p| p.inbox.as_slice())
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let result = match op {
            Operation::Register { participant } => self.register(*participant),
            Operation::Unregister { participant } => self.unregister(*participant),
            Operation::Send { from, to, content } => {
                if usize::from(*from) >= self.participants.len() {
                    Err(OperationError::InvalidParticipant)
                } else if !self.is_registered(*from) {
                    Err(OperationError::NotRegistered)
                } else {
                    self.route(*from, *to, &content.to_bytes())
                }
            },
            Operation::Route { from, to, content } => self.route(*from, *to, &content.to_bytes()),
        };

        match result {
            Ok(()) => OperationResult::Ok,
            Err(e) => OperationResult::Error(e),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let registered = (0..self.participants.len())
            .filter_map(|i| ParticipantId::try_from(i).ok())
            .filter(|id| self.is_registered(*id))
            .collect();

        ObservableState {
            registered,
            states: self.participants.iter().map(|p| p.state).collect(),
            inboxes: self.participants.iter().map(|p| p.inbox.clone()).collect(),
        }
    }

    fn register(&mut self, id: ParticipantId) -> Result<(), OperationError> {
        let participant =
            self.participants.get_mut(usize::from(id)).ok_or(OperationError::InvalidParticipant)?;
        if participant.state == ParticipantState::Active {
            return Err(OperationError::DuplicateAddress);
        }
        participant.state = ParticipantState::Active;
        Ok(())
    }

    fn unregister(&mut self, id: ParticipantId) -> Result<(), OperationError> {
        let participant =
            self.participants.get_mut(usize::from(id)).ok_or(OperationError::InvalidParticipant)?;
        if participant.state != ParticipantState::Active {
            return Err(OperationError::NotFound);
        }
        participant.state = ParticipantState::Detached;
        Ok(())
    }

    fn route(
        &mut self,
        from: ParticipantId,
        to: Option<ParticipantId>,
        content: &[u8],
    ) -> Result<(), OperationError> {
        if !self.is_registered(from) {
            return Err(OperationError::UnknownSender);
        }

        let message = ModelMessage { from, content: content.to_vec() };
        match to {
            Some(to) => {
                if !self.is_registered(to) {
                    return Err(OperationError::UnknownRecipient);
                }
                self.participants[usize::from(to)].inbox.push(message);
            },
            None => {
                for (i, participant) in self.participants.iter_mut().enumerate() {
                    if participant.state == ParticipantState::Active && i != usize::from(from) {
                        participant.inbox.push(message.clone());
                    }
                }
            },
        }
        Ok(())
    }
}
