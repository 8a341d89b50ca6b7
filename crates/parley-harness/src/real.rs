//! Real system wrapper that mirrors `ModelWorld`'s interface.
//!
//! Drives a real [`Mediator`] with [`Recorder`] participants and translates
//! router errors into [`OperationError`]s so results can be compared with the
//! model one-to-one.

use std::sync::{Arc, Mutex, PoisonError};

use parley_core::{
    Endpoint, Mediator, MediatorConfig, Participant, ReceiveError, RouterError,
};

use crate::model::{
    ModelMessage, ObservableState, Operation, OperationError, OperationResult, ParticipantId,
};

/// Participant that records every delivery.
#[derive(Debug)]
pub struct Recorder {
    endpoint: Endpoint<ParticipantId, Vec<u8>>,
    inbox: Mutex<Vec<ModelMessage>>,
}

impl Recorder {
    /// Create an unregistered recorder.
    pub fn new(id: ParticipantId) -> Self {
        Self { endpoint: Endpoint::new(id), inbox: Mutex::new(Vec::new()) }
    }

    /// Messages received so far.
    pub fn inbox(&self) -> Vec<ModelMessage> {
        self.inbox.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Participant<ParticipantId, Vec<u8>> for Recorder {
    fn endpoint(&self) -> &Endpoint<ParticipantId, Vec<u8>> {
        &self.endpoint
    }

    fn receive(&self, message: &Vec<u8>, from: &ParticipantId) -> Result<(), ReceiveError> {
        self.inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ModelMessage { from: *from, content: message.clone() });
        Ok(())
    }
}

/// A real mediator plus one recorder per participant id.
#[derive(Debug)]
pub struct RealWorld {
    mediator: Mediator<ParticipantId, Vec<u8>>,
    participants: Vec<Arc<Recorder>>,
}

impl RealWorld {
    /// Create a world with the default mediator configuration.
    pub fn new(num_participants: usize) -> Self {
        Self::with_config(num_participants, MediatorConfig::default())
    }

    /// Create a world with a custom mediator configuration.
    pub fn with_config(num_participants: usize, config: MediatorConfig) -> Self {
        let participants = (0..num_participants)
            .filter_map(|i| ParticipantId::try_from(i).ok())
            .map(|id| Arc::new(Recorder::new(id)))
            .collect();
        Self { mediator: Mediator::with_config(config), participants }
    }

    /// The mediator under test.
    pub fn mediator(&self) -> &Mediator<ParticipantId, Vec<u8>> {
        &self.mediator
    }

    /// Apply an operation and return the result.
    pub fn apply(&self, op: &Operation) -> OperationResult {
        let result = match op {
            Operation::Register { participant } => self
                .participant(*participant)
                .and_then(|p| self.mediator.register(p).map_err(to_operation_error)),
            Operation::Unregister { participant } => self.participant(*participant).and_then(|p| {
                self.mediator.unregister(p.address()).map(|_| ()).map_err(to_operation_error)
            }),
            Operation::Send { from, to, content } => self.participant(*from).and_then(|p| {
                p.send(content.to_bytes(), to.as_ref()).map_err(to_operation_error)
            }),
            Operation::Route { from, to, content } => self
                .mediator
                .route(content.to_bytes(), from, to.as_ref())
                .map_err(to_operation_error),
        };

        match result {
            Ok(()) => OperationResult::Ok,
            Err(e) => OperationResult::Error(e),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let mut registered = self.mediator.addresses();
        registered.sort_unstable();

        ObservableState {
            registered,
            states: self.participants.iter().map(|p| p.state()).collect(),
            inboxes: self.participants.iter().map(|p| p.inbox()).collect(),
        }
    }

    fn participant(&self, id: ParticipantId) -> Result<Arc<Recorder>, OperationError> {
        self.participants.get(usize::from(id)).cloned().ok_or(OperationError::InvalidParticipant)
    }
}

fn to_operation_error(err: RouterError<ParticipantId>) -> OperationError {
    match err {
        RouterError::DuplicateAddress(_) => OperationError::DuplicateAddress,
        RouterError::UnknownSender(_) => OperationError::UnknownSender,
        RouterError::UnknownRecipient(_) => OperationError::UnknownRecipient,
        RouterError::NotRegistered(_) => OperationError::NotRegistered,
        RouterError::NotFound(_) => OperationError::NotFound,
        RouterError::AlreadyAttached(_)
        | RouterError::DeliveryDepthExceeded { .. }
        | RouterError::Delivery { .. }
        | RouterError::PartialDelivery { .. } => OperationError::Unexpected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SmallMessage;

    #[test]
    fn real_world_round_trip() {
        let world = RealWorld::new(2);
        assert!(world.apply(&Operation::Register { participant: 0 }).is_ok());
        assert!(world.apply(&Operation::Register { participant: 1 }).is_ok());

        let content = SmallMessage { seed: 1, size_class: 1 };
        assert!(world.apply(&Operation::Send { from: 0, to: Some(1), content }).is_ok());

        let state = world.observable_state();
        assert_eq!(state.registered, vec![0, 1]);
        assert_eq!(state.inboxes[1], vec![ModelMessage { from: 0, content: vec![1, 2, 3, 4] }]);
        assert!(state.inboxes[0].is_empty());
    }
}
