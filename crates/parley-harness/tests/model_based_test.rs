//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! mediator behaves identically to the reference model.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelWorld    RealWorld      Compare
//!      (reference)   (Mediator)     Results
//! ```

use parley_harness::{
    ModelWorld, Operation, OperationError, OperationResult, ParticipantId, RealWorld,
    SmallMessage,
};
use proptest::prelude::*;

/// Strategy for generating SmallMessage.
fn small_message_strategy() -> impl Strategy<Value = SmallMessage> {
    (any::<u8>(), any::<u8>()).prop_map(|(seed, size_class)| SmallMessage { seed, size_class })
}

/// Strategy for generating operations over `0..=max_id`.
///
/// `max_id` itself is never a participant, so unknown addresses come up too.
fn operation_strategy(max_id: ParticipantId) -> impl Strategy<Value = Operation> {
    let id = 0..=max_id;
    let target = prop::option::of(0..=max_id);

    prop_oneof![
        3 => id.clone().prop_map(|participant| Operation::Register { participant }),
        1 => id.clone().prop_map(|participant| Operation::Unregister { participant }),
        5 => (id.clone(), target.clone(), small_message_strategy())
            .prop_map(|(from, to, content)| Operation::Send { from, to, content }),
        1 => (id, target, small_message_strategy())
            .prop_map(|(from, to, content)| Operation::Route { from, to, content }),
    ]
}

proptest! {
    /// Results and final state must match between model and real mediator.
    #[test]
    fn prop_model_matches_real(
        num_participants in 2..5usize,
        ops in prop::collection::vec(operation_strategy(5), 0..60)
    ) {
        let mut model = ModelWorld::new(num_participants);
        let real = RealWorld::new(num_participants);

        for (i, op) in ops.iter().enumerate() {
            let op = op.clone().clamp(num_participants);

            let model_result = model.apply(&op);
            let real_result = real.apply(&op);

            prop_assert_eq!(
                &model_result,
                &real_result,
                "Divergence at operation {}: {:?}",
                i, op
            );
        }

        prop_assert_eq!(model.observable_state(), real.observable_state());
    }

    /// The registry never holds an address twice and only holds active
    /// participants.
    #[test]
    fn prop_registry_matches_states(
        ops in prop::collection::vec(operation_strategy(4), 0..80)
    ) {
        let real = RealWorld::new(4);
        for op in &ops {
            let _ = real.apply(&op.clone().clamp(4));
        }

        let state = real.observable_state();
        let mut deduped = state.registered.clone();
        deduped.dedup();
        prop_assert_eq!(&deduped, &state.registered);

        for (id, participant_state) in state.states.iter().enumerate() {
            let registered = state.registered.iter().any(|r| usize::from(*r) == id);
            prop_assert_eq!(
                registered,
                *participant_state == parley_core::ParticipantState::Active,
                "participant {} registry membership disagrees with its state", id
            );
        }
    }

    /// A broadcaster never hears its own broadcast.
    #[test]
    fn prop_broadcast_excludes_sender(
        sender in 0..4u8,
        content in small_message_strategy()
    ) {
        let mut model = ModelWorld::new(4);
        for participant in 0..4 {
            let _ = model.apply(&Operation::Register { participant });
        }

        let result = model.apply(&Operation::Send { from: sender, to: None, content });
        prop_assert!(result.is_ok());

        for id in 0..4u8 {
            let expected = usize::from(id != sender);
            prop_assert_eq!(model.inbox(id).map(<[_]>::len), Some(expected));
        }
    }

    /// Second registration of the same address is always rejected.
    #[test]
    fn prop_duplicate_registration_rejected(participant in 0..4u8) {
        let real = RealWorld::new(4);

        let first = real.apply(&Operation::Register { participant });
        prop_assert!(first.is_ok(), "First register should succeed");

        let second = real.apply(&Operation::Register { participant });
        prop_assert_eq!(second, OperationResult::Error(OperationError::DuplicateAddress));
    }
}

#[cfg(test)]
mod smoke_tests {
    use super::*;

    #[test]
    fn real_world_basic_operations() {
        let real = RealWorld::new(3);
        let content = SmallMessage { seed: 42, size_class: 1 };

        assert!(real.apply(&Operation::Register { participant: 0 }).is_ok());
        assert!(real.apply(&Operation::Register { participant: 1 }).is_ok());

        // Participant 2 never registered
        let result = real.apply(&Operation::Send { from: 2, to: None, content: content.clone() });
        assert_eq!(result, OperationResult::Error(OperationError::NotRegistered));

        // Unknown sender through the embedder API
        let result = real.apply(&Operation::Route { from: 3, to: None, content: content.clone() });
        assert_eq!(result, OperationResult::Error(OperationError::UnknownSender));

        // Unknown recipient
        let result =
            real.apply(&Operation::Send { from: 0, to: Some(2), content: content.clone() });
        assert_eq!(result, OperationResult::Error(OperationError::UnknownRecipient));

        assert!(real.apply(&Operation::Send { from: 0, to: None, content }).is_ok());
        let state = real.observable_state();
        assert_eq!(state.inboxes[1].len(), 1);
        assert!(state.inboxes[0].is_empty());
        assert!(state.inboxes[2].is_empty());
    }
}
