//! Fuzz target for [`Mediator`] registry and routing
//!
//! Drives the real mediator and the reference model with the same operations
//! and requires them to agree after every step.
//!
//! # Strategy
//!
//! - Operation sequences: register, unregister, participant sends and direct
//!   routes with arbitrary ids
//! - Unknown ids: one id past the world size is never a participant
//! - Re-registration: detached participants join again
//!
//! # Invariants
//!
//! - Every operation returns the same result in model and mediator
//! - Registered addresses are unique and match `Active` participants
//! - Inboxes match message for message, in order
//! - No router error outside the model's alphabet is ever produced

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_core::ParticipantState;
use parley_harness::{ModelWorld, Operation, OperationError, OperationResult, RealWorld};

/// Fuzz input: world size plus an operation sequence.
#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    /// World size hint (1-8 participants).
    participants: u8,
    /// Operations to apply.
    operations: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let num_participants = usize::from(input.participants % 8) + 1;
    let mut model = ModelWorld::new(num_participants);
    let real = RealWorld::new(num_participants);

    for op in input.operations {
        let op = op.clamp(num_participants);

        let model_result = model.apply(&op);
        let real_result = real.apply(&op);

        assert_ne!(
            real_result,
            OperationResult::Error(OperationError::Unexpected),
            "mediator produced an error the model never does: {op:?}"
        );
        assert_eq!(model_result, real_result, "divergence on {op:?}");
    }

    let state = real.observable_state();
    assert_eq!(state, model.observable_state());

    let active = state.states.iter().filter(|s| **s == ParticipantState::Active).count();
    assert_eq!(active, state.registered.len());
    assert!(state.registered.windows(2).all(|w| w[0] < w[1]));
});
