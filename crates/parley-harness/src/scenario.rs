//! Seeded scenarios.
//!
//! A scenario expands a seed into an operation sequence with ChaCha and
//! `arbitrary`, applies it to a [`RealWorld`], and returns everything an
//! oracle needs. The same seed always yields the same run.

use arbitrary::{Arbitrary, Unstructured};
use parley_core::MediatorConfig;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    model::{ObservableState, Operation, OperationResult},
    real::RealWorld,
};

/// Bytes of entropy drawn per requested operation.
const BYTES_PER_OPERATION: usize = 16;

/// Expand a seed into `len` operations with ids clamped to the world size.
///
/// Returns fewer operations only if `arbitrary` runs out of entropy.
pub fn generate_operations(seed: u64, num_participants: usize, len: usize) -> Vec<Operation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut entropy = vec![0u8; len * BYTES_PER_OPERATION];
    rng.fill_bytes(&mut entropy);

    let mut u = Unstructured::new(&entropy);
    let mut ops = Vec::with_capacity(len);
    while ops.len() < len {
        match Operation::arbitrary(&mut u) {
            Ok(op) => ops.push(op.clamp(num_participants)),
            Err(_) => break,
        }
    }
    ops
}

/// Outcome of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// The operations that were applied.
    pub operations: Vec<String>,
    /// Result of each operation, in order.
    pub results: Vec<OperationResult>,
    /// Final observable state.
    pub state: ObservableState,
}

/// Builder for a seeded run against the real mediator.
#[derive(Debug, Clone)]
pub struct Scenario {
    seed: u64,
    num_participants: usize,
    steps: usize,
    config: MediatorConfig,
}

impl Scenario {
    /// Create a scenario with 4 participants and 32 steps.
    pub fn new(seed: u64) -> Self {
        Self { seed, num_participants: 4, steps: 32, config: MediatorConfig::default() }
    }

    /// Set the number of participants.
    #[must_use]
    pub fn with_participants(mut self, num_participants: usize) -> Self {
        self.num_participants = num_participants;
        self
    }

    /// Set the number of operations to generate.
    #[must_use]
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Set the mediator configuration.
    #[must_use]
    pub fn with_config(mut self, config: MediatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the scenario.
    pub fn run(&self) -> ScenarioOutcome {
        tracing::debug!(seed = self.seed, steps = self.steps, "running scenario");

        let operations = generate_operations(self.seed, self.num_participants, self.steps);
        let world = RealWorld::with_config(self.num_participants, self.config);
        let results = operations.iter().map(|op| world.apply(op)).collect();

        ScenarioOutcome {
            operations: operations.iter().map(|op| format!("{op:?}")).collect(),
            results,
            state: world.observable_state(),
        }
    }
}
