//! Model-based testing harness for the Parley mediator.
//!
//! Operations are applied to both a reference model and a real `Mediator`, and
//! their results and observable states are compared.
//!
//! # Model-Based Testing
//!
//! ```text
//! proptest / arbitrary / seed ──▶ Vec<Operation>
//!                                      │
//!                       ┌──────────────┼──────────────┐
//!                       ▼              ▼              ▼
//!                  ModelWorld      RealWorld       Compare
//!                  (reference)     (Mediator)      results + state
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod real;
pub mod scenario;

pub use model::{
    ModelMessage, ModelWorld, ObservableState, Operation, OperationError, OperationResult,
    ParticipantId, SmallMessage,
};
pub use real::{RealWorld, Recorder};
pub use scenario::{Scenario, ScenarioOutcome, generate_operations};
