//! Reference model for model-based testing.
//!
//! The model captures the routing rules (unique addresses, addressed and
//! broadcast delivery, sender exclusion) without locks, endpoints or trait
//! objects. It serves as the oracle against which the real mediator is
//! verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Rules not mechanism: Captures WHAT is delivered, not HOW
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod world;

pub use operation::{Operation, OperationError, OperationResult, ParticipantId, SmallMessage};
pub use world::{ModelMessage, ModelWorld, ObservableState};
