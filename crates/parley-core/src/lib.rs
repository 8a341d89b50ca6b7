//! Parley routing core.
//!
//! An in-process mediator that decouples named participants. Participants
//! never reference one another; they send through a [`Mediator`], which
//! delivers either to one addressed recipient or, without an address, to
//! every other registered participant.
//!
//! ## Architecture
//!
//! ```text
//! parley-core
//!   ├─ Mediator        (registry + routing, cheap to clone)
//!   ├─ Participant     (receive hook, send via its Endpoint)
//!   ├─ Endpoint        (address + weak back-reference to the mediator)
//!   ├─ MediatorConfig  (sender, duplicate and re-entrancy policies)
//!   ├─ ChatMember      (logging participant for chat rooms)
//!   └─ Mailbox         (channel-backed participant for async consumers)
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use parley_core::{ChatRoom, ChatUser, Participant};
//!
//! let room = ChatRoom::new();
//! let alice = Arc::new(ChatUser::new("Alice".to_string()));
//! let bob = Arc::new(ChatUser::new("Bob".to_string()));
//! let eve = Arc::new(ChatUser::new("Eve".to_string()));
//! room.register(alice.clone())?;
//! room.register(bob.clone())?;
//! room.register(eve.clone())?;
//!
//! alice.send("Hi".to_string(), Some(&"Bob".to_string()))?;
//! eve.send("Hi everyone!".to_string(), None)?;
//!
//! assert_eq!(bob.log(), vec!["Alice => Bob: Hi", "Eve => Bob: Hi everyone!"]);
//! assert_eq!(alice.log(), vec!["Eve => Alice: Hi everyone!"]);
//! assert!(eve.log().is_empty());
//! # Ok::<(), parley_core::RouterError<String>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat;
mod config;
mod depth;
mod error;
mod mailbox;
mod mediator;
mod participant;

pub use chat::{ChatMember, ChatRoom, ChatUser, Transcript};
pub use config::{DEFAULT_MAX_DELIVERY_DEPTH, DuplicatePolicy, MediatorConfig, SenderPolicy};
pub use error::{DeliveryFailure, ReceiveError, RouterError};
pub use mailbox::{Envelope, Mailbox};
pub use mediator::Mediator;
pub use participant::{Address, Endpoint, Message, Participant, ParticipantState};
