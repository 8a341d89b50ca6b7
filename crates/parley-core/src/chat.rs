//! Chat-room participant.
//!
//! `ChatMember` renders every delivery as `"{from} => {to}: {message}"`,
//! keeps those lines in its own log and optionally appends them to a
//! [`Transcript`] shared by the whole room.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    error::ReceiveError,
    mediator::Mediator,
    participant::{Address, Endpoint, Message, Participant},
};

/// Mediator keyed by user names carrying text messages.
pub type ChatRoom = Mediator<String, String>;

/// Chat member for a [`ChatRoom`].
pub type ChatUser = ChatMember<String, String>;

/// Delivery lines from several members, in the order they were received.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&self, line: String) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).push(line);
    }

    /// Copy of all lines so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of lines so far.
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A participant that logs what it receives.
pub struct ChatMember<A, M> {
    endpoint: Endpoint<A, M>,
    log: Mutex<Vec<String>>,
    transcript: Option<Transcript>,
}

impl<A, M> ChatMember<A, M> {
    /// Create a member that only keeps its own log.
    pub fn new(address: A) -> Self {
        Self { endpoint: Endpoint::new(address), log: Mutex::new(Vec::new()), transcript: None }
    }

    /// Create a member that also writes to a shared transcript.
    pub fn with_transcript(address: A, transcript: Transcript) -> Self {
        Self {
            endpoint: Endpoint::new(address),
            log: Mutex::new(Vec::new()),
            transcript: Some(transcript),
        }
    }

    /// Lines this member received, oldest first.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl<A, M> Participant<A, M> for ChatMember<A, M>
where
    A: Address + fmt::Display,
    M: Message + fmt::Display,
{
    fn endpoint(&self) -> &Endpoint<A, M> {
        &self.endpoint
    }

    fn receive(&self, message: &M, from: &A) -> Result<(), ReceiveError> {
        let line = format!("{from} => {}: {message}", self.address());
        tracing::info!("{}", line);

        if let Some(transcript) = &self.transcript {
            transcript.push(line.clone());
        }
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push(line);
        Ok(())
    }
}

impl<A: fmt::Debug, M> fmt::Debug for ChatMember<A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatMember")
            .field("endpoint", &self.endpoint)
            .field("received", &self.log.lock().unwrap_or_else(PoisonError::into_inner).len())
            .finish()
    }
}
