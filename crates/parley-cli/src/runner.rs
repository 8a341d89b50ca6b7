//! Executes parsed scripts against a chat room.

use std::{collections::HashMap, sync::Arc};

use parley_core::{ChatRoom, ChatUser, MediatorConfig, Participant, RouterError, Transcript};
use thiserror::Error;

use crate::script::{self, Command, ScriptError};

/// Chat room plus one member per name seen in the script.
///
/// Members are created on first `register` and reused afterwards, so a name
/// that was unregistered can join again.
#[derive(Debug)]
pub struct Runner {
    room: ChatRoom,
    members: HashMap<String, Arc<ChatUser>>,
    transcript: Transcript,
}

impl Runner {
    /// Create a runner with an empty room.
    pub fn new(config: MediatorConfig) -> Self {
        Self {
            room: ChatRoom::with_config(config),
            members: HashMap::new(),
            transcript: Transcript::new(),
        }
    }

    /// The room commands are executed against.
    pub fn room(&self) -> &ChatRoom {
        &self.room
    }

    /// Deliveries so far, in delivery order.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Execute one command.
    pub fn execute(&mut self, command: &Command) -> Result<(), RouterError<String>> {
        match command {
            Command::Register(name) => {
                let transcript = &self.transcript;
                let member = self
                    .members
                    .entry(name.clone())
                    .or_insert_with(|| {
                        Arc::new(ChatUser::with_transcript(name.clone(), transcript.clone()))
                    })
                    .clone();
                self.room.register(member)
            },
            Command::Unregister(name) => self.room.unregister(name).map(|_| ()),
            Command::Send { from, to, text } => self.send(from, text, Some(to)),
            Command::Broadcast { from, text } => self.send(from, text, None),
        }
    }

    /// Execute every command, logging failures and carrying on.
    ///
    /// Returns the number of commands that failed.
    pub fn run(&mut self, commands: &[Command]) -> usize {
        let mut failed = 0;
        for command in commands {
            if let Err(e) = self.execute(command) {
                tracing::warn!(?command, error = %e, "command failed");
                failed += 1;
            }
        }
        failed
    }

    /// Members that were never seen route through the room directly, which
    /// reports them as unknown senders.
    fn send(&self, from: &str, text: &str, to: Option<&String>) -> Result<(), RouterError<String>> {
        match self.members.get(from) {
            Some(member) => member.send(text.to_string(), to),
            None => self.room.route(text.to_string(), &from.to_string(), to),
        }
    }
}

/// Result of a complete script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Transcript lines, in delivery order.
    pub lines: Vec<String>,
    /// Commands executed.
    pub total: usize,
    /// Commands that failed.
    pub failed: usize,
}

/// Some commands of a script failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{failed} of {total} commands failed")]
pub struct CommandsFailed {
    /// Commands that failed.
    pub failed: usize,
    /// Commands executed.
    pub total: usize,
}

impl ScriptOutcome {
    /// `Err` if any command failed.
    pub fn check(&self) -> Result<(), CommandsFailed> {
        if self.failed == 0 {
            Ok(())
        } else {
            Err(CommandsFailed { failed: self.failed, total: self.total })
        }
    }
}

/// Parse and run a script.
pub fn run_script(source: &str, config: MediatorConfig) -> Result<ScriptOutcome, ScriptError> {
    let commands = script::parse(source)?;
    let mut runner = Runner::new(config);
    let failed = runner.run(&commands);
    tracing::debug!(commands = commands.len(), failed, "script finished");
    Ok(ScriptOutcome { lines: runner.transcript().lines(), total: commands.len(), failed })
}
