//! Chat-room script format.
//!
//! One command per line:
//!
//! ```text
//! register <name>
//! unregister <name>
//! send <from> <to> <text...>
//! broadcast <from> <text...>
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Message text is the
//! rest of the line with its inner whitespace kept.

use thiserror::Error;

/// Script shipped with the binary, used when no script file is given.
pub const DEMO_SCRIPT: &str = "\
# Three users join, two talk privately, one greets the room.
register Jaloliddin
register Elena
register Eva
send Jaloliddin Elena Hi
send Elena Jaloliddin Hello!
broadcast Eva Hi everyone!
";

/// A single script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a member to the room.
    Register(String),
    /// Remove a member from the room.
    Unregister(String),
    /// Addressed message.
    Send {
        /// Sending member.
        from: String,
        /// Recipient.
        to: String,
        /// Message text.
        text: String,
    },
    /// Message to every other member.
    Broadcast {
        /// Sending member.
        from: String,
        /// Message text.
        text: String,
    },
}

/// Parse error with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct ScriptError {
    /// Line the error was found on.
    pub line: usize,
    /// What was wrong with it.
    pub reason: String,
}

/// Parse a whole script.
pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let parsed = parse_line(line).map_err(|reason| ScriptError { line: i + 1, reason })?;
        commands.extend(parsed);
    }
    Ok(commands)
}

/// Parse one line. `Ok(None)` for blank lines and comments.
fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = split_word(line);
    let command = match keyword {
        "register" => Command::Register(single_name(keyword, rest)?),
        "unregister" => Command::Unregister(single_name(keyword, rest)?),
        "send" => {
            let (from, rest) = split_word(rest);
            let (to, text) = split_word(rest);
            if from.is_empty() || to.is_empty() || text.is_empty() {
                return Err("usage: send <from> <to> <text...>".to_string());
            }
            Command::Send { from: from.to_string(), to: to.to_string(), text: text.to_string() }
        },
        "broadcast" => {
            let (from, text) = split_word(rest);
            if from.is_empty() || text.is_empty() {
                return Err("usage: broadcast <from> <text...>".to_string());
            }
            Command::Broadcast { from: from.to_string(), text: text.to_string() }
        },
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Some(command))
}

fn single_name(keyword: &str, rest: &str) -> Result<String, String> {
    let (name, extra) = split_word(rest);
    if name.is_empty() || !extra.is_empty() {
        return Err(format!("usage: {keyword} <name>"));
    }
    Ok(name.to_string())
}

/// Split off the first whitespace-delimited word; the remainder is trimmed.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}
