//! Transcript and Turn domain types — the append-only conversation log.
//!
//! The transcript is the single source of truth for one query: every model
//! call consumes it in full, every step of the loop appends to it, and it is
//! returned whole to the caller as the audit trail regardless of how the
//! query ends. Turns are never edited or removed once appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a transcript (one query's conversation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranscriptId(pub String);

impl TranscriptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TranscriptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TranscriptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn in the conversation.
///
/// The ReAct protocol only knows two voices: the user side (instruction
/// prompt, query, tool observations) and the model side (thoughts, actions,
/// answers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The user side: query, instructions, and observations fed back in
    User,
    /// The model's generated text
    Model,
}

/// A single role-tagged text entry in the conversation history.
///
/// Immutable once appended to a [`Transcript`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this text
    pub role: Role,

    /// The text content
    pub text: String,

    /// When the turn was appended
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a user-role turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a model-role turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// The structured result (or error) of a dispatched capability call.
///
/// Exactly one observation exists per dispatched action — success or
/// failure, never zero, never more than one. It is fed back to the model
/// as a user-role turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Which loop iteration produced this observation (1-based, matching
    /// the `ObservationN` numbering the prompt teaches the model)
    pub iteration: u32,

    /// The rendered result or diagnostic text
    pub text: String,

    /// Whether this observation reports a failure
    pub is_error: bool,
}

impl Observation {
    /// A successful observation carrying a capability's rendered output.
    pub fn success(iteration: u32, text: impl Into<String>) -> Self {
        Self {
            iteration,
            text: text.into(),
            is_error: false,
        }
    }

    /// An error observation carrying a diagnostic message.
    pub fn error(iteration: u32, text: impl Into<String>) -> Self {
        Self {
            iteration,
            text: text.into(),
            is_error: true,
        }
    }

    /// Render this observation as the text the model will read.
    pub fn render(&self) -> String {
        if self.is_error {
            format!("Error: {}", self.text)
        } else {
            format!("Observation{}: {}", self.iteration, self.text)
        }
    }

    /// Convert into the user-role turn appended to the transcript.
    pub fn into_turn(self) -> Turn {
        Turn::user(self.render())
    }
}

/// An ordered, append-only sequence of turns.
///
/// Owned exclusively by one loop controller for the lifetime of a single
/// query; never shared across concurrent queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique transcript ID
    pub id: TranscriptId,

    /// Ordered turns. Append-only: no turn is ever edited or removed.
    turns: Vec<Turn>,

    /// When this transcript was created
    pub created_at: DateTime<Utc>,
}

impl Transcript {
    /// Create a new empty transcript.
    pub fn new() -> Self {
        Self {
            id: TranscriptId::new(),
            turns: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a turn. The only mutation the transcript supports.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The ordered turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Count turns whose text carries an observation prefix.
    ///
    /// Used by callers auditing how many actions a run dispatched.
    pub fn observation_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| {
            t.role == Role::User
                && (t.text.starts_with("Observation") || t.text.starts_with("Error:"))
        })
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
