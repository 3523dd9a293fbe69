use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message. Only `User` and `Assistant` exist on the wire;
/// everything else is a higher-level tag that gets flattened before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
    System,
    Context,
    Npc1,
    Npc2,
    #[serde(other)]
    Unknown,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
            Speaker::System => "system",
            Speaker::Context => "context",
            Speaker::Npc1 => "npc1",
            Speaker::Npc2 => "npc2",
            Speaker::Unknown => "unknown",
        }
    }

    pub fn is_wire_valid(&self) -> bool {
        matches!(self, Speaker::User | Speaker::Assistant)
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two roles the chat-completion contract accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
}

impl WireRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireRole::User => "user",
            WireRole::Assistant => "assistant",
        }
    }
}

impl From<WireRole> for Speaker {
    fn from(role: WireRole) -> Self {
        match role {
            WireRole::User => Speaker::User,
            WireRole::Assistant => Speaker::Assistant,
        }
    }
}

/// Anything that is not the assistant is sent as the user.
pub fn to_wire_role(speaker: Speaker) -> WireRole {
    match speaker {
        Speaker::Assistant => WireRole::Assistant,
        _ => WireRole::User,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Speaker,
    pub content: String,
}

impl Message {
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Speaker::System, content)
    }

    pub fn context(content: impl Into<String>) -> Self {
        Self::new(Speaker::Context, content)
    }
}

/// A message as it is actually transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl From<WireMessage> for Message {
    fn from(m: WireMessage) -> Self {
        Message {
            role: m.role.into(),
            content: m.content,
        }
    }
}
