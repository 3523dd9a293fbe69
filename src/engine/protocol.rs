use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::model::message::{Message, Speaker};
use crate::model::npc::NpcRecord;

/// Identifies one NPC-vs-NPC transcript in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DuoKey {
    pub npc1: String,
    pub npc2: String,
}

impl DuoKey {
    pub fn new(npc1: &str, npc2: &str) -> Self {
        Self {
            npc1: npc1.to_string(),
            npc2: npc2.to_string(),
        }
    }
}

pub enum EngineCommand {
    AskQuestion(String),
    GenerateNpc(String),
    SaveNpc(NpcRecord),
    ReloadNpcs,
    TalkToNpc {
        npc: NpcRecord,
        history: Vec<Message>,
        input: String,
    },
    NextDuoTurn {
        key: DuoKey,
        npc1: NpcRecord,
        npc2: NpcRecord,
        history: Vec<Message>,
    },
}

/// Results travel back as display strings; the UI only shows them.
pub enum EngineResponse {
    Answer(Result<String, String>),
    NpcGenerated(Result<NpcRecord, String>),
    NpcSaved(Result<PathBuf, String>),
    NpcsLoaded(Result<BTreeMap<String, NpcRecord>, String>),
    NpcReply {
        npc_name: String,
        input: String,
        result: Result<String, String>,
    },
    DuoTurn {
        key: DuoKey,
        result: Result<(Speaker, String), String>,
    },
}
