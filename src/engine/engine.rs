use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use crate::engine::duo_chat;
use crate::engine::llm_client::TextGenerator;
use crate::engine::lore_qa;
use crate::engine::npc_generator::NpcGenerator;
use crate::engine::npc_store;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::solo_chat;
use crate::model::lore::WorldLore;

/// Runs every LLM call off the UI thread, one command at a time.
pub struct Engine {
    llm: Arc<dyn TextGenerator>,
    generator: NpcGenerator,
    lore: WorldLore,
    npc_dir: PathBuf,
}

impl Engine {
    pub fn new(llm: Arc<dyn TextGenerator>, lore: WorldLore, npc_dir: PathBuf) -> Self {
        Self {
            generator: NpcGenerator::new(llm.clone()),
            llm,
            lore,
            npc_dir,
        }
    }

    pub fn run(&self, rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>) {
        while let Ok(cmd) = rx.recv() {
            if tx.send(self.handle(cmd)).is_err() {
                break;
            }
        }
        tracing::debug!("engine loop stopped");
    }

    pub fn handle(&self, cmd: EngineCommand) -> EngineResponse {
        match cmd {
            EngineCommand::AskQuestion(question) => EngineResponse::Answer(
                lore_qa::answer_question(self.llm.as_ref(), &self.lore.text, &question)
                    .map_err(|e| e.to_string()),
            ),

            EngineCommand::GenerateNpc(request) => EngineResponse::NpcGenerated(
                self.generator
                    .generate(&self.lore.text, &request)
                    .map_err(|e| e.to_string()),
            ),

            EngineCommand::SaveNpc(npc) => EngineResponse::NpcSaved(
                npc_store::save_npc(&self.npc_dir, &npc).map_err(|e| e.to_string()),
            ),

            EngineCommand::ReloadNpcs => EngineResponse::NpcsLoaded(
                npc_store::load_npcs(&self.npc_dir).map_err(|e| e.to_string()),
            ),

            EngineCommand::TalkToNpc {
                npc,
                history,
                input,
            } => {
                let result = solo_chat::respond(
                    self.llm.as_ref(),
                    &npc,
                    self.lore.background(),
                    &history,
                    &input,
                )
                .map_err(|e| e.to_string());

                EngineResponse::NpcReply {
                    npc_name: npc.name,
                    input,
                    result,
                }
            }

            EngineCommand::NextDuoTurn {
                key,
                npc1,
                npc2,
                history,
            } => EngineResponse::DuoTurn {
                key,
                result: duo_chat::next_turn(
                    self.llm.as_ref(),
                    &npc1,
                    &npc2,
                    self.lore.background(),
                    &history,
                )
                .map_err(|e| e.to_string()),
            },
        }
    }
}
