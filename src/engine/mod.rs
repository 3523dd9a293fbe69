pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;

pub mod duo_chat;
pub mod llm_client;
pub mod lore_qa;
pub mod npc_generator;
pub mod npc_store;
pub mod persona;
pub mod prompt_builder;
pub mod solo_chat;
