pub mod llm_decode;
pub mod lore;
pub mod message;
pub mod name_registry;
pub mod npc;
