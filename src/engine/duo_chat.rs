//! Turn engine for two NPCs talking to each other.
//!
//! Everything here is a function of `(npc1, npc2, transcript)`; the caller
//! owns the transcript and appends each returned turn itself.

use crate::engine::error::GatewayError;
use crate::engine::llm_client::{GenerationOptions, TextGenerator};
use crate::engine::persona::{compile_persona, display_name, PersonaMode};
use crate::model::message::{Message, Speaker};
use crate::model::npc::NpcRecord;

/// `npc1` opens, after an empty transcript or a `context` line, and the two
/// alternate from there: only an `npc1` line hands the turn to `npc2`.
pub fn next_speaker(history: &[Message]) -> Speaker {
    match history.last() {
        Some(last) if last.role == Speaker::Npc1 => Speaker::Npc2,
        _ => Speaker::Npc1,
    }
}

/// Render the transcript as neutral third-person narration.
pub fn render_transcript(history: &[Message]) -> Vec<Message> {
    history
        .iter()
        .map(|m| Message::user(format!("{} said: {}", m.role, m.content)))
        .collect()
}

pub fn build_duo_messages(
    speaker: &NpcRecord,
    partner: &NpcRecord,
    world: &str,
    history: &[Message],
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    messages.push(Message::system(compile_persona(
        speaker,
        PersonaMode::Duo,
        world,
        Some(display_name(partner)),
    )));
    messages.extend(render_transcript(history));
    messages.push(Message::user(format!(
        "Now continue the conversation. Reply shortly only as {}.",
        display_name(speaker)
    )));

    messages
}

/// Generate one step of the conversation, returning `(tag, reply)`.
pub fn next_turn(
    llm: &dyn TextGenerator,
    npc1: &NpcRecord,
    npc2: &NpcRecord,
    world: &str,
    history: &[Message],
) -> Result<(Speaker, String), GatewayError> {
    let turn = next_speaker(history);
    let (speaker, partner) = match turn {
        Speaker::Npc2 => (npc2, npc1),
        _ => (npc1, npc2),
    };

    tracing::info!(%turn, speaker = %speaker.name, "duo chat turn");

    let messages = build_duo_messages(speaker, partner, world, history);
    let reply = llm.generate(messages.into(), GenerationOptions::conversational())?;

    Ok((turn, reply.trim().to_string()))
}
