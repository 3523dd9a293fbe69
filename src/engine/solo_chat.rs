use crate::engine::error::GatewayError;
use crate::engine::llm_client::{GenerationOptions, TextGenerator};
use crate::engine::persona::{compile_persona, PersonaMode};
use crate::model::message::{to_wire_role, Message};
use crate::model::npc::NpcRecord;

/// Assemble the full message sequence for one user turn.
///
/// The persona block is sent as plain user text. History roles are coerced
/// to a wire role without the `SYSTEM: ` prefix the gateway would add.
pub fn build_solo_messages(
    npc: &NpcRecord,
    world: &str,
    history: &[Message],
    user_input: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    messages.push(Message::user(compile_persona(npc, PersonaMode::Solo, world, None)));
    messages.extend(
        history
            .iter()
            .map(|m| Message::new(to_wire_role(m.role).into(), m.content.clone())),
    );
    messages.push(Message::user(user_input));

    messages
}

/// Produce the NPC's reply to `user_input`.
///
/// Does not touch `history`; the caller appends the user line and the reply.
pub fn respond(
    llm: &dyn TextGenerator,
    npc: &NpcRecord,
    world: &str,
    history: &[Message],
    user_input: &str,
) -> Result<String, GatewayError> {
    let messages = build_solo_messages(npc, world, history, user_input);

    tracing::debug!(npc = %npc.name, turns = history.len(), "solo chat turn");

    llm.generate(messages.into(), GenerationOptions::conversational())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::llm_client::{LlmInput, MockTextGenerator};
    use crate::model::message::Speaker;

    fn thorn() -> NpcRecord {
        NpcRecord {
            name: "Thorn".into(),
            faction: "Ironhold Clans".into(),
            profession: "Warrior".into(),
            personality_traits: vec!["brave".into()],
            backstory_short: "Veteran.".into(),
        }
    }

    #[test]
    fn sequence_is_persona_history_then_input() {
        let history = vec![
            Message::user("Hello"),
            Message::assistant("Hail, stranger!"),
            Message::system("stray note"),
        ];
        let msgs = build_solo_messages(&thorn(), "World", &history, "Tell me a tale");

        assert_eq!(msgs.len(), 5);
        assert_eq!(msgs[0].role, Speaker::User);
        assert!(msgs[0].content.contains("Roleplay as Thorn."));
        assert_eq!(msgs[2], Message::assistant("Hail, stranger!"));
        assert_eq!(msgs[3], Message::user("stray note"));
        assert_eq!(msgs[4], Message::user("Tell me a tale"));
    }

    #[test]
    fn respond_uses_conversational_budget() {
        let mut llm = MockTextGenerator::new();
        llm.expect_generate()
            .withf(|input, options| {
                options.max_tokens == 400
                    && matches!(input, LlmInput::Messages(m) if m.len() == 2)
            })
            .times(1)
            .returning(|_, _| Ok("For the clans!".into()));

        let reply = respond(&llm, &thorn(), "World", &[], "Hi").unwrap();
        assert_eq!(reply, "For the clans!");
    }

    #[test]
    fn gateway_failure_propagates() {
        let mut llm = MockTextGenerator::new();
        llm.expect_generate()
            .returning(|_, _| Err(GatewayError::transport("http://x", "timed out")));

        let err = respond(&llm, &thorn(), "World", &[], "Hi").unwrap_err();
        assert!(matches!(err, GatewayError::Transport { .. }));
    }
}
