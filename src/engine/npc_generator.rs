use std::sync::Arc;

use crate::engine::error::GenerationError;
use crate::engine::llm_client::{GenerationOptions, TextGenerator};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::llm_decode::decode_llm_npc;
use crate::model::name_registry::NameRegistry;
use crate::model::npc::NpcRecord;

/// Creates NPC records and keeps their names unique for this session.
pub struct NpcGenerator {
    llm: Arc<dyn TextGenerator>,
    registry: NameRegistry,
}

impl NpcGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            llm,
            registry: NameRegistry::new(),
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    pub fn generate(&self, story: &str, request: &str) -> Result<NpcRecord, GenerationError> {
        let prompt = PromptBuilder::npc_generation(story, request);
        let raw = self.llm.generate(prompt.into(), GenerationOptions::default())?;

        let mut npc = decode_llm_npc(&raw).map_err(|reason| {
            tracing::warn!(%reason, "rejected NPC generation output");
            GenerationError::Malformed {
                reason,
                raw: raw.clone(),
            }
        })?;

        let claimed = self.registry.claim(&npc.name);
        if claimed != npc.name {
            tracing::info!(original = %npc.name, renamed = %claimed, "NPC name collision");
        }
        npc.name = claimed;

        tracing::info!(name = %npc.name, faction = %npc.faction, "generated NPC");
        Ok(npc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::GatewayError;
    use crate::engine::llm_client::{LlmInput, MockTextGenerator};

    const THORN: &str = r#"{"name":"Thorn","faction":"Ironhold Clans","profession":"Warrior","personality_traits":["brave","stubborn","loyal","gruff"],"backstory_short":"Veteran."}"#;

    fn generator_returning(raw: &'static str) -> NpcGenerator {
        let mut llm = MockTextGenerator::new();
        llm.expect_generate().returning(move |_, _| Ok(raw.to_string()));
        NpcGenerator::new(Arc::new(llm))
    }

    #[test]
    fn second_thorn_becomes_thorn_ii() {
        let generator = generator_returning(THORN);

        let first = generator.generate("Lore", "a warrior").unwrap();
        let second = generator.generate("Lore", "another warrior").unwrap();

        assert_eq!(first.name, "Thorn");
        assert_eq!(second.name, "Thorn II");
        assert!(generator.registry().contains("Thorn"));
        assert!(generator.registry().contains("Thorn II"));
        assert_eq!(generator.registry().len(), 2);
    }

    #[test]
    fn prompt_carries_lore_and_request_with_default_budget() {
        let mut llm = MockTextGenerator::new();
        llm.expect_generate()
            .withf(|input, options| {
                options.max_tokens == 1000
                    && matches!(input, LlmInput::Prompt(p)
                        if p.contains("Story:\nThe Ironhold.") && p.contains("User request: a smith"))
            })
            .times(1)
            .returning(|_, _| Ok(THORN.to_string()));

        let generator = NpcGenerator::new(Arc::new(llm));
        generator.generate("The Ironhold.", "a smith").unwrap();
    }

    #[test]
    fn malformed_output_is_a_typed_error_and_registers_nothing() {
        let generator = generator_returning("```json\n{\"name\": \"Thorn\"}\n```");

        let err = generator.generate("Lore", "x").unwrap_err();
        match err {
            GenerationError::Malformed { raw, .. } => assert!(raw.starts_with("```json")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(generator.registry().len(), 0);
    }

    #[test]
    fn overlong_backstory_is_accepted_as_is() {
        let mut llm = MockTextGenerator::new();
        llm.expect_generate().returning(|_, _| {
            Ok(format!(
                r#"{{"name":"Vessa","faction":"F","profession":"P","personality_traits":["a","b","c","d"],"backstory_short":"{}"}}"#,
                "b".repeat(260)
            ))
        });

        let npc = NpcGenerator::new(Arc::new(llm)).generate("Lore", "x").unwrap();
        assert_eq!(npc.backstory_short.len(), 260);
    }

    #[test]
    fn gateway_error_passes_through() {
        let mut llm = MockTextGenerator::new();
        llm.expect_generate()
            .returning(|_, _| Err(GatewayError::transport("http://x", "connection refused")));

        let err = NpcGenerator::new(Arc::new(llm)).generate("Lore", "x").unwrap_err();
        assert!(matches!(err, GenerationError::Gateway(GatewayError::Transport { .. })));
    }
}
