use std::fs;
use std::path::Path;

use crate::engine::error::{GatewayError, StoreError};
use crate::engine::llm_client::{GenerationOptions, TextGenerator};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::lore::WorldLore;

pub const SUMMARY_MAX_TOKENS: u32 = 500;

/// Read the world lore file once, as UTF-8.
pub fn load_story(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
}

pub fn answer_question(
    llm: &dyn TextGenerator,
    story: &str,
    question: &str,
) -> Result<String, GatewayError> {
    let prompt = PromptBuilder::lore_question(story, question);
    llm.generate(prompt.into(), GenerationOptions::default())
}

pub fn summarize_story(
    llm: &dyn TextGenerator,
    story: &str,
    max_tokens: u32,
) -> Result<String, GatewayError> {
    let prompt = PromptBuilder::lore_summary(story, max_tokens);
    llm.generate(
        prompt.into(),
        GenerationOptions::default().with_max_tokens(max_tokens),
    )
}

/// Wrap the lore text, condensing it first when asked to.
///
/// A failed summary is logged and the full text is used instead.
pub fn prepare_lore(llm: &dyn TextGenerator, story: String, summarize: bool) -> WorldLore {
    if !summarize {
        return WorldLore::new(story);
    }

    match summarize_story(llm, &story, SUMMARY_MAX_TOKENS) {
        Ok(summary) if !summary.is_empty() => WorldLore::new(story).with_summary(summary),
        Ok(_) => {
            tracing::warn!("lore summary came back empty, using full text");
            WorldLore::new(story)
        }
        Err(e) => {
            tracing::warn!(error = %e, "lore summary failed, using full text");
            WorldLore::new(story)
        }
    }
}
