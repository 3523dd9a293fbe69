/// Builds the one-shot prompts sent to the LLM.
/// Only formats text: no parsing, no networking.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn lore_question(story: &str, question: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str("You are a fantasy lore assistant.\n");
        push_story(&mut prompt, story);
        prompt.push_str(&format!("Question: {}\n", question.trim()));
        prompt.push_str("Answer concisely and based only on the story.\n");

        prompt
    }

    pub fn lore_summary(story: &str, max_tokens: u32) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "You are a fantasy lore summarizer. Read the following story/world lore and produce a concise summary\n\
highlighting factions, important locations, main characters, conflicts, and general world setup.\n\n",
        );
        push_story(&mut prompt, story);
        prompt.push_str(&format!("Summary (max {max_tokens} tokens):\n"));

        prompt
    }

    pub fn npc_generation(story: &str, request: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "You are an NPC generator for a fantasy RPG world. STRICT RULES:\n\
- Output ONLY valid JSON. No explanations, no prose, no Markdown.\n\
- Output a single JSON object.\n\
- Use double quotes for keys and string values.\n\
- Arrays must be normal JSON arrays.\n\
- No trailing commas. Do not invent fields beyond the schema.\n\
- Required fields: name, faction, profession, personality_traits (4-6 short traits), backstory_short (<=200 chars).\n\n\
Schema:\n\
{\"name\": string, \"faction\": string, \"profession\": string, \"personality_traits\": [string, ...], \"backstory_short\": string}\n\n",
        );
        push_story(&mut prompt, story);
        prompt.push_str(&format!("User request: {}\n", request.trim()));

        prompt
    }
}

fn push_story(prompt: &mut String, story: &str) {
    prompt.push_str("Story:\n");
    prompt.push_str(story);
    prompt.push_str("\n\n");
}
