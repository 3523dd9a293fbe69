use crate::model::npc::NpcRecord;

/// Which conversation the persona block is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaMode {
    /// The NPC talks with the user.
    Solo,
    /// The NPC talks with another NPC.
    Duo,
}

/// Trait keyword -> how it should colour the reply.
const TRAIT_TONES: &[(&str, &str)] = &[
    ("brave", "be boldly heroic, never back down"),
    ("arrogant", "be boastful and condescending"),
    ("shy", "be overly hesitant, trail off, apologise"),
    ("loyal", "defend friends and oaths fiercely"),
    ("greedy", "steer every topic towards coin and profit"),
    ("cunning", "speak in hints and half-truths"),
    ("cheerful", "be warm, upbeat and quick to laugh"),
    ("grumpy", "complain, grumble and sigh often"),
    ("wise", "speak calmly, in measured proverbs"),
    ("cowardly", "look for the nearest exit, exaggerate every danger"),
    ("stubborn", "refuse to concede any point"),
    ("curious", "ask questions and get distracted by details"),
    ("hot-tempered", "snap quickly and raise your voice"),
    ("pious", "invoke your gods and their judgement"),
];

const UNKNOWN: &str = "Unknown";

/// Compile the in-character instruction block for one NPC.
///
/// `world` is the lore background; `partner_name` only matters in duo mode.
pub fn compile_persona(
    npc: &NpcRecord,
    mode: PersonaMode,
    world: &str,
    partner_name: Option<&str>,
) -> String {
    let mut prompt = String::new();

    push_roleplay_rules(&mut prompt, mode);
    push_trait_guidance(&mut prompt, npc);
    push_story_summary(&mut prompt, world);
    push_character_sheet(&mut prompt, npc, mode);

    if mode == PersonaMode::Duo {
        push_duo_rules(&mut prompt, display_name(npc), partner_name.unwrap_or(UNKNOWN));
    }

    prompt
}

pub fn display_name(npc: &NpcRecord) -> &str {
    or_unknown(&npc.name)
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN
    } else {
        value
    }
}

fn push_roleplay_rules(prompt: &mut String, mode: PersonaMode) {
    match mode {
        PersonaMode::Solo => prompt.push_str(
            "You are a fantasy RPG character. Always stay in character and make your responses vivid and exaggerated. ",
        ),
        PersonaMode::Duo => prompt.push_str(
            "You are roleplaying as a fantasy RPG character. Stay strictly in character and reply ONLY as this character.\n\n",
        ),
    }

    prompt.push_str(
        "Strongly emphasize the character's personality traits, emotions, and quirks in every reply. \
If the character is brave, be boldly heroic; if arrogant, be boastful; if shy, be overly hesitant; etc. \
Avoid being neutral or generic - your goal is to make the character feel unique and memorable.\n\n",
    );
}

fn push_trait_guidance(prompt: &mut String, npc: &NpcRecord) {
    let lines: Vec<String> = npc
        .personality_traits
        .iter()
        .filter_map(|t| {
            tone_for(t).map(|tone| format!("- {}: {}\n", t.trim(), tone))
        })
        .collect();

    if lines.is_empty() {
        return;
    }

    prompt.push_str("Tone guidance for your traits:\n");
    for line in lines {
        prompt.push_str(&line);
    }
    prompt.push('\n');
}

/// Tone for a free-text trait, matched on whole words so that "pushy" does
/// not pick up "shy".
fn tone_for(trait_text: &str) -> Option<&'static str> {
    let lowered = trait_text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    TRAIT_TONES
        .iter()
        .find(|(trait_name, _)| {
            let key: Vec<&str> = trait_name.split('-').collect();
            words.windows(key.len()).any(|w| w == key.as_slice())
        })
        .map(|(_, tone)| *tone)
}

fn push_story_summary(prompt: &mut String, world: &str) {
    prompt.push_str("Story summary:\n");
    prompt.push_str(world);
    prompt.push_str("\n\n");
}

fn push_character_sheet(prompt: &mut String, npc: &NpcRecord, mode: PersonaMode) {
    match mode {
        PersonaMode::Solo => {
            prompt.push_str(&format!("Roleplay as {}.\n", display_name(npc)));
        }
        PersonaMode::Duo => {
            prompt.push_str(&format!("Your name: {}\n", display_name(npc)));
        }
    }
    prompt.push_str(&format!("Faction: {}\n", or_unknown(&npc.faction)));
    prompt.push_str(&format!("Profession: {}\n", or_unknown(&npc.profession)));
    prompt.push_str(&format!("Personality traits: {}\n", npc.traits_joined()));
    prompt.push_str(&format!("Backstory: {}", npc.backstory_short));
}

fn push_duo_rules(prompt: &mut String, name: &str, partner: &str) {
    prompt.push_str("\n\nImportant rules:\n");
    prompt.push_str(&format!("- Speak ONLY as {name}.\n"));
    prompt.push_str(&format!(
        "- NEVER write lines, actions, or dialogue for {partner}.\n"
    ));
    prompt.push_str(&format!(
        "- Do not prefix your message with your name (no '{name}:'), just speak naturally.\n"
    ));
    prompt.push_str("- Keep responses short and natural, like real dialogue (1-3 sentences).\n");
    prompt.push_str(
        "- Do not narrate inner thoughts unless they would realistically be spoken aloud.\n",
    );
    prompt.push_str(&format!(
        "- When addressing your partner use their proper name ({partner}, without surname) instead of NPC1 or NPC2.\n"
    ));
    prompt.push_str(
        "- If the conversation becomes repetitive, break the pattern by adding vivid flavor: humor, tension, surprise, or a small twist that keeps the roleplay lively.\n",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thorn() -> NpcRecord {
        NpcRecord {
            name: "Thorn".into(),
            faction: "Ironhold Clans".into(),
            profession: "Warrior".into(),
            personality_traits: vec!["brave".into(), "loyal".into()],
            backstory_short: "Lost an eye defending the gate.".into(),
        }
    }

    #[test]
    fn brave_trait_steers_towards_heroic_tone() {
        let block = compile_persona(&thorn(), PersonaMode::Solo, "World", None);
        assert!(block.contains("Tone guidance"));
        assert!(block.contains("- brave: be boldly heroic"));
        assert!(block.contains("- loyal:"));
    }

    #[test]
    fn negated_traits_get_no_opposite_tone() {
        let npc = NpcRecord {
            personality_traits: vec!["pushy".into(), "disloyal".into(), "unwise".into()],
            ..thorn()
        };
        let block = compile_persona(&npc, PersonaMode::Solo, "World", None);
        assert!(!block.contains("- pushy:"));
        assert!(!block.contains("- disloyal:"));
        assert!(!block.contains("- unwise:"));
        assert!(!block.contains("Tone guidance"));
    }

    #[test]
    fn multi_word_traits_match_on_words() {
        assert_eq!(tone_for("Hot-Tempered"), Some("snap quickly and raise your voice"));
        assert_eq!(tone_for("hot tempered"), Some("snap quickly and raise your voice"));
        assert_eq!(tone_for("fiercely loyal"), Some("defend friends and oaths fiercely"));
        assert_eq!(tone_for("otherwise calm"), None);
    }

    #[test]
    fn solo_block_carries_world_and_sheet() {
        let block = compile_persona(&thorn(), PersonaMode::Solo, "The Ironhold lies north.", None);
        assert!(block.contains("Story summary:\nThe Ironhold lies north."));
        assert!(block.contains("Roleplay as Thorn."));
        assert!(block.contains("Faction: Ironhold Clans"));
        assert!(block.contains("Personality traits: brave, loyal"));
        assert!(block.contains("Backstory: Lost an eye"));
        assert!(!block.contains("Important rules"));
    }

    #[test]
    fn duo_block_forbids_speaking_for_partner() {
        let block = compile_persona(&thorn(), PersonaMode::Duo, "World", Some("Mira"));
        assert!(block.contains("Your name: Thorn"));
        assert!(block.contains("NEVER write lines, actions, or dialogue for Mira"));
        assert!(block.contains("no 'Thorn:'"));
        assert!(block.contains("1-3 sentences"));
        assert!(block.contains("humor, tension, surprise"));
    }

    #[test]
    fn missing_fields_render_as_unknown() {
        let npc = NpcRecord {
            name: "Odo".into(),
            faction: String::new(),
            profession: String::new(),
            personality_traits: vec!["odd".into()],
            backstory_short: String::new(),
        };
        let block = compile_persona(&npc, PersonaMode::Duo, "World", None);
        assert!(block.contains("Faction: Unknown"));
        assert!(block.contains("dialogue for Unknown"));
        assert!(!block.contains("Tone guidance"));
    }
}
