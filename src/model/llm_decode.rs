use crate::model::npc::NpcRecord;
use serde::Deserialize;
use serde_json::Value;

/// Shape the generator prompt asks for. Every field is required here,
/// unlike `NpcRecord` which tolerates partial files on disk.
#[derive(Deserialize)]
struct GeneratedNpc {
    name: String,
    faction: String,
    profession: String,
    personality_traits: Vec<String>,
    backstory_short: String,
}

/// Decode raw LLM output into an NPC record.
///
/// Single strict attempt: no fence stripping, no repair. Trait count and
/// backstory length are not enforced.
pub fn decode_llm_npc(raw: &str) -> Result<NpcRecord, String> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| format!("Invalid LLM output: {}", e))?;

    if !value.is_object() {
        return Err("NPC must be a single JSON object".to_string());
    }

    let npc: GeneratedNpc = serde_json::from_value(value)
        .map_err(|e| format!("NPC does not match schema: {}", e))?;

    Ok(NpcRecord {
        name: npc.name,
        faction: npc.faction,
        profession: npc.profession,
        personality_traits: npc.personality_traits,
        backstory_short: npc.backstory_short,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const THORN: &str = r#"{
        "name": "Thorn",
        "faction": "Ironhold Clans",
        "profession": "Warrior",
        "personality_traits": ["brave", "stubborn", "loyal", "gruff"],
        "backstory_short": "Lost an eye defending the gate."
    }"#;

    #[test]
    fn decodes_well_formed_object() {
        let npc = decode_llm_npc(THORN).unwrap();
        assert_eq!(npc.name, "Thorn");
        assert_eq!(npc.personality_traits.len(), 4);
    }

    #[test]
    fn long_backstory_is_kept_verbatim() {
        let long = "x".repeat(350);
        let raw = format!(
            r#"{{"name":"A","faction":"B","profession":"C","personality_traits":["d"],"backstory_short":"{long}"}}"#
        );
        let npc = decode_llm_npc(&raw).unwrap();
        assert_eq!(npc.backstory_short.chars().count(), 350);
    }

    #[test]
    fn prose_is_rejected() {
        let err = decode_llm_npc("Sure! Here is your NPC: Thorn").unwrap_err();
        assert!(err.starts_with("Invalid LLM output"));
    }

    #[test]
    fn markdown_fence_is_not_stripped() {
        let fenced = format!("```json\n{THORN}\n```");
        assert!(decode_llm_npc(&fenced).is_err());
    }

    #[test]
    fn array_is_rejected() {
        let err = decode_llm_npc(&format!("[{THORN}]")).unwrap_err();
        assert!(err.contains("single JSON object"));
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = decode_llm_npc(r#"{"name":"Thorn","faction":"X"}"#).unwrap_err();
        assert!(err.contains("schema"));
    }
}
