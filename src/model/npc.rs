use serde::{Deserialize, Serialize};

/// A generated or loaded non-player character.
///
/// Files on disk are hand-editable, so only `name` is mandatory when reading
/// them back. Strict checking of LLM output lives in `llm_decode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub name: String,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub backstory_short: String,
}

impl NpcRecord {
    /// Pretty-printed JSON with non-ASCII characters kept as-is.
    pub fn to_export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Suggested file name for exporting this NPC.
    ///
    /// The name comes from the LLM, so path separators and other characters
    /// that are unsafe in file names become `_` and leading dots are dropped.
    /// The result is always a single path component.
    pub fn export_file_name(&self) -> String {
        let cleaned: String = self
            .name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        let stem = cleaned.trim_start_matches('.');
        if stem.is_empty() {
            "npc.json".to_string()
        } else {
            format!("{stem}.json")
        }
    }

    pub fn traits_joined(&self) -> String {
        self.personality_traits.join(", ")
    }
}
