use std::path::PathBuf;
use std::time::Duration;

/// Default LM Studio style base URL.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:1234/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct-v0.3";

pub const DEFAULT_STORY_PATH: &str = "fantasy.md";

pub const DEFAULT_NPC_DIR: &str = "NPCs";

/// Upper bound for every call to the inference endpoint.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub model: String,
    pub story_path: PathBuf,
    pub npc_dir: PathBuf,
    pub summarize_lore: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            story_path: PathBuf::from(DEFAULT_STORY_PATH),
            npc_dir: PathBuf::from(DEFAULT_NPC_DIR),
            summarize_lore: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Uses `LMSTUDIO_API_BASE`, `LMSTUDIO_MODEL`, `STORY_PATH`, `NPC_DIR` and
    /// `SUMMARIZE_LORE`, falling back to defaults if not set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_base: lookup("LMSTUDIO_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            model: lookup("LMSTUDIO_MODEL").unwrap_or(defaults.model),
            story_path: lookup("STORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.story_path),
            npc_dir: lookup("NPC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.npc_dir),
            summarize_lore: lookup("SUMMARIZE_LORE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.summarize_lore),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }

    #[test]
    fn reads_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LMSTUDIO_API_BASE", "http://gpu-box:8080/v1/"),
            ("LMSTUDIO_MODEL", "llama-3"),
            ("NPC_DIR", "/tmp/npcs"),
            ("SUMMARIZE_LORE", "Yes"),
        ]);
        let cfg = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.api_base, "http://gpu-box:8080/v1");
        assert_eq!(cfg.model, "llama-3");
        assert_eq!(cfg.npc_dir, PathBuf::from("/tmp/npcs"));
        assert_eq!(cfg.story_path, PathBuf::from(DEFAULT_STORY_PATH));
        assert!(cfg.summarize_lore);
    }

    #[test]
    fn unknown_flag_value_is_off() {
        assert!(!parse_flag("maybe"));
        assert!(parse_flag(" on "));
    }
}
