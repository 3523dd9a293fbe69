/// The static world text plus an optional condensed version of it.
#[derive(Debug, Clone)]
pub struct WorldLore {
    pub text: String,
    pub summary: Option<String>,
}

impl WorldLore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// What persona blocks embed as background.
    pub fn background(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_prefers_summary() {
        let lore = WorldLore::new("long text");
        assert_eq!(lore.background(), "long text");
        let lore = lore.with_summary("short");
        assert_eq!(lore.background(), "short");
        assert_eq!(lore.text, "long text");
    }
}
