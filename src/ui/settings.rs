use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

pub const USER: &str = "user";
pub const NPC: &str = "npc";
pub const NPC1: &str = "npc1";
pub const NPC2: &str = "npc2";
pub const CONTEXT: &str = "context";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UiSettings {
    pub ui_scale: f32,

    // Bubble key -> color
    #[serde(default)]
    pub speaker_colors: HashMap<String, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut speaker_colors = HashMap::new();

        speaker_colors.insert(USER.into(), [35, 79, 49, 255]);
        speaker_colors.insert(NPC.into(), [40, 40, 44, 255]);
        speaker_colors.insert(NPC1.into(), [40, 70, 120, 255]);
        speaker_colors.insert(NPC2.into(), [120, 80, 40, 255]);
        speaker_colors.insert(CONTEXT.into(), [80, 80, 80, 255]);

        Self {
            ui_scale: 1.0,
            speaker_colors,
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.speaker_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::DARK_GRAY)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.speaker_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_color_round_trips() {
        let mut s = UiSettings::default();
        s.set_color(NPC1, Color32::from_rgb(1, 2, 3));
        assert_eq!(s.color(NPC1), Color32::from_rgb(1, 2, 3));
    }

    #[test]
    fn unknown_key_falls_back() {
        assert_eq!(UiSettings::default().color("ghost"), Color32::DARK_GRAY);
    }
}
