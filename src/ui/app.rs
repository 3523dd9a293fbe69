use eframe::egui;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crate::engine::engine::Engine;
use crate::engine::protocol::{DuoKey, EngineCommand, EngineResponse};
use crate::model::message::Message;
use crate::model::npc::NpcRecord;
use crate::ui::settings::{self, UiSettings};
use crate::ui::settings_io::{load_settings, save_settings};
use crate::ui::{duo_tab, generator_tab, lore_tab, solo_tab};

/* =========================
   Tabs
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Lore,
    Generator,
    Solo,
    Duo,
}

/* =========================
   UI State
   ========================= */

pub struct UiState {
    pub tab: Tab,
    pub show_settings: bool,

    // Story Q&A
    pub question: String,
    pub answer: Option<Result<String, String>>,
    pub asking: bool,

    // NPC generator
    pub npc_request: String,
    pub last_npc: Option<NpcRecord>,
    pub generating: bool,
    pub generator_status: Option<String>,

    // NPCs loaded from disk
    pub npcs: BTreeMap<String, NpcRecord>,
    pub npcs_error: Option<String>,
    pub loading_npcs: bool,

    // One-on-one chat, history per NPC name
    pub solo_npc: Option<String>,
    pub solo_input: String,
    pub solo_histories: HashMap<String, Vec<Message>>,
    pub solo_waiting: Option<String>,
    pub solo_error: Option<String>,

    // NPC vs NPC, transcript per pair
    pub duo_npc1: Option<String>,
    pub duo_npc2: Option<String>,
    pub duo_context: String,
    pub duo_histories: HashMap<DuoKey, Vec<Message>>,
    pub duo_waiting: Option<DuoKey>,
    pub duo_error: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            show_settings: false,

            question: "Who are the main factions?".into(),
            answer: None,
            asking: false,

            npc_request: "Create a noble warrior from the ironhold clans.".into(),
            last_npc: None,
            generating: false,
            generator_status: None,

            npcs: BTreeMap::new(),
            npcs_error: None,
            loading_npcs: false,

            solo_npc: None,
            solo_input: String::new(),
            solo_histories: HashMap::new(),
            solo_waiting: None,
            solo_error: None,

            duo_npc1: None,
            duo_npc2: None,
            duo_context: "They meet in a tavern and talk about their adventures over beer.".into(),
            duo_histories: HashMap::new(),
            duo_waiting: None,
            duo_error: None,
        }
    }
}

impl UiState {
    fn is_busy(&self) -> bool {
        self.asking
            || self.generating
            || self.loading_npcs
            || self.solo_waiting.is_some()
            || self.duo_waiting.is_some()
    }

    fn apply_response(&mut self, resp: EngineResponse) -> Option<EngineCommand> {
        match resp {
            EngineResponse::Answer(result) => {
                self.asking = false;
                self.answer = Some(result);
            }

            EngineResponse::NpcGenerated(result) => {
                self.generating = false;
                match result {
                    Ok(npc) => {
                        self.generator_status = None;
                        self.last_npc = Some(npc);
                    }
                    Err(e) => self.generator_status = Some(format!("❌ {e}")),
                }
            }

            EngineResponse::NpcSaved(result) => match result {
                Ok(path) => {
                    self.generator_status = Some(format!("✔ Saved to {}", path.display()));
                    self.loading_npcs = true;
                    return Some(EngineCommand::ReloadNpcs);
                }
                Err(e) => self.generator_status = Some(format!("❌ {e}")),
            },

            EngineResponse::NpcsLoaded(result) => {
                self.loading_npcs = false;
                match result {
                    Ok(npcs) => {
                        self.npcs = npcs;
                        self.npcs_error = None;
                    }
                    Err(e) => {
                        self.npcs.clear();
                        self.npcs_error = Some(e);
                    }
                }
                self.drop_stale_selections();
            }

            EngineResponse::NpcReply {
                npc_name,
                input,
                result,
            } => {
                self.solo_waiting = None;
                match result {
                    Ok(reply) => {
                        self.solo_error = None;
                        let history = self.solo_histories.entry(npc_name).or_default();
                        history.push(Message::user(input));
                        history.push(Message::assistant(reply));
                    }
                    Err(e) => self.solo_error = Some(e),
                }
            }

            EngineResponse::DuoTurn { key, result } => {
                self.duo_waiting = None;
                match result {
                    Ok((speaker, text)) => {
                        self.duo_error = None;
                        self.duo_histories
                            .entry(key)
                            .or_default()
                            .push(Message::new(speaker, text));
                    }
                    Err(e) => self.duo_error = Some(e),
                }
            }
        }

        None
    }

    fn drop_stale_selections(&mut self) {
        for selected in [&mut self.solo_npc, &mut self.duo_npc1, &mut self.duo_npc2] {
            if selected.as_ref().is_some_and(|n| !self.npcs.contains_key(n)) {
                *selected = None;
            }
        }
    }
}

/* =========================
   App
   ========================= */

pub struct MyApp {
    pub ui: UiState,
    pub settings: UiSettings,
    pub npc_dir: PathBuf,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl MyApp {
    pub fn new(engine: Engine, npc_dir: PathBuf) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            engine.run(cmd_rx, resp_tx);
        });

        let mut app = Self {
            ui: UiState::default(),
            settings: load_settings(),
            npc_dir,
            cmd_tx,
            resp_rx,
        };
        app.reload_npcs();
        app
    }

    /// Ask the engine to re-read the NPC directory.
    pub fn reload_npcs(&mut self) {
        self.ui.loading_npcs = true;
        self.send(EngineCommand::ReloadNpcs);
    }

    pub fn send(&self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("engine thread is gone, command dropped");
        }
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        let mut changed = false;

        egui::Window::new("Appearance")
            .open(&mut self.ui.show_settings)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("UI Scale");
                changed |= ui
                    .add(egui::Slider::new(&mut self.settings.ui_scale, 0.75..=2.0))
                    .changed();

                ui.separator();
                for (key, label) in [
                    (settings::USER, "You"),
                    (settings::NPC, "NPC"),
                    (settings::NPC1, "First NPC"),
                    (settings::NPC2, "Second NPC"),
                    (settings::CONTEXT, "Context"),
                ] {
                    let mut color = self.settings.color(key);
                    ui.horizontal(|ui| {
                        if ui.color_edit_button_srgba(&mut color).changed() {
                            self.settings.set_color(key, color);
                            changed = true;
                        }
                        ui.label(label);
                    });
                }
            });

        if changed {
            save_settings(&self.settings);
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            if let Some(follow_up) = self.ui.apply_response(resp) {
                self.send(follow_up);
            }
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.ui.tab, Tab::Lore, "📖 Story Q&A");
                ui.selectable_value(&mut self.ui.tab, Tab::Generator, "🧙 NPC Generator");
                ui.selectable_value(&mut self.ui.tab, Tab::Solo, "💬 Talk with NPC");
                ui.selectable_value(&mut self.ui.tab, Tab::Duo, "⚔ AI vs AI");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").clicked() {
                        self.ui.show_settings = !self.ui.show_settings;
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.ui.tab {
            Tab::Lore => lore_tab::draw(ui, self),
            Tab::Generator => generator_tab::draw(ui, self),
            Tab::Solo => solo_tab::draw(ui, self),
            Tab::Duo => duo_tab::draw(ui, self),
        });

        if self.ui.show_settings {
            self.draw_settings_window(ctx);
        }

        if self.ui.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/* =========================
   UI Helpers
   ========================= */

pub fn bubble(ui: &mut egui::Ui, color: egui::Color32, meta: Option<&str>, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(8)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            if let Some(meta) = meta {
                ui.label(egui::RichText::new(meta).small().color(egui::Color32::LIGHT_GRAY));
            }
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
    ui.add_space(6.0);
}

pub fn npc_picker(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    selected: &mut Option<String>,
    npcs: &BTreeMap<String, NpcRecord>,
) {
    if selected.is_none() {
        *selected = npcs.keys().next().cloned();
    }

    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.clone().unwrap_or_default())
        .show_ui(ui, |ui| {
            for name in npcs.keys() {
                ui.selectable_value(selected, Some(name.clone()), name);
            }
        });
}

pub fn npc_sheet(ui: &mut egui::Ui, npc: &NpcRecord) {
    egui::Grid::new(("npc_sheet", &npc.name))
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Faction");
            ui.label(&npc.faction);
            ui.end_row();
            ui.label("Profession");
            ui.label(&npc.profession);
            ui.end_row();
            ui.label("Traits");
            ui.label(npc.traits_joined());
            ui.end_row();
            ui.label("Backstory");
            ui.label(&npc.backstory_short);
            ui.end_row();
        });
}

pub fn error_label(ui: &mut egui::Ui, error: &Option<String>) {
    if let Some(e) = error {
        ui.colored_label(egui::Color32::LIGHT_RED, e);
    }
}
