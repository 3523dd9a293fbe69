use eframe::egui;

use crate::engine::protocol::{DuoKey, EngineCommand};
use crate::model::message::{Message, Speaker};
use crate::ui::settings;
use super::app::{bubble, error_label, npc_picker, MyApp};

pub fn draw(ui: &mut egui::Ui, app: &mut MyApp) {
    ui.heading("AI talks to AI");

    if ui.button("🔄 Reload NPCs").clicked() {
        app.reload_npcs();
    }
    error_label(ui, &app.ui.npcs_error);

    if app.ui.npcs.len() < 2 {
        ui.label(format!(
            "You need at least 2 NPC JSON files in the {}/ directory.",
            app.npc_dir.display()
        ));
        return;
    }

    ui.columns(2, |cols| {
        npc_picker(
            &mut cols[0],
            "duo_npc1",
            "Choose first NPC:",
            &mut app.ui.duo_npc1,
            &app.ui.npcs,
        );
        npc_picker(
            &mut cols[1],
            "duo_npc2",
            "Choose second NPC:",
            &mut app.ui.duo_npc2,
            &app.ui.npcs,
        );
    });

    let (Some(npc1), Some(npc2)) = (
        app.ui.duo_npc1.as_ref().and_then(|n| app.ui.npcs.get(n)).cloned(),
        app.ui.duo_npc2.as_ref().and_then(|n| app.ui.npcs.get(n)).cloned(),
    ) else {
        return;
    };
    let key = DuoKey::new(&npc1.name, &npc2.name);

    ui.label("Initial situation/context:");
    ui.add(
        egui::TextEdit::multiline(&mut app.ui.duo_context)
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );

    let waiting = app.ui.duo_waiting.is_some();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!waiting, egui::Button::new("Start new conversation"))
            .clicked()
        {
            app.ui.duo_error = None;
            app.ui.duo_histories.insert(
                key.clone(),
                vec![Message::context(app.ui.duo_context.trim())],
            );
        }

        if let Some(history) = app.ui.duo_histories.get(&key) {
            if ui.add_enabled(!waiting, egui::Button::new("Next turn")).clicked() {
                app.send(EngineCommand::NextDuoTurn {
                    key: key.clone(),
                    npc1: npc1.clone(),
                    npc2: npc2.clone(),
                    history: history.clone(),
                });
                app.ui.duo_waiting = Some(key.clone());
            }
        }

        if waiting {
            ui.spinner();
        }
    });
    error_label(ui, &app.ui.duo_error);

    let Some(history) = app.ui.duo_histories.get(&key) else {
        return;
    };

    ui.separator();
    egui::ScrollArea::vertical()
        .id_salt("duo_history")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for msg in history.iter().rev() {
                match msg.role {
                    Speaker::Npc1 => bubble(
                        ui,
                        app.settings.color(settings::NPC1),
                        Some(&npc1.name),
                        &msg.content,
                    ),
                    Speaker::Npc2 => bubble(
                        ui,
                        app.settings.color(settings::NPC2),
                        Some(&npc2.name),
                        &msg.content,
                    ),
                    Speaker::Context => bubble(
                        ui,
                        app.settings.color(settings::CONTEXT),
                        None,
                        &format!("📜 {}", msg.content),
                    ),
                    _ => {}
                }
            }
        });
}
