use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::message::Speaker;
use crate::ui::settings;
use super::app::{bubble, error_label, npc_picker, npc_sheet, MyApp};

pub fn draw(ui: &mut egui::Ui, app: &mut MyApp) {
    ui.heading("Talk with an NPC");

    if ui.button("🔄 Reload NPCs").clicked() {
        app.reload_npcs();
    }
    error_label(ui, &app.ui.npcs_error);

    if app.ui.npcs.is_empty() {
        ui.label(format!(
            "No NPCs found in the {}/ directory. Generate one, save it there, and reload.",
            app.npc_dir.display()
        ));
        return;
    }

    npc_picker(
        ui,
        "solo_npc",
        "Choose an NPC to talk to:",
        &mut app.ui.solo_npc,
        &app.ui.npcs,
    );

    let Some(npc) = app
        .ui
        .solo_npc
        .as_ref()
        .and_then(|name| app.ui.npcs.get(name))
        .cloned()
    else {
        return;
    };

    ui.collapsing(format!("Talking with {}", npc.name), |ui| npc_sheet(ui, &npc));
    ui.separator();

    let waiting = app.ui.solo_waiting.is_some();
    let input_id = egui::Id::new("solo_input");
    let mut send_now = false;

    ui.horizontal(|ui| {
        let response = ui.add_sized(
            [ui.available_width() - 60.0, 24.0],
            egui::TextEdit::singleline(&mut app.ui.solo_input)
                .id(input_id)
                .hint_text("Type your message..."),
        );

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send_now = true;
        }
        if ui.add_enabled(!waiting, egui::Button::new("Send")).clicked() {
            send_now = true;
        }
    });

    if send_now && !waiting {
        let text = app.ui.solo_input.trim().to_string();
        if !text.is_empty() {
            let history = app
                .ui
                .solo_histories
                .get(&npc.name)
                .cloned()
                .unwrap_or_default();

            app.ui.solo_waiting = Some(npc.name.clone());
            app.ui.solo_error = None;
            app.send(EngineCommand::TalkToNpc {
                npc: npc.clone(),
                history,
                input: text,
            });
            app.ui.solo_input.clear();
        }
        ui.memory_mut(|m| m.request_focus(input_id));
    }

    if waiting {
        ui.spinner();
    }
    error_label(ui, &app.ui.solo_error);

    let Some(history) = app.ui.solo_histories.get(&npc.name) else {
        return;
    };

    egui::ScrollArea::vertical()
        .id_salt("solo_history")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // newest first
            for msg in history.iter().rev() {
                if msg.role == Speaker::User {
                    bubble(ui, app.settings.color(settings::USER), Some("You"), &msg.content);
                } else {
                    bubble(ui, app.settings.color(settings::NPC), Some(&npc.name), &msg.content);
                }
            }
        });
}
