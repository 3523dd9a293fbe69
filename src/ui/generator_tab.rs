use eframe::egui;
use std::fs;
use std::path::PathBuf;

use crate::engine::protocol::EngineCommand;
use crate::model::npc::NpcRecord;
use super::app::{npc_sheet, MyApp};

pub fn draw(ui: &mut egui::Ui, app: &mut MyApp) {
    ui.heading("Generate a new NPC");

    ui.label("Character request");
    ui.add(
        egui::TextEdit::multiline(&mut app.ui.npc_request)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        let can_generate = !app.ui.generating && !app.ui.npc_request.trim().is_empty();
        if ui
            .add_enabled(can_generate, egui::Button::new("Generate NPC"))
            .clicked()
        {
            app.ui.generating = true;
            app.ui.generator_status = None;
            app.send(EngineCommand::GenerateNpc(app.ui.npc_request.trim().to_string()));
        }
        if app.ui.generating {
            ui.spinner();
        }
    });

    if let Some(status) = &app.ui.generator_status {
        ui.label(status);
    }

    let Some(npc) = app.ui.last_npc.clone() else {
        return;
    };

    ui.separator();
    ui.strong(&npc.name);
    npc_sheet(ui, &npc);

    ui.collapsing("JSON", |ui| match npc.to_export_json() {
        Ok(json) => {
            ui.add(
                egui::TextEdit::multiline(&mut json.as_str())
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
        }
        Err(e) => {
            ui.colored_label(egui::Color32::LIGHT_RED, e.to_string());
        }
    });

    ui.horizontal(|ui| {
        if ui
            .button(format!("💾 Save to {}", app.npc_dir.display()))
            .clicked()
        {
            app.send(EngineCommand::SaveNpc(npc.clone()));
        }

        if ui.button("📥 Download NPC JSON…").clicked() {
            app.ui.generator_status = match export_with_dialog(&npc) {
                Ok(Some(path)) => Some(format!("✔ Exported to {}", path.display())),
                Ok(None) => None,
                Err(e) => Some(format!("❌ {e:#}")),
            };
        }
    });
}

fn export_with_dialog(npc: &NpcRecord) -> anyhow::Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(npc.export_file_name())
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return Ok(None);
    };

    fs::write(&path, npc.to_export_json()?)?;
    tracing::info!(name = %npc.name, path = %path.display(), "exported NPC");
    Ok(Some(path))
}
