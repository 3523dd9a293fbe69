use eframe::egui;

use crate::engine::protocol::EngineCommand;
use super::app::MyApp;

pub fn draw(ui: &mut egui::Ui, app: &mut MyApp) {
    ui.heading("Ask about the story world");

    ui.label("Your question");
    ui.add(
        egui::TextEdit::multiline(&mut app.ui.question)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        let can_ask = !app.ui.asking && !app.ui.question.trim().is_empty();
        if ui.add_enabled(can_ask, egui::Button::new("Ask")).clicked() {
            app.ui.asking = true;
            app.ui.answer = None;
            app.send(EngineCommand::AskQuestion(app.ui.question.trim().to_string()));
        }
        if app.ui.asking {
            ui.spinner();
        }
    });

    ui.separator();

    match &app.ui.answer {
        Some(Ok(answer)) => {
            ui.strong("Answer:");
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(answer);
            });
        }
        Some(Err(e)) => {
            ui.colored_label(egui::Color32::LIGHT_RED, e);
        }
        None => {}
    }
}
