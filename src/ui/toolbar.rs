// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the emotion palette and jar actions.

use crate::drawing::palette::{Emotion, Palette};
use crate::ui::canvas::to_color32;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    SelectEmotion(Emotion),
    Clear,
    Save,
}

const SWATCH_SIZE: f32 = 22.0;

/// Display the palette and the clear/save buttons.
pub fn show(ui: &mut egui::Ui, palette: &Palette, used: &[Emotion], saving: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let active = palette.active().emotion;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;
        ui.label("How are you feeling?");
        ui.separator();

        for entry in palette.entries() {
            let (rect, swatch) =
                ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), egui::Sense::click());
            let painter = ui.painter();
            painter.rect_filled(rect, 4.0, to_color32(entry.color));
            if entry.emotion == active {
                painter.rect_stroke(rect.expand(2.0), 5.0, egui::Stroke::new(2.0, egui::Color32::BLACK));
            }

            let mut name = egui::RichText::new(entry.emotion.name());
            if used.contains(&entry.emotion) {
                name = name.strong();
            }
            let label = ui.selectable_label(entry.emotion == active, name);

            if swatch.clicked() || label.clicked() {
                action = ToolbarAction::SelectEmotion(entry.emotion);
            }
        }

        ui.separator();

        if ui.button("🗑 New jar").clicked() {
            action = ToolbarAction::Clear;
        }
        let save = ui.add_enabled(!saving, egui::Button::new("💾 Save jar"));
        if save.clicked() {
            action = ToolbarAction::Save;
        }
    });

    action
}
