// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status line for saving and sharing.
//!
//! Shows what happened to the last save and offers the stored image's
//! signed link.

/// Outcome of the most recent save or export.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Ready,
    Saving,
    Saved { path: String, url: String },
    NothingToSave,
    /// Upload failed; the drawing is still on screen.
    Failed { reason: String, placeholder: String },
    Exported(std::path::PathBuf),
}

/// Result of status line interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAction {
    None,
    RefreshLink(String),
}

/// Display the status line.
pub fn show(ui: &mut egui::Ui, status: &SaveStatus, emotion_count: usize) -> StatusAction {
    let mut action = StatusAction::None;

    ui.horizontal(|ui| {
        match status {
            SaveStatus::Ready => {
                ui.label(format!("Emotions in this jar: {}", emotion_count));
            }
            SaveStatus::Saving => {
                ui.spinner();
                ui.label("Saving your jar...");
            }
            SaveStatus::Saved { path, url } => {
                ui.label(egui::RichText::new("Saved ✔").color(egui::Color32::DARK_GREEN));
                ui.separator();
                ui.hyperlink_to("Open image", url.as_str());
                if ui.button("Copy link").clicked() {
                    ui.ctx().copy_text(url.clone());
                }
                if ui.button("Refresh link").clicked() {
                    action = StatusAction::RefreshLink(path.clone());
                }
            }
            SaveStatus::NothingToSave => {
                ui.label(egui::RichText::new("Nothing to save yet").weak());
            }
            SaveStatus::Failed { reason, placeholder } => {
                ui.label(
                    egui::RichText::new("Couldn't save right now, your jar is still here")
                        .color(egui::Color32::DARK_RED),
                )
                .on_hover_text(reason.as_str());
                ui.separator();
                ui.label(egui::RichText::new(placeholder.as_str()).weak());
            }
            SaveStatus::Exported(path) => {
                ui.label(format!("Exported to {}", path.display()));
            }
        }
    });

    action
}
