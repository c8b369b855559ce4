// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the mood jar activity: the drawing adapter and canvas,
//! the emotion palette, and the background jobs that export or upload the
//! finished drawing. Storage clients are injected from `main`.

use crate::config::AppConfig;
use crate::drawing::input::PointerAdapter;
use crate::drawing::jar::JarCanvas;
use crate::drawing::palette::{Emotion, Palette};
use crate::drawing::serializer;
use crate::io::media;
use crate::models::entry::JarEntry;
use crate::storage::urls::{SignedUrlCache, UrlPolicy};
use crate::storage::{Backend, ObjectKind, UploadRequest};
use crate::ui::status::{SaveStatus, StatusAction};
use crate::ui::{canvas, status, toolbar};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

/// Result of a background save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { path: String, url: String },
    NothingToSave,
    Failed { reason: String, placeholder: String },
}

/// Everything a save job needs, detached from the UI thread.
#[derive(Clone)]
pub struct SaveContext {
    pub backend: Backend,
    pub urls: Arc<Mutex<SignedUrlCache>>,
    pub owner_id: String,
    pub bucket: String,
    pub placeholder: String,
}

/// Encode, upload, record and sign one jar drawing.
///
/// Runs on a worker thread. Only the upload is required to succeed; a
/// failed entry insert is logged and a failed signature falls back to the
/// placeholder image.
pub fn save_jar(snapshot: Option<RgbaImage>, emotions: Vec<Emotion>, ctx: &SaveContext) -> SaveOutcome {
    let Some(png) = snapshot.as_ref().and_then(serializer::encode_image) else {
        log::info!("Nothing to save");
        return SaveOutcome::NothingToSave;
    };

    let upload = UploadRequest {
        bucket: &ctx.bucket,
        owner_id: &ctx.owner_id,
        blob: &png,
        kind: ObjectKind::MoodJar,
    };
    let path = match ctx.backend.objects.upload(&upload) {
        Ok(path) => path,
        Err(e) => {
            log::error!("Failed to upload jar: {}", e);
            return SaveOutcome::Failed {
                reason: e.to_string(),
                placeholder: ctx.placeholder.clone(),
            };
        }
    };

    let entry = JarEntry::new(ctx.owner_id.clone(), path.clone(), emotions);
    if let Err(e) = ctx.backend.rows.insert_entry(&entry) {
        log::warn!("Saved image but failed to record entry {}: {}", entry.id, e);
    }

    let url = match ctx.urls.lock() {
        Ok(mut urls) => urls.get(&path),
        Err(_) => {
            log::error!("Signed URL cache is poisoned");
            ctx.placeholder.clone()
        }
    };

    log::info!("Saved jar to {}", path);
    SaveOutcome::Saved { path, url }
}

/// Main application state.
pub struct MoodJarApp {
    config: AppConfig,

    /// Storage clients and URL cache shared with save jobs
    save_context: SaveContext,

    palette: Palette,

    /// Input adapter owning the jar canvas for the lifetime of the activity
    adapter: PointerAdapter<JarCanvas>,

    canvas_input: canvas::CanvasInput,
    texture: canvas::CanvasTexture,

    status: SaveStatus,

    /// Receiver for the in-flight save
    save_job: Option<Receiver<SaveOutcome>>,

    /// Receiver for the in-flight signed link refresh
    link_job: Option<Receiver<(String, String)>>,

    /// Destination and receiver for the in-flight PNG export
    export_job: Option<(PathBuf, Receiver<Option<Vec<u8>>>)>,
}

impl MoodJarApp {
    /// Create the application around an already connected backend.
    pub fn new(config: AppConfig, backend: Backend) -> Self {
        let urls = SignedUrlCache::new(
            backend.objects.clone(),
            UrlPolicy {
                bucket: config.bucket.clone(),
                expiry_seconds: config.url_expiry_secs,
                refresh_margin: config.refresh_margin(),
                placeholder: config.placeholder_image.clone(),
            },
        );
        let save_context = SaveContext {
            backend,
            urls: Arc::new(Mutex::new(urls)),
            owner_id: config.owner_id.clone(),
            bucket: config.bucket.clone(),
            placeholder: config.placeholder_image.clone(),
        };

        let mut palette = Palette::new();
        palette.on_selection_changed(|color, name| {
            log::info!("Selected {} ({})", name, color);
        });

        let (width, height) = config.canvas_dimensions();
        let mut jar = JarCanvas::new(width, height, config.brush);
        jar.set_ink(palette.active());

        Self {
            config,
            save_context,
            palette,
            adapter: PointerAdapter::attach(jar),
            canvas_input: canvas::CanvasInput::default(),
            texture: canvas::CanvasTexture::default(),
            status: SaveStatus::Ready,
            save_job: None,
            link_job: None,
            export_job: None,
        }
    }

    fn select_emotion(&mut self, emotion: Emotion) {
        self.palette.select(emotion);
        self.adapter.callbacks_mut().set_ink(self.palette.active());
    }

    /// Start over with an empty jar.
    fn clear_jar(&mut self) {
        self.adapter.end_session();
        let (width, height) = self.config.canvas_dimensions();
        self.adapter.callbacks_mut().clear(width, height);
        self.status = SaveStatus::Ready;
        log::info!("Started a new jar");
    }

    /// Upload the current drawing in the background.
    fn start_save(&mut self) {
        if self.save_job.is_some() {
            return;
        }
        self.adapter.end_session();

        let jar = self.adapter.callbacks();
        let snapshot = Some(jar.snapshot());
        let emotions = jar.emotions_used().to_vec();
        let ctx = self.save_context.clone();

        let (sender, receiver) = channel();
        self.save_job = Some(receiver);
        self.status = SaveStatus::Saving;

        std::thread::spawn(move || {
            let outcome = save_jar(snapshot, emotions, &ctx);
            let _ = sender.send(outcome);
        });
    }

    /// Ask for a fresh signed link to a saved drawing.
    fn refresh_link(&mut self, path: String) {
        if self.link_job.is_some() {
            return;
        }
        let urls = self.save_context.urls.clone();
        let placeholder = self.save_context.placeholder.clone();

        let (sender, receiver) = channel();
        self.link_job = Some(receiver);

        std::thread::spawn(move || {
            let url = match urls.lock() {
                Ok(mut urls) => urls.get(&path),
                Err(_) => placeholder,
            };
            let _ = sender.send((path, url));
        });
    }

    /// Write the current drawing to a local PNG file.
    fn export_png(&mut self, path: PathBuf) {
        let snapshot = self.adapter.callbacks().snapshot();
        let receiver = serializer::encode_in_background(Some(snapshot));
        self.export_job = Some((media::with_png_extension(path), receiver));
    }

    fn save_settings(&self, path: PathBuf) {
        match self.config.save(&path) {
            Ok(()) => log::info!("Saved settings to {}", path.display()),
            Err(e) => log::error!("Failed to save settings: {:#}", e),
        }
    }

    /// Collect results from finished background jobs.
    ///
    /// A worker that dies without reporting still clears its job, so the
    /// save controls never stay disabled.
    fn poll_jobs(&mut self) {
        if let Some(ref receiver) = self.save_job {
            match receiver.try_recv() {
                Ok(outcome) => {
                    self.save_job = None;
                    self.status = match outcome {
                        SaveOutcome::Saved { path, url } => SaveStatus::Saved { path, url },
                        SaveOutcome::NothingToSave => SaveStatus::NothingToSave,
                        SaveOutcome::Failed { reason, placeholder } => {
                            SaveStatus::Failed { reason, placeholder }
                        }
                    };
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::error!("Save worker stopped without reporting a result");
                    self.save_job = None;
                    self.status = SaveStatus::Failed {
                        reason: "save was interrupted".to_string(),
                        placeholder: self.save_context.placeholder.clone(),
                    };
                }
            }
        }

        if let Some(ref receiver) = self.link_job {
            match receiver.try_recv() {
                Ok((path, url)) => {
                    self.link_job = None;
                    if let SaveStatus::Saved { path: ref shown, .. } = self.status {
                        if *shown == path {
                            self.status = SaveStatus::Saved { path, url };
                        }
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Link refresh stopped without reporting a result");
                    self.link_job = None;
                }
            }
        }

        if let Some((ref path, ref receiver)) = self.export_job {
            match receiver.try_recv() {
                Ok(encoded) => {
                    let path = path.clone();
                    self.export_job = None;
                    match encoded {
                        Some(bytes) => match media::save_png(&bytes, &path) {
                            Ok(()) => {
                                log::info!("Exported jar to {}", path.display());
                                self.status = SaveStatus::Exported(path);
                            }
                            Err(e) => log::error!("Failed to export jar: {:#}", e),
                        },
                        None => self.status = SaveStatus::NothingToSave,
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::error!("Export of {} stopped before encoding finished", path.display());
                    self.export_job = None;
                }
            }
        }
    }

    fn busy(&self) -> bool {
        self.save_job.is_some() || self.link_job.is_some() || self.export_job.is_some()
    }
}

impl eframe::App for MoodJarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs();

        // Keep polling while background work is running
        if self.busy() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Export PNG...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("PNG image", &["png"])
                            .set_file_name("mood-jar.png")
                            .save_file()
                        {
                            self.export_png(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Save Settings...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Settings", &["yaml", "yml", "json"])
                            .set_file_name("moodjar.yaml")
                            .save_file()
                        {
                            self.save_settings(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Jar", |ui| {
                    if ui.button("New Jar").clicked() {
                        self.clear_jar();
                        ui.close_menu();
                    }
                    let can_save = self.save_job.is_none();
                    if ui.add_enabled(can_save, egui::Button::new("Save Jar (Ctrl+S)")).clicked() {
                        self.start_save();
                        ui.close_menu();
                    }
                });
            });
        });

        // Palette and actions
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &self.palette,
                    self.adapter.callbacks().emotions_used(),
                    self.save_job.is_some(),
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::SelectEmotion(emotion) => self.select_emotion(emotion),
            toolbar::ToolbarAction::Clear => self.clear_jar(),
            toolbar::ToolbarAction::Save => self.start_save(),
            toolbar::ToolbarAction::None => {}
        }

        // Save shortcut
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.start_save();
        }

        // Status line
        let status_action = egui::TopBottomPanel::bottom("status")
            .show(ctx, |ui| {
                status::show(ui, &self.status, self.adapter.callbacks().emotions_used().len())
            })
            .inner;

        if let StatusAction::RefreshLink(path) = status_action {
            self.refresh_link(path);
        }

        // Drawing canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                canvas::show(ui, &mut self.adapter, &mut self.canvas_input, &mut self.texture);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::jar::BrushSettings;
    use crate::drawing::raster::Surface;
    use crate::storage::local::LocalStore;
    use crate::storage::{ObjectStore, RowStore, SignRequest, SignedUrl, StorageError};

    struct OfflineStore;

    impl ObjectStore for OfflineStore {
        fn upload(&self, _request: &UploadRequest<'_>) -> Result<String, StorageError> {
            Err(StorageError::Rejected {
                status: 503,
                body: "offline".to_string(),
            })
        }

        fn signed_url(&self, request: &SignRequest<'_>) -> Result<SignedUrl, StorageError> {
            Err(StorageError::NotFound(request.path.to_string()))
        }
    }

    impl RowStore for OfflineStore {
        fn insert_entry(&self, _entry: &JarEntry) -> Result<(), StorageError> {
            Err(StorageError::Rejected {
                status: 503,
                body: "offline".to_string(),
            })
        }
    }

    fn context(backend: Backend) -> SaveContext {
        let urls = SignedUrlCache::new(
            backend.objects.clone(),
            UrlPolicy {
                bucket: "activities".to_string(),
                expiry_seconds: 3600,
                refresh_margin: chrono::Duration::seconds(60),
                placeholder: "placeholder.png".to_string(),
            },
        );
        SaveContext {
            backend,
            urls: Arc::new(Mutex::new(urls)),
            owner_id: "teen-1".to_string(),
            bucket: "activities".to_string(),
            placeholder: "placeholder.png".to_string(),
        }
    }

    fn snapshot() -> Option<RgbaImage> {
        let jar: JarCanvas<Surface> = JarCanvas::new(40, 40, BrushSettings::default());
        Some(jar.snapshot())
    }

    #[test]
    fn test_save_uploads_records_and_signs() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalStore::new(dir.path().to_path_buf()));
        let ctx = context(Backend {
            objects: store.clone(),
            rows: store,
        });

        let (path, url) = match save_jar(snapshot(), vec![Emotion::Calm], &ctx) {
            SaveOutcome::Saved { path, url } => (path, url),
            other => panic!("expected a saved outcome, got {:?}", other),
        };

        assert!(path.starts_with("teen-1/mood-jars/"));
        assert!(url.starts_with("file://"));
        let bytes = std::fs::read(dir.path().join("activities").join(&path)).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");

        let rows = std::fs::read_to_string(dir.path().join("rows").join("mood_jar_entries.jsonl")).unwrap();
        let entry: JarEntry = serde_json::from_str(rows.trim()).unwrap();
        assert_eq!(entry.image_path, path);
        assert_eq!(entry.emotions, vec![Emotion::Calm]);
    }

    #[test]
    fn test_missing_snapshot_is_nothing_to_save() {
        let ctx = context(Backend {
            objects: Arc::new(OfflineStore),
            rows: Arc::new(OfflineStore),
        });
        assert_eq!(save_jar(None, Vec::new(), &ctx), SaveOutcome::NothingToSave);
    }

    #[test]
    fn test_upload_failure_falls_back_to_placeholder() {
        let ctx = context(Backend {
            objects: Arc::new(OfflineStore),
            rows: Arc::new(OfflineStore),
        });

        match save_jar(snapshot(), Vec::new(), &ctx) {
            SaveOutcome::Failed { reason, placeholder } => {
                assert!(reason.contains("503"));
                assert_eq!(placeholder, "placeholder.png");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_row_failure_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(Backend {
            objects: Arc::new(LocalStore::new(dir.path().to_path_buf())),
            rows: Arc::new(OfflineStore),
        });

        assert!(matches!(
            save_jar(snapshot(), vec![Emotion::Happy], &ctx),
            SaveOutcome::Saved { .. }
        ));
    }

    fn local_app(root: &std::path::Path) -> MoodJarApp {
        let config = AppConfig {
            canvas_size: [40, 40],
            placeholder_image: "placeholder.png".to_string(),
            ..AppConfig::default()
        };
        let store = Arc::new(LocalStore::new(root.to_path_buf()));
        MoodJarApp::new(
            config,
            Backend {
                objects: store.clone(),
                rows: store,
            },
        )
    }

    #[test]
    fn test_dead_workers_release_their_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(dir.path());

        let (save_sender, save_receiver) = channel::<SaveOutcome>();
        let (link_sender, link_receiver) = channel::<(String, String)>();
        let (export_sender, export_receiver) = channel::<Option<Vec<u8>>>();
        drop(save_sender);
        drop(link_sender);
        drop(export_sender);

        app.save_job = Some(save_receiver);
        app.link_job = Some(link_receiver);
        app.export_job = Some((dir.path().join("jar.png"), export_receiver));
        app.status = SaveStatus::Saving;

        app.poll_jobs();

        assert!(!app.busy());
        match &app.status {
            SaveStatus::Failed { placeholder, .. } => assert_eq!(placeholder, "placeholder.png"),
            other => panic!("expected a failed status, got {:?}", other),
        }
        assert!(app.save_job.is_none());
    }

    #[test]
    fn test_pending_save_stays_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(dir.path());

        let (sender, receiver) = channel::<SaveOutcome>();
        app.save_job = Some(receiver);
        app.status = SaveStatus::Saving;

        app.poll_jobs();
        assert!(app.save_job.is_some());
        assert_eq!(app.status, SaveStatus::Saving);

        sender.send(SaveOutcome::NothingToSave).unwrap();
        app.poll_jobs();
        assert!(app.save_job.is_none());
        assert_eq!(app.status, SaveStatus::NothingToSave);
    }
}
