// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mood Jar desktop entry point.
//!
//! Parses the command line, loads configuration, connects the storage backend, and hands both to
//! the application.

use anyhow::{Context, Result};
use clap::Parser;
use moodjar::app::MoodJarApp;
use moodjar::cli::Cli;
use moodjar::config::AppConfig;
use moodjar::storage::Backend;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::init();

    let config = AppConfig::from_cli(&cli)?;
    let backend = Backend::connect(&config.storage).context("connecting to storage")?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([640.0, 600.0])
            .with_title("Mood Jar"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Mood Jar",
        options,
        Box::new(move |_cc| Ok(Box::new(MoodJarApp::new(config, backend)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
