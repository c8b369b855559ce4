// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mood Jar
//!
//! A guided drawing activity: pick the colour of how you feel, fill the jar,
//! and save the picture to your journal's storage.

pub mod app;
pub mod cli;
pub mod config;
pub mod drawing;
pub mod io;
pub mod models;
pub mod storage;
pub mod ui;
pub mod util;
