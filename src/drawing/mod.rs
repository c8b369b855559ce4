// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand drawing core for the mood jar activity.
//!
//! Nothing in here depends on the GUI toolkit; the UI layer feeds
//! [`input::PointerInput`] events in and reads pixels back out.

pub mod input;
pub mod jar;
pub mod palette;
pub mod raster;
pub mod serializer;
pub mod template;
