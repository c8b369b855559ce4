// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas to PNG conversion.
//!
//! An absent surface or a failed encode both come back as `None`, which the
//! caller treats as "nothing to upload".

use crate::drawing::raster::Surface;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::sync::mpsc::{channel, Receiver};

/// Encode the surface as PNG.
pub fn encode_png(surface: Option<&Surface>) -> Option<Vec<u8>> {
    encode_image(surface?.image())
}

/// Encode raw RGBA pixels as PNG.
pub fn encode_image(image: &RgbaImage) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    let result = PngEncoder::new(&mut buffer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    );

    match result {
        Ok(()) => {
            log::debug!(
                "Encoded {}x{} canvas to {} PNG bytes",
                image.width(),
                image.height(),
                buffer.len()
            );
            Some(buffer)
        }
        Err(e) => {
            log::warn!("Failed to encode canvas as PNG: {}", e);
            None
        }
    }
}

/// Encode a snapshot on a background thread.
///
/// The receiver yields exactly one value.
pub fn encode_in_background(snapshot: Option<RgbaImage>) -> Receiver<Option<Vec<u8>>> {
    let (sender, receiver) = channel();
    std::thread::spawn(move || {
        let encoded = snapshot.as_ref().and_then(encode_image);
        let _ = sender.send(encoded);
    });
    receiver
}
