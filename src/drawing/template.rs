// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Jar silhouette drawn underneath every drawing.
//!
//! All geometry is given as fractions of the surface size so the outline
//! rescales with the canvas.

use crate::drawing::palette::Color;
use crate::drawing::raster::Surface;
use crate::util::geometry::Position;
use std::f32::consts::{FRAC_PI_2, PI};

/// Default outline colour.
pub const OUTLINE_COLOR: Color = Color::rgb(0x4a, 0x4a, 0x4a);

/// Default outline stroke width in pixels.
pub const OUTLINE_WIDTH: f32 = 4.0;

const LID_LEFT: f32 = 0.32;
const LID_RIGHT: f32 = 0.68;
const LID_TOP: f32 = 0.05;
const NECK_TOP: f32 = 0.12;
const NECK_LEFT: f32 = 0.35;
const NECK_RIGHT: f32 = 0.65; // neck is 30% of the width
const SHOULDER_TOP: f32 = 0.20;
const BODY_TOP: f32 = 0.30;
const BODY_LEFT: f32 = 0.15;
const BODY_RIGHT: f32 = 0.85;
const BODY_BOTTOM: f32 = 0.95;
const CORNER_RADIUS: f32 = 0.08; // of the smaller dimension
const ARC_SEGMENTS: usize = 12;

/// Stroked, unfilled jar outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JarTemplate {
    pub color: Color,
    pub width: f32,
}

impl Default for JarTemplate {
    fn default() -> Self {
        Self {
            color: OUTLINE_COLOR,
            width: OUTLINE_WIDTH,
        }
    }
}

impl JarTemplate {
    /// Polylines making up the outline for a `width` x `height` surface.
    pub fn outline(&self, width: u32, height: u32) -> Vec<Vec<Position>> {
        let w = width as f32;
        let h = height as f32;
        let at = |fx: f32, fy: f32| Position::new(fx * w, fy * h);

        let lid = vec![
            at(LID_LEFT, LID_TOP),
            at(LID_RIGHT, LID_TOP),
            at(LID_RIGHT, NECK_TOP),
            at(LID_LEFT, NECK_TOP),
            at(LID_LEFT, LID_TOP),
        ];

        let r = CORNER_RADIUS * w.min(h);
        let bottom = BODY_BOTTOM * h;
        let left = BODY_LEFT * w;
        let right = BODY_RIGHT * w;

        let mut body = vec![
            at(NECK_LEFT, NECK_TOP),
            at(NECK_LEFT, SHOULDER_TOP),
            at(BODY_LEFT, BODY_TOP),
            Position::new(left, bottom - r),
        ];
        body.extend(arc(Position::new(left + r, bottom - r), r, PI, FRAC_PI_2));
        body.push(Position::new(right - r, bottom));
        body.extend(arc(Position::new(right - r, bottom - r), r, FRAC_PI_2, 0.0));
        body.extend([
            at(BODY_RIGHT, BODY_TOP),
            at(NECK_RIGHT, SHOULDER_TOP),
            at(NECK_RIGHT, NECK_TOP),
        ]);

        vec![lid, body]
    }

    /// Stroke the outline onto `surface` at its current size.
    pub fn draw(&self, surface: &mut Surface) {
        for path in self.outline(surface.width(), surface.height()) {
            surface.stroke_polyline(&path, self.color, self.width);
        }
    }

    /// Erase `surface` (resizing it to `width` x `height`) and redraw the outline.
    ///
    /// This is the only way drawings are reset; the surface is never left
    /// without its outline.
    pub fn clear(&self, surface: &mut Surface, width: u32, height: u32) {
        surface.erase(width, height);
        self.draw(surface);
        log::debug!("Cleared jar surface to {}x{}", width, height);
    }
}

/// Flatten a circular arc into points, `start` and `end` in radians (y down).
fn arc(centre: Position, radius: f32, start: f32, end: f32) -> impl Iterator<Item = Position> {
    (0..=ARC_SEGMENTS).map(move |i| {
        let t = start + (end - start) * i as f32 / ARC_SEGMENTS as f32;
        Position::new(centre.x + radius * t.cos(), centre.y + radius * t.sin())
    })
}
