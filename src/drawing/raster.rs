// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster surface and stroke rendering.
//!
//! The surface is a plain RGBA bitmap. Strokes are painted straight into it
//! and are not kept anywhere else, so the bitmap is the drawing.

use crate::drawing::palette::Color;
use crate::util::geometry::{distance_sq_to_segment, Position};
use image::{Rgba, RgbaImage};

/// Default stroke width for freehand lines.
pub const DEFAULT_BRUSH_WIDTH: f32 = 20.0;

/// Default radius of the dot painted where a stroke starts.
pub const DEFAULT_DOT_RADIUS: f32 = 10.0;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Something strokes can be painted onto.
pub trait StrokeRenderer {
    /// Paint a filled circle centred on `(x, y)`.
    fn draw_dot(&mut self, x: f32, y: f32, color: Color, radius: f32);

    /// Paint a round-capped segment from `(from_x, from_y)` to `(to_x, to_y)`.
    fn draw_line(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, color: Color, width: f32);
}

/// RGBA pixel buffer backing the drawing canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Erase everything, resizing the buffer when the dimensions changed.
    pub(crate) fn erase(&mut self, width: u32, height: u32) {
        if self.width() != width || self.height() != height {
            self.image = RgbaImage::new(width, height);
        } else {
            for pixel in self.image.pixels_mut() {
                *pixel = TRANSPARENT;
            }
        }
    }

    /// Stroke a connected polyline with round joins.
    pub fn stroke_polyline(&mut self, points: &[Position], color: Color, width: f32) {
        for pair in points.windows(2) {
            self.draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, color, width);
        }
    }

    /// Set every pixel whose centre lies within `radius` of the segment `a`-`b`.
    ///
    /// A single coverage test against the segment gives round caps for free,
    /// and consecutive segments sharing an endpoint get round joins.
    fn fill_capsule(&mut self, a: Position, b: Position, radius: f32, color: Color) {
        if radius.is_nan() || radius <= 0.0 || self.width() == 0 || self.height() == 0 {
            return;
        }

        let min_x = (a.x.min(b.x) - radius).floor().max(0.0) as i64;
        let min_y = (a.y.min(b.y) - radius).floor().max(0.0) as i64;
        let max_x = ((a.x.max(b.x) + radius).ceil() as i64).min(self.width() as i64 - 1);
        let max_y = ((a.y.max(b.y) + radius).ceil() as i64).min(self.height() as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let radius_sq = radius * radius;
        let rgba = color.to_rgba();
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let centre = Position::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_sq_to_segment(centre, a, b) <= radius_sq {
                    self.image.put_pixel(px as u32, py as u32, rgba);
                }
            }
        }
    }
}

impl StrokeRenderer for Surface {
    fn draw_dot(&mut self, x: f32, y: f32, color: Color, radius: f32) {
        let centre = Position::new(x, y);
        self.fill_capsule(centre, centre, radius, color);
    }

    fn draw_line(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, color: Color, width: f32) {
        self.fill_capsule(
            Position::new(from_x, from_y),
            Position::new(to_x, to_y),
            width / 2.0,
            color,
        );
    }
}
