// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the pixel-space types shared by the drawing code:
//! surface-relative positions, the on-screen rectangle of the drawing
//! surface, and distance helpers used by the rasterizer.

/// A position in pixels, relative to the top-left corner of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen bounding rectangle of the drawing surface.
///
/// Callers re-query this for every event so positions stay correct when the
/// surface scrolls or resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert screen (client) coordinates to surface-relative coordinates.
    pub fn relative(&self, client_x: f32, client_y: f32) -> Position {
        Position::new(client_x - self.left, client_y - self.top)
    }

    /// Check whether a screen position falls inside the rectangle.
    pub fn contains(&self, client_x: f32, client_y: f32) -> bool {
        client_x >= self.left
            && client_x < self.left + self.width
            && client_y >= self.top
            && client_y < self.top + self.height
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
pub fn distance_sq_to_segment(p: Position, a: Position, b: Position) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;

    // Degenerate segment: distance to the single point
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };

    let dx = p.x - (a.x + abx * t);
    let dy = p.y - (a.y + aby * t);
    dx * dx + dy * dy
}
