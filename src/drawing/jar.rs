// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The mood jar canvas.
//!
//! Glues the pieces together: drawing callbacks become dots and line
//! segments in the active emotion's colour, painted onto a renderer that
//! always starts from the jar outline.

use crate::drawing::input::DrawingCallbacks;
use crate::drawing::palette::{Emotion, PaletteEntry, PALETTE};
use crate::drawing::raster::{StrokeRenderer, Surface, DEFAULT_BRUSH_WIDTH, DEFAULT_DOT_RADIUS};
use crate::drawing::template::JarTemplate;
use crate::util::geometry::Position;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Brush sizes used for freehand strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub width: f32,
    pub dot_radius: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_BRUSH_WIDTH,
            dot_radius: DEFAULT_DOT_RADIUS,
        }
    }
}

/// Drawing state for one jar.
pub struct JarCanvas<R: StrokeRenderer = Surface> {
    renderer: R,
    brush: BrushSettings,
    ink: PaletteEntry,
    last: Option<Position>,
    emotions_used: Vec<Emotion>,
    revision: u64,
}

impl<R: StrokeRenderer> JarCanvas<R> {
    /// Wrap an already prepared renderer.
    pub fn with_renderer(renderer: R, brush: BrushSettings) -> Self {
        Self {
            renderer,
            brush,
            ink: PALETTE[0],
            last: None,
            emotions_used: Vec::new(),
            revision: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn ink(&self) -> PaletteEntry {
        self.ink
    }

    /// Use `entry` for strokes started from now on.
    pub fn set_ink(&mut self, entry: PaletteEntry) {
        self.ink = entry;
    }

    /// Emotions painted since the last clear, in first-use order.
    pub fn emotions_used(&self) -> &[Emotion] {
        &self.emotions_used
    }

    /// Bumped whenever the pixels change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl JarCanvas<Surface> {
    /// Create a `width` x `height` canvas showing only the jar outline.
    pub fn new(width: u32, height: u32, brush: BrushSettings) -> Self {
        let mut surface = Surface::new(width, height);
        JarTemplate::default().clear(&mut surface, width, height);
        Self::with_renderer(surface, brush)
    }

    pub fn surface(&self) -> &Surface {
        &self.renderer
    }

    /// Copy of the current pixels, for handing to another thread.
    pub fn snapshot(&self) -> RgbaImage {
        self.renderer.image().clone()
    }

    /// Reset to an empty jar of the given size.
    pub fn clear(&mut self, width: u32, height: u32) {
        JarTemplate::default().clear(&mut self.renderer, width, height);
        self.last = None;
        self.emotions_used.clear();
        self.touch();
    }
}

impl<R: StrokeRenderer> DrawingCallbacks for JarCanvas<R> {
    fn on_start_drawing(&mut self, x: f32, y: f32) {
        let color = self.ink.color;
        self.renderer.draw_dot(x, y, color, self.brush.dot_radius);
        self.last = Some(Position::new(x, y));

        if !self.emotions_used.contains(&self.ink.emotion) {
            self.emotions_used.push(self.ink.emotion);
        }
        self.touch();
    }

    fn on_move_drawing(&mut self, x: f32, y: f32) {
        let Some(from) = self.last else {
            return;
        };
        let color = self.ink.color;
        self.renderer.draw_line(from.x, from.y, x, y, color, self.brush.width);
        self.last = Some(Position::new(x, y));
        self.touch();
    }

    fn on_end_drawing(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::input::{PointerAdapter, PointerInput};
    use crate::drawing::palette::{Color, Palette};
    use crate::util::geometry::SurfaceRect;

    #[derive(Debug, Clone, PartialEq)]
    enum Paint {
        Dot(f32, f32, Color, f32),
        Line(f32, f32, f32, f32, Color, f32),
    }

    #[derive(Default)]
    struct Recording {
        ops: Vec<Paint>,
    }

    impl StrokeRenderer for Recording {
        fn draw_dot(&mut self, x: f32, y: f32, color: Color, radius: f32) {
            self.ops.push(Paint::Dot(x, y, color, radius));
        }
        fn draw_line(&mut self, fx: f32, fy: f32, tx: f32, ty: f32, color: Color, width: f32) {
            self.ops.push(Paint::Line(fx, fy, tx, ty, color, width));
        }
    }

    const RECT: SurfaceRect = SurfaceRect::new(0.0, 0.0, 400.0, 400.0);

    fn recording_adapter() -> PointerAdapter<JarCanvas<Recording>> {
        PointerAdapter::attach(JarCanvas::with_renderer(
            Recording::default(),
            BrushSettings::default(),
        ))
    }

    #[test]
    fn test_press_drag_release() {
        let mut adapter = recording_adapter();
        let color = adapter.callbacks().ink().color;

        adapter.dispatch(&PointerInput::MouseDown { x: 50.0, y: 50.0 }, RECT);
        assert!(adapter.is_drawing());
        adapter.dispatch(&PointerInput::MouseMove { x: 80.0, y: 50.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);
        assert!(!adapter.is_drawing());

        assert_eq!(
            adapter.callbacks().renderer().ops,
            vec![
                Paint::Dot(50.0, 50.0, color, 10.0),
                Paint::Line(50.0, 50.0, 80.0, 50.0, color, 20.0),
            ]
        );
    }

    #[test]
    fn test_tap_paints_single_dot() {
        let mut adapter = recording_adapter();
        adapter.dispatch(&PointerInput::MouseDown { x: 12.0, y: 34.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);

        let ops = &adapter.callbacks().renderer().ops;
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], Paint::Dot(x, y, _, _) if x == 12.0 && y == 34.0));
    }

    #[test]
    fn test_moves_form_a_polyline_in_active_color() {
        let brush = BrushSettings {
            width: 6.0,
            dot_radius: 3.0,
        };
        let mut adapter = PointerAdapter::attach(JarCanvas::with_renderer(Recording::default(), brush));
        let mut palette = Palette::new();
        palette.select(Emotion::Angry);
        adapter.callbacks_mut().set_ink(palette.active());

        adapter.dispatch(&PointerInput::MouseDown { x: 0.0, y: 0.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseMove { x: 10.0, y: 0.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseMove { x: 10.0, y: 10.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);

        let red = Emotion::Angry.color();
        assert_eq!(
            adapter.callbacks().renderer().ops,
            vec![
                Paint::Dot(0.0, 0.0, red, 3.0),
                Paint::Line(0.0, 0.0, 10.0, 0.0, red, 6.0),
                Paint::Line(10.0, 0.0, 10.0, 10.0, red, 6.0),
            ]
        );
        assert_eq!(adapter.callbacks().emotions_used(), &[Emotion::Angry]);
    }

    #[test]
    fn test_new_session_does_not_connect_to_previous_stroke() {
        let mut adapter = recording_adapter();
        adapter.dispatch(&PointerInput::MouseDown { x: 0.0, y: 0.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);
        adapter.dispatch(&PointerInput::MouseDown { x: 100.0, y: 100.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseMove { x: 110.0, y: 100.0 }, RECT);

        let ops = &adapter.callbacks().renderer().ops;
        assert!(matches!(ops[2], Paint::Line(fx, fy, _, _, _, _) if fx == 100.0 && fy == 100.0));
    }

    #[test]
    fn test_clear_resets_canvas_and_usage() {
        let mut canvas = JarCanvas::new(200, 200, BrushSettings::default());
        let pristine = canvas.surface().clone();
        let start = canvas.revision();

        canvas.set_ink(PALETTE[2]);
        canvas.on_start_drawing(100.0, 150.0);
        canvas.on_move_drawing(120.0, 150.0);
        canvas.on_end_drawing();
        assert_ne!(canvas.surface(), &pristine);
        assert_eq!(canvas.emotions_used(), &[Emotion::Sad]);

        canvas.clear(200, 200);
        assert_eq!(canvas.surface(), &pristine);
        assert!(canvas.emotions_used().is_empty());
        assert!(canvas.revision() > start);
    }
}
