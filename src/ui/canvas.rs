// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas widget.
//!
//! Shows the jar surface as a texture and turns egui pointer and touch
//! events into [`PointerInput`] for the adapter. One surface pixel is one
//! egui point.

use crate::drawing::input::{PointerAdapter, PointerInput};
use crate::drawing::jar::JarCanvas;
use crate::drawing::palette::Color;
use crate::util::geometry::{Position, SurfaceRect};

/// Per-widget input bookkeeping kept between frames.
#[derive(Debug, Default)]
pub struct CanvasInput {
    /// The finger that owns the touch session; other fingers are ignored.
    primary_touch: Option<egui::TouchId>,
}

/// GPU copy of the surface, re-uploaded when the canvas revision changes.
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
}

impl CanvasTexture {
    fn sync(&mut self, ctx: &egui::Context, canvas: &JarCanvas) -> egui::TextureId {
        let revision = canvas.revision();
        let surface = canvas.surface();
        let stale = self.revision != Some(revision);

        let image = || {
            egui::ColorImage::from_rgba_unmultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.image().as_raw(),
            )
        };

        let handle = match self.handle.take() {
            Some(mut handle) => {
                if stale {
                    handle.set(image(), egui::TextureOptions::NEAREST);
                }
                handle
            }
            None => ctx.load_texture("jar_canvas", image(), egui::TextureOptions::NEAREST),
        };
        let id = handle.id();
        self.handle = Some(handle);
        self.revision = Some(revision);
        id
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

/// Display the canvas and feed this frame's input to the adapter.
pub fn show(
    ui: &mut egui::Ui,
    adapter: &mut PointerAdapter<JarCanvas>,
    input: &mut CanvasInput,
    texture: &mut CanvasTexture,
) {
    let surface = adapter.callbacks().surface();
    let size = egui::vec2(surface.width() as f32, surface.height() as f32);

    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

    let events = ui.input(|i| i.events.clone());
    let surface_rect = SurfaceRect::new(rect.min.x, rect.min.y, rect.width(), rect.height());

    // False when a menu or popup covers the canvas under the pointer
    let reachable = response.hovered() || response.is_pointer_button_down_on();

    let mut prevent_default = false;
    for pointer_input in translate(&events, surface_rect, reachable, input) {
        prevent_default |= adapter.dispatch(&pointer_input, surface_rect).prevent_default;
    }

    if prevent_default {
        // Keep the page from scrolling under an active touch stroke
        ui.ctx().input_mut(|i| {
            i.raw_scroll_delta = egui::Vec2::ZERO;
            i.smooth_scroll_delta = egui::Vec2::ZERO;
        });
    }

    let texture_id = texture.sync(ui.ctx(), adapter.callbacks());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
    painter.image(
        texture_id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    if adapter.is_drawing() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }
}

/// Convert raw egui events into adapter input.
///
/// When a frame carries touch events, the pointer events egui synthesizes
/// from them are skipped. Presses and touch starts only begin a stroke when
/// `reachable` is set.
fn translate(
    events: &[egui::Event],
    rect: SurfaceRect,
    reachable: bool,
    input: &mut CanvasInput,
) -> Vec<PointerInput> {
    let has_touch = events.iter().any(|e| matches!(e, egui::Event::Touch { .. }));
    let mut out = Vec::new();

    for event in events {
        match event {
            egui::Event::Touch { id, phase, pos, .. } => {
                translate_touch(*id, *phase, *pos, rect, reachable, input, &mut out);
            }
            _ if has_touch => {}
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                if *pressed {
                    if reachable && rect.contains(pos.x, pos.y) {
                        out.push(PointerInput::MouseDown { x: pos.x, y: pos.y });
                    }
                } else {
                    out.push(PointerInput::MouseUp);
                }
            }
            egui::Event::PointerMoved(pos) => {
                if rect.contains(pos.x, pos.y) {
                    out.push(PointerInput::MouseMove { x: pos.x, y: pos.y });
                } else {
                    out.push(PointerInput::MouseLeave);
                }
            }
            egui::Event::PointerGone => out.push(PointerInput::MouseLeave),
            _ => {}
        }
    }
    out
}

fn translate_touch(
    id: egui::TouchId,
    phase: egui::TouchPhase,
    pos: egui::Pos2,
    rect: SurfaceRect,
    reachable: bool,
    input: &mut CanvasInput,
    out: &mut Vec<PointerInput>,
) {
    let touches = vec![Position::new(pos.x, pos.y)];
    match phase {
        egui::TouchPhase::Start => {
            if input.primary_touch.is_none() && reachable && rect.contains(pos.x, pos.y) {
                input.primary_touch = Some(id);
                out.push(PointerInput::TouchStart { touches });
            }
        }
        egui::TouchPhase::Move => {
            if input.primary_touch == Some(id) {
                out.push(PointerInput::TouchMove { touches });
            }
        }
        egui::TouchPhase::End | egui::TouchPhase::Cancel => {
            if input.primary_touch == Some(id) {
                input.primary_touch = None;
                out.push(PointerInput::TouchEnd);
            }
        }
    }
}
