// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer and touch input adapter.
//!
//! Mouse and single-touch input is reduced to three callbacks: start, move
//! and end of a drawing session. The adapter is a two-state machine
//! (`Idle`, `Drawing`) and owns its callback sink for as long as it is
//! attached; dropping the adapter ends any session still in progress.

use crate::util::geometry::{Position, SurfaceRect};

/// Receiver of normalized drawing signals, in surface-relative pixels.
pub trait DrawingCallbacks {
    fn on_start_drawing(&mut self, x: f32, y: f32);
    fn on_move_drawing(&mut self, x: f32, y: f32);
    fn on_end_drawing(&mut self);
}

/// Which device started the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch,
}

/// Adapter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Drawing(InputSource),
}

/// Raw input in screen (client) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    MouseDown { x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    MouseUp,
    MouseLeave,
    /// Touch points currently on the surface; only the first is used.
    TouchStart { touches: Vec<Position> },
    TouchMove { touches: Vec<Position> },
    TouchEnd,
}

/// What the caller should do with the platform event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Suppress the platform's default touch gesture (scroll, zoom).
    pub prevent_default: bool,
}

/// Translates [`PointerInput`] into [`DrawingCallbacks`] calls.
pub struct PointerAdapter<C: DrawingCallbacks> {
    state: DrawState,
    callbacks: C,
}

impl<C: DrawingCallbacks> PointerAdapter<C> {
    /// Attach `callbacks` to a new adapter in the `Idle` state.
    pub fn attach(callbacks: C) -> Self {
        Self {
            state: DrawState::Idle,
            callbacks,
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing(_))
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    /// Feed one input event, with the surface rectangle as of this event.
    pub fn dispatch(&mut self, input: &PointerInput, rect: SurfaceRect) -> Dispatch {
        match input {
            PointerInput::MouseDown { x, y } => {
                self.begin(InputSource::Mouse, rect.relative(*x, *y));
                Dispatch::default()
            }
            PointerInput::MouseMove { x, y } => {
                self.extend(InputSource::Mouse, rect.relative(*x, *y));
                Dispatch::default()
            }
            PointerInput::MouseUp | PointerInput::MouseLeave => {
                self.finish(InputSource::Mouse);
                Dispatch::default()
            }
            PointerInput::TouchStart { touches } => {
                if let Some(first) = touches.first() {
                    self.begin(InputSource::Touch, rect.relative(first.x, first.y));
                }
                self.touch_dispatch()
            }
            PointerInput::TouchMove { touches } => {
                if let Some(first) = touches.first() {
                    self.extend(InputSource::Touch, rect.relative(first.x, first.y));
                }
                self.touch_dispatch()
            }
            PointerInput::TouchEnd => {
                self.finish(InputSource::Touch);
                Dispatch::default()
            }
        }
    }

    /// End the current session, if any, regardless of its source.
    pub fn end_session(&mut self) {
        if self.is_drawing() {
            self.state = DrawState::Idle;
            self.callbacks.on_end_drawing();
        }
    }

    fn begin(&mut self, source: InputSource, pos: Position) {
        // A second press while a session is open does not start another one
        if self.is_drawing() {
            return;
        }
        self.state = DrawState::Drawing(source);
        self.callbacks.on_start_drawing(pos.x, pos.y);
    }

    fn extend(&mut self, source: InputSource, pos: Position) {
        if self.state == DrawState::Drawing(source) {
            self.callbacks.on_move_drawing(pos.x, pos.y);
        }
    }

    fn finish(&mut self, source: InputSource) {
        if self.state == DrawState::Drawing(source) {
            self.state = DrawState::Idle;
            self.callbacks.on_end_drawing();
        }
    }

    fn touch_dispatch(&self) -> Dispatch {
        Dispatch {
            prevent_default: self.state == DrawState::Drawing(InputSource::Touch),
        }
    }
}

impl<C: DrawingCallbacks> Drop for PointerAdapter<C> {
    fn drop(&mut self) {
        self.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Start(f32, f32),
        Move(f32, f32),
        End,
    }

    /// Records every callback into a shared log.
    #[derive(Default, Clone)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl DrawingCallbacks for Recorder {
        fn on_start_drawing(&mut self, x: f32, y: f32) {
            self.calls.borrow_mut().push(Call::Start(x, y));
        }
        fn on_move_drawing(&mut self, x: f32, y: f32) {
            self.calls.borrow_mut().push(Call::Move(x, y));
        }
        fn on_end_drawing(&mut self) {
            self.calls.borrow_mut().push(Call::End);
        }
    }

    const RECT: SurfaceRect = SurfaceRect::new(0.0, 0.0, 400.0, 400.0);

    fn touch(x: f32, y: f32) -> Vec<Position> {
        vec![Position::new(x, y)]
    }

    #[test]
    fn test_mouse_session_lifecycle() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());
        assert_eq!(adapter.state(), DrawState::Idle);

        adapter.dispatch(&PointerInput::MouseDown { x: 50.0, y: 50.0 }, RECT);
        assert_eq!(adapter.state(), DrawState::Drawing(InputSource::Mouse));

        adapter.dispatch(&PointerInput::MouseMove { x: 80.0, y: 50.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);
        assert_eq!(adapter.state(), DrawState::Idle);

        // Moves after the session ended are ignored
        adapter.dispatch(&PointerInput::MouseMove { x: 90.0, y: 50.0 }, RECT);

        assert_eq!(
            *recorder.calls.borrow(),
            vec![Call::Start(50.0, 50.0), Call::Move(80.0, 50.0), Call::End]
        );
    }

    #[test]
    fn test_hover_without_press_draws_nothing() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());

        adapter.dispatch(&PointerInput::MouseMove { x: 10.0, y: 10.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseLeave, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);

        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_end_fires_once_per_session() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());

        adapter.dispatch(&PointerInput::MouseDown { x: 1.0, y: 1.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseLeave, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);
        adapter.dispatch(&PointerInput::MouseLeave, RECT);

        let ends = recorder.calls.borrow().iter().filter(|c| **c == Call::End).count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_coordinates_follow_current_rect() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());

        let rect = SurfaceRect::new(100.0, 20.0, 400.0, 400.0);
        adapter.dispatch(&PointerInput::MouseDown { x: 150.0, y: 70.0 }, rect);

        // The surface scrolled between events
        let scrolled = SurfaceRect::new(100.0, -30.0, 400.0, 400.0);
        adapter.dispatch(&PointerInput::MouseMove { x: 150.0, y: 70.0 }, scrolled);

        assert_eq!(
            *recorder.calls.borrow(),
            vec![Call::Start(50.0, 50.0), Call::Move(50.0, 100.0)]
        );
    }

    #[test]
    fn test_touch_uses_first_point_and_prevents_scroll_only_while_drawing() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());

        // Stray move before any touch: no stroke, scrolling allowed
        let idle = adapter.dispatch(&PointerInput::TouchMove { touches: touch(5.0, 5.0) }, RECT);
        assert!(!idle.prevent_default);

        let touches = vec![Position::new(10.0, 20.0), Position::new(200.0, 200.0)];
        let started = adapter.dispatch(&PointerInput::TouchStart { touches }, RECT);
        assert!(started.prevent_default);

        let moved = adapter.dispatch(&PointerInput::TouchMove { touches: touch(12.0, 22.0) }, RECT);
        assert!(moved.prevent_default);

        let ended = adapter.dispatch(&PointerInput::TouchEnd, RECT);
        assert!(!ended.prevent_default);

        assert_eq!(
            *recorder.calls.borrow(),
            vec![Call::Start(10.0, 20.0), Call::Move(12.0, 22.0), Call::End]
        );
    }

    #[test]
    fn test_touch_without_points_is_ignored() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());

        adapter.dispatch(&PointerInput::TouchStart { touches: Vec::new() }, RECT);
        assert_eq!(adapter.state(), DrawState::Idle);
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_sources_do_not_mix() {
        let recorder = Recorder::default();
        let mut adapter = PointerAdapter::attach(recorder.clone());

        adapter.dispatch(&PointerInput::TouchStart { touches: touch(1.0, 1.0) }, RECT);
        adapter.dispatch(&PointerInput::MouseDown { x: 9.0, y: 9.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseMove { x: 9.0, y: 9.0 }, RECT);
        adapter.dispatch(&PointerInput::MouseUp, RECT);
        assert!(adapter.is_drawing());

        adapter.dispatch(&PointerInput::TouchEnd, RECT);
        assert_eq!(*recorder.calls.borrow(), vec![Call::Start(1.0, 1.0), Call::End]);
    }

    #[test]
    fn test_drop_ends_open_session() {
        let recorder = Recorder::default();
        {
            let mut adapter = PointerAdapter::attach(recorder.clone());
            adapter.dispatch(&PointerInput::MouseDown { x: 3.0, y: 4.0 }, RECT);
        }
        assert_eq!(*recorder.calls.borrow(), vec![Call::Start(3.0, 4.0), Call::End]);

        // Dropping an idle adapter adds nothing
        drop(PointerAdapter::attach(recorder.clone()));
        assert_eq!(recorder.calls.borrow().len(), 2);
    }
}
