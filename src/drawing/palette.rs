// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Emotion palette.
//!
//! Every ink colour in the mood jar stands for a named emotion. The set is
//! fixed and ordered; the palette only tracks which entry is active.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Emotions offered by the mood jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Calm,
    Sad,
    Anxious,
    Angry,
    Excited,
    Tired,
}

impl Emotion {
    pub fn name(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Calm => "Calm",
            Emotion::Sad => "Sad",
            Emotion::Anxious => "Anxious",
            Emotion::Angry => "Angry",
            Emotion::Excited => "Excited",
            Emotion::Tired => "Tired",
        }
    }

    /// Colour this emotion is painted with.
    pub fn color(self) -> Color {
        // Every emotion has exactly one entry in PALETTE
        PALETTE
            .iter()
            .find(|entry| entry.emotion == self)
            .map(|entry| entry.color)
            .unwrap_or(PALETTE[0].color)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One selectable palette swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Color,
    pub emotion: Emotion,
}

/// The fixed, ordered palette.
pub const PALETTE: [PaletteEntry; 7] = [
    PaletteEntry { color: Color::rgb(0xff, 0xd9, 0x3d), emotion: Emotion::Happy },
    PaletteEntry { color: Color::rgb(0x6b, 0xcb, 0x77), emotion: Emotion::Calm },
    PaletteEntry { color: Color::rgb(0x4d, 0x96, 0xff), emotion: Emotion::Sad },
    PaletteEntry { color: Color::rgb(0xb9, 0x83, 0xff), emotion: Emotion::Anxious },
    PaletteEntry { color: Color::rgb(0xff, 0x6b, 0x6b), emotion: Emotion::Angry },
    PaletteEntry { color: Color::rgb(0xff, 0x9f, 0x45), emotion: Emotion::Excited },
    PaletteEntry { color: Color::rgb(0x9e, 0x9e, 0x9e), emotion: Emotion::Tired },
];

type SelectionCallback = Box<dyn FnMut(Color, &str)>;

/// Current palette selection plus an optional change listener.
pub struct Palette {
    active: PaletteEntry,
    on_change: Option<SelectionCallback>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Create a palette with the first entry active.
    pub fn new() -> Self {
        Self {
            active: PALETTE[0],
            on_change: None,
        }
    }

    pub fn entries(&self) -> &'static [PaletteEntry] {
        &PALETTE
    }

    pub fn active(&self) -> PaletteEntry {
        self.active
    }

    /// Register the selection listener, replacing any previous one.
    pub fn on_selection_changed(&mut self, callback: impl FnMut(Color, &str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Make `emotion` the active entry and notify the listener.
    ///
    /// Selecting the already-active emotion still notifies; the resulting
    /// state is the same either way.
    pub fn select(&mut self, emotion: Emotion) {
        self.active = PaletteEntry {
            color: emotion.color(),
            emotion,
        };
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.active.color, emotion.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_hex_parse_and_format() {
        let color = Color::from_hex("#4D96FF").unwrap();
        assert_eq!(color, Color::rgb(0x4d, 0x96, 0xff));
        assert_eq!(color.to_hex(), "#4d96ff");
        assert_eq!(Color::from_hex("4d96ff"), Some(color));

        assert!(Color::from_hex("#4d96f").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
        assert!(Color::from_hex("#ééé").is_none());
    }

    #[test]
    fn test_palette_is_unique() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a.emotion, b.emotion);
                assert_ne!(a.color, b.color);
            }
        }
    }

    #[test]
    fn test_select_updates_color_and_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut palette = Palette::new();
        assert_eq!(palette.active().emotion, Emotion::Happy);

        let sink = Rc::clone(&seen);
        palette.on_selection_changed(move |color, name| {
            sink.borrow_mut().push((color, name.to_string()));
        });

        palette.select(Emotion::Sad);
        assert_eq!(palette.active().color, Color::rgb(0x4d, 0x96, 0xff));
        assert_eq!(palette.active().emotion, Emotion::Sad);

        // Re-selecting is idempotent but still notifies
        palette.select(Emotion::Sad);
        assert_eq!(palette.active().color, Emotion::Sad.color());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Emotion::Sad.color(), "Sad".to_string()));
    }

    #[test]
    fn test_every_emotion_has_its_own_color() {
        for entry in PALETTE {
            assert_eq!(entry.emotion.color(), entry.color);
        }
    }
}
