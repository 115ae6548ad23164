//! Keyboard layout descriptor: key centers and dimensions.
//!
//! This is the primary contract between the host keyboard and the
//! recognition core. The host populates key geometry in density-independent
//! pixels (dp); the core only ever treats dp as an abstract float unit.

use serde::{Deserialize, Serialize};

/// A single key on the keyboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Display label ("a", "shift", "123"); diagnostics only.
    pub label: String,
    /// Unicode code point of the key's primary character. `-1` for
    /// non-character keys (shift, backspace, space). Only keys with a
    /// non-negative code point participate in recognition.
    pub code_point: i32,
    /// Key center X in dp, relative to the keyboard top-left.
    pub center_x: f32,
    /// Key center Y in dp, relative to the keyboard top-left.
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl KeyDescriptor {
    pub fn new<T: Into<String>>(
        label: T,
        code_point: i32,
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        KeyDescriptor {
            label: label.into(),
            code_point,
            center_x,
            center_y,
            width,
            height,
        }
    }

    pub fn is_character_key(&self) -> bool {
        self.code_point >= 0
    }
}

/// Complete keyboard layout descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    /// BCP 47 language tag (e.g. "en-US").
    pub language_tag: String,
    /// All keys, including non-character keys.
    pub keys: Vec<KeyDescriptor>,
    /// Total keyboard width in dp.
    pub layout_width: f32,
    /// Total keyboard height in dp.
    pub layout_height: f32,
}

impl KeyboardLayout {
    /// Index of the character key nearest to `(x, y)` by Euclidean distance
    /// to key centers. Ties go to the smaller index. `None` when the layout
    /// has no character keys.
    pub fn find_nearest_key(&self, x: f32, y: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, key) in self.keys.iter().enumerate() {
            if !key.is_character_key() {
                continue;
            }
            let dx = key.center_x - x;
            let dy = key.center_y - y;
            let dist = (dx * dx + dy * dy).sqrt();
            match best {
                Some((_, best_dist)) if best_dist <= dist => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the first key whose code point matches, ASCII
    /// case-insensitively. `None` when no key matches.
    pub fn find_key_by_code_point(&self, code_point: i32) -> Option<usize> {
        let want = ascii_lower(code_point);
        self.keys
            .iter()
            .position(|k| ascii_lower(k.code_point) == want)
    }

    /// A usable layout has positive dimensions and at least one character key.
    pub fn is_valid(&self) -> bool {
        if self.keys.is_empty() || self.layout_width <= 0.0 || self.layout_height <= 0.0 {
            return false;
        }
        self.keys.iter().any(KeyDescriptor::is_character_key)
    }
}

fn ascii_lower(code_point: i32) -> i32 {
    if (i32::from(b'A')..=i32::from(b'Z')).contains(&code_point) {
        code_point - i32::from(b'A') + i32::from(b'a')
    } else {
        code_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_key_layout() -> KeyboardLayout {
        KeyboardLayout {
            language_tag: "en".into(),
            keys: vec![
                KeyDescriptor::new("a", i32::from(b'a'), 10.0, 10.0, 20.0, 20.0),
                KeyDescriptor::new("b", i32::from(b'b'), 50.0, 10.0, 20.0, 20.0),
                KeyDescriptor::new("shift", -1, 10.0, 50.0, 40.0, 20.0),
            ],
            layout_width: 100.0,
            layout_height: 80.0,
        }
    }

    #[test]
    fn nearest_key_picks_closest_character_key() {
        let layout = two_key_layout();
        assert_eq!(layout.find_nearest_key(12.0, 11.0), Some(0));
        assert_eq!(layout.find_nearest_key(48.0, 9.0), Some(1));
        // Point sitting on the shift key still maps to a character key.
        assert_eq!(layout.find_nearest_key(10.0, 50.0), Some(0));
    }

    #[test]
    fn nearest_key_tie_breaks_to_smaller_index() {
        let layout = two_key_layout();
        // Equidistant between keys 0 and 1.
        assert_eq!(layout.find_nearest_key(30.0, 10.0), Some(0));
    }

    #[test]
    fn nearest_key_none_without_character_keys() {
        let layout = KeyboardLayout {
            language_tag: "en".into(),
            keys: vec![KeyDescriptor::new("shift", -1, 0.0, 0.0, 10.0, 10.0)],
            layout_width: 10.0,
            layout_height: 10.0,
        };
        assert_eq!(layout.find_nearest_key(0.0, 0.0), None);
    }

    #[test]
    fn code_point_lookup_is_ascii_case_insensitive() {
        let layout = two_key_layout();
        assert_eq!(layout.find_key_by_code_point(i32::from(b'B')), Some(1));
        assert_eq!(layout.find_key_by_code_point(i32::from(b'b')), Some(1));
        assert_eq!(layout.find_key_by_code_point(i32::from(b'z')), None);
    }

    #[test]
    fn validity_requires_character_keys_and_dimensions() {
        assert!(two_key_layout().is_valid());

        let mut no_chars = two_key_layout();
        for key in &mut no_chars.keys {
            key.code_point = -1;
        }
        assert!(!no_chars.is_valid());

        let mut flat = two_key_layout();
        flat.layout_height = 0.0;
        assert!(!flat.is_valid());

        assert!(!KeyboardLayout::default().is_valid());
    }
}
