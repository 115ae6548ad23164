//! Ideal (reference) path generation with per-layout memoization.
//!
//! The ideal path of a word connects the key centers of its letters in
//! order, then goes through the exact resample/normalize arithmetic used for
//! user input. Results are cached per lowercased word; replacing the layout
//! invalidates the cache wholesale.

use crate::layout::KeyboardLayout;
use crate::path::{self, NormalizedPath, RawPoint};
use crate::RESAMPLE_COUNT;
use std::collections::HashMap;

/// Synthetic time per key along an ideal path, in milliseconds.
const MS_PER_KEY: i64 = 100;

#[derive(Debug, Default)]
pub struct IdealPathGenerator {
    layout: Option<KeyboardLayout>,
    // Keyed by lowercased word; words with no usable path cache as None so
    // they are not regenerated on every recognition.
    cache: HashMap<String, Option<NormalizedPath>>,
}

impl IdealPathGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a layout, invalidating every cached path.
    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        tracing::debug!(
            invalidated = self.cache.len(),
            "layout changed; ideal path cache cleared"
        );
        self.layout = Some(layout);
        self.cache.clear();
    }

    /// The memoized ideal path for `word`, generating it on first request.
    ///
    /// Returns `None` when no layout is set or the word maps to fewer than
    /// two distinct key centers.
    pub fn get_ideal_path(&mut self, word: &str) -> Option<&NormalizedPath> {
        let layout = self.layout.as_ref()?;
        let key = word.to_ascii_lowercase();
        if !self.cache.contains_key(&key) {
            let generated = generate(layout, &key);
            self.cache.insert(key.clone(), generated);
        }
        self.cache.get(&key).and_then(|path| path.as_ref())
    }

    /// Warm the cache for a batch of words.
    pub fn pregenerate<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let _ = self.get_ideal_path(word.as_ref());
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Build the normalized reference path for an already-lowercased word.
fn generate(layout: &KeyboardLayout, word: &str) -> Option<NormalizedPath> {
    let mut key_points: Vec<RawPoint> = Vec::new();
    let mut prev_key: Option<usize> = None;
    let mut start_key: Option<usize> = None;
    let mut end_key: Option<usize> = None;
    let mut key_count: i64 = 0;

    for ch in word.chars() {
        let code_point = ch.to_ascii_lowercase() as i32;
        let Some(key_index) = layout.find_key_by_code_point(code_point) else {
            continue;
        };
        if start_key.is_none() {
            start_key = Some(key_index);
        }
        end_key = Some(key_index);

        // Repeated letters collapse to one visit, matching how users swipe.
        if prev_key == Some(key_index) {
            continue;
        }

        let key = &layout.keys[key_index];
        key_points.push(RawPoint::new(key.center_x, key.center_y, key_count * MS_PER_KEY));
        prev_key = Some(key_index);
        key_count += 1;
    }

    if key_points.len() < 2 {
        return None;
    }

    let arc_len = path::arc_length(&key_points);
    let resampled = path::resample(&key_points, RESAMPLE_COUNT);
    let mut ideal = path::normalize_bounding_box(&resampled, arc_len);
    ideal.start_key_index = start_key;
    ideal.end_key_index = end_key;
    Some(ideal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::KeyDescriptor;

    fn row_layout() -> KeyboardLayout {
        // Four keys in a row: a s d f, plus one non-character key.
        let mut keys: Vec<KeyDescriptor> = "asdf"
            .bytes()
            .enumerate()
            .map(|(i, b)| {
                KeyDescriptor::new(
                    (b as char).to_string(),
                    i32::from(b),
                    20.0 + i as f32 * 30.0,
                    40.0,
                    30.0,
                    40.0,
                )
            })
            .collect();
        keys.push(KeyDescriptor::new("space", -1, 80.0, 90.0, 120.0, 30.0));
        KeyboardLayout {
            language_tag: "en".into(),
            keys,
            layout_width: 160.0,
            layout_height: 110.0,
        }
    }

    #[test]
    fn generates_valid_path_and_endpoint_keys() {
        let mut gen = IdealPathGenerator::new();
        gen.set_layout(row_layout());
        let path = gen.get_ideal_path("ads").unwrap();
        assert!(path.is_valid());
        assert_eq!(path.start_key_index, Some(0));
        assert_eq!(path.end_key_index, Some(1));
    }

    #[test]
    fn consecutive_duplicate_letters_collapse() {
        let mut gen = IdealPathGenerator::new();
        gen.set_layout(row_layout());
        // "assd" and "asd" trace the same key sequence.
        let doubled = gen.get_ideal_path("assd").unwrap().clone();
        let single = gen.get_ideal_path("asd").unwrap().clone();
        assert_eq!(doubled.points, single.points);
    }

    #[test]
    fn words_without_two_distinct_keys_have_no_path() {
        let mut gen = IdealPathGenerator::new();
        gen.set_layout(row_layout());
        assert!(gen.get_ideal_path("a").is_none());
        assert!(gen.get_ideal_path("aa").is_none());
        assert!(gen.get_ideal_path("zz").is_none());
        assert!(gen.get_ideal_path("").is_none());
        // Invalid words still occupy a cache slot.
        assert_eq!(gen.cache_size(), 4);
    }

    #[test]
    fn no_layout_means_no_path() {
        let mut gen = IdealPathGenerator::new();
        assert!(gen.get_ideal_path("asdf").is_none());
        assert_eq!(gen.cache_size(), 0);
    }

    #[test]
    fn generation_is_deterministic_and_case_insensitive() {
        let mut gen = IdealPathGenerator::new();
        gen.set_layout(row_layout());
        let first = gen.get_ideal_path("Fads").unwrap().clone();
        let second = gen.get_ideal_path("fads").unwrap().clone();
        assert_eq!(first, second);
        // Case variants share one cache entry.
        assert_eq!(gen.cache_size(), 1);
    }

    #[test]
    fn set_layout_clears_cache() {
        let mut gen = IdealPathGenerator::new();
        gen.set_layout(row_layout());
        gen.pregenerate(["asdf", "fda", "sad"]);
        assert_eq!(gen.cache_size(), 3);
        gen.set_layout(row_layout());
        assert_eq!(gen.cache_size(), 0);
    }

    #[test]
    fn clear_cache_empties_without_touching_layout() {
        let mut gen = IdealPathGenerator::new();
        gen.set_layout(row_layout());
        let _ = gen.get_ideal_path("asdf");
        assert_eq!(gen.cache_size(), 1);
        gen.clear_cache();
        assert_eq!(gen.cache_size(), 0);
        assert!(gen.get_ideal_path("asdf").is_some());
    }
}
