//! Recognition engine: orchestrates the pipeline from raw touch points to
//! ranked candidates.
//!
//! One engine owns its dictionary, layout, ideal-path cache, and error
//! state, and runs single-threaded: calls execute serially in caller order,
//! and nothing is shared across calls except the ideal-path cache.

use crate::candidate::{Candidate, SOURCE_MAIN_DICT};
use crate::dictionary::{DictEntry, Dictionary};
use crate::error::{Error, ErrorCallback};
use crate::ideal::IdealPathGenerator;
use crate::layout::KeyboardLayout;
use crate::path::{PathProcessor, RawPath};
use crate::scorer::{confidence_with_weight, Scorer};
use crate::{Config, MAX_MAX_CANDIDATES};
use std::path::Path;

/// When candidate DTW scores span less than this, the frequency weight is
/// scaled down so shape keeps deciding the ranking.
const COMPRESSED_DTW_RANGE: f32 = 0.5;

pub struct Engine {
    processor: PathProcessor,
    generator: IdealPathGenerator,
    scorer: Scorer,
    dictionary: Dictionary,
    layout: KeyboardLayout,
    config: Config,
    error_callback: Option<ErrorCallback>,
    last_error: Option<Error>,
    initialized: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            processor: PathProcessor::new(),
            generator: IdealPathGenerator::new(),
            scorer: Scorer::new(),
            dictionary: Dictionary::new(),
            layout: KeyboardLayout::default(),
            config: Config::default(),
            error_callback: None,
            last_error: None,
            initialized: false,
        }
    }

    /// Load a dictionary from a file and install the layout.
    ///
    /// Returns `false` on failure, leaving the engine un-initialized but
    /// recoverable by another `init` call.
    pub fn init<P: AsRef<Path>>(&mut self, layout: KeyboardLayout, dict_path: P) -> bool {
        if !self.check_layout(&layout) {
            return false;
        }
        if let Err(err) = self.dictionary.load(dict_path) {
            self.report(err);
            return false;
        }
        self.install_layout(layout);
        true
    }

    /// Load a dictionary from an in-memory buffer and install the layout.
    pub fn init_with_data(&mut self, layout: KeyboardLayout, dict_data: &[u8]) -> bool {
        if !self.check_layout(&layout) {
            return false;
        }
        if let Err(err) = self.dictionary.load_from_memory(dict_data) {
            self.report(err);
            return false;
        }
        self.install_layout(layout);
        true
    }

    /// Recognize a gesture, returning at most `max_candidates` ranked
    /// candidates. The request is clamped to `1..=MAX_MAX_CANDIDATES`, with
    /// `Config::max_candidates_evaluated` lowering (never raising) the
    /// ceiling.
    ///
    /// Validation failures (not initialized, path too short) return an empty
    /// list and go through the error channel; they are not fatal.
    pub fn recognize(&mut self, raw: &RawPath, max_candidates: usize) -> Vec<Candidate> {
        if !self.initialized {
            self.report(Error::EngineNotInitialized);
            return Vec::new();
        }
        let cap = self
            .config
            .max_candidates_evaluated
            .min(MAX_MAX_CANDIDATES)
            .max(1);
        let max_candidates = max_candidates.clamp(1, cap);
        if raw.is_too_short() {
            self.report(Error::PathTooShort);
            return Vec::new();
        }

        let Some(gesture) = self.processor.normalize(raw, &self.layout) else {
            return Vec::new();
        };

        let start_char = self.key_char(gesture.start_key_index);
        let end_char = self.key_char(gesture.end_key_index);
        tracing::debug!(
            start = ?start_char.map(char::from),
            end = ?end_char.map(char::from),
            raw_points = raw.len(),
            "gesture normalized"
        );

        // Candidate filtering: start+end letters, then start letter only,
        // then the whole dictionary.
        let mut entries: Vec<&DictEntry> = Vec::new();
        if let (Some(s), Some(e)) = (start_char, end_char) {
            entries = self.dictionary.entries_with_start_end(s, e);
        }
        if entries.is_empty() {
            if let Some(s) = start_char {
                entries = self.dictionary.entries_starting_with(s);
            }
        }
        if entries.is_empty() {
            entries = self.dictionary.all_entries().iter().collect();
        }

        // Length pre-filter on nearest-key transitions along the raw path.
        // Arc-length estimates over-count zigzag words; transitions track the
        // number of keys actually visited.
        let estimated_len = self.estimate_word_length(raw);
        let tolerance = self.config.length_filter_tolerance;
        let length_filtered: Vec<&DictEntry> = entries
            .iter()
            .copied()
            .filter(|e| (e.word.len() as f32 - estimated_len).abs() <= tolerance)
            .collect();
        tracing::debug!(
            %estimated_len,
            before = entries.len(),
            after = length_filtered.len(),
            "length pre-filter"
        );
        let filtered = if length_filtered.is_empty() {
            // Over-filtering is worse than under-filtering; score them all.
            entries
        } else {
            length_filtered
        };

        // Score every surviving entry against its ideal path.
        let mut scored: Vec<(&DictEntry, f32)> = Vec::with_capacity(filtered.len());
        for entry in filtered {
            let Some(ideal) = self.generator.get_ideal_path(&entry.word) else {
                continue;
            };
            let dtw = self.scorer.dtw_distance(&gesture, ideal);
            scored.push((entry, dtw));
        }
        if scored.is_empty() {
            return Vec::new();
        }

        // Normalization constants. Ranking multiple candidates uses the
        // actual max DTW (with a tiny division guard); a lone candidate uses
        // the larger floor so it does not normalize to 1.0 and lose all
        // confidence.
        let mut raw_max_dtw = 0.0f32;
        let mut min_dtw = f32::INFINITY;
        for (_, dtw) in &scored {
            if dtw.is_finite() {
                raw_max_dtw = raw_max_dtw.max(*dtw);
                min_dtw = min_dtw.min(*dtw);
            }
        }
        let max_dtw = if scored.len() <= 1 {
            raw_max_dtw.max(self.config.max_dtw_floor)
        } else {
            raw_max_dtw.max(0.01)
        };

        // Adaptive frequency weight: when shape scores are compressed,
        // frequency must not dominate the ranking.
        let raw_range = if min_dtw.is_finite() {
            raw_max_dtw - min_dtw
        } else {
            0.0
        };
        let mut alpha = self.config.frequency_weight;
        if scored.len() > 1 && raw_range < COMPRESSED_DTW_RANGE {
            alpha *= (raw_range / COMPRESSED_DTW_RANGE).max(0.1);
        }

        tracing::debug!(
            scored = scored.len(),
            %min_dtw,
            %raw_max_dtw,
            %max_dtw,
            %raw_range,
            %alpha,
            "scoring constants"
        );

        let max_freq = self.dictionary.max_frequency();
        let mut results: Vec<Candidate> = scored
            .iter()
            .map(|(entry, dtw)| Candidate {
                word: entry.word.clone(),
                confidence: confidence_with_weight(*dtw, max_dtw, entry.frequency, max_freq, alpha),
                source_flags: SOURCE_MAIN_DICT,
                dtw_score: *dtw,
                frequency_score: if max_freq > 0 {
                    entry.frequency as f32 / max_freq as f32
                } else {
                    0.0
                },
            })
            .collect();

        // Stable sort: ties keep their original (dictionary) order.
        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(max_candidates);
        results
    }

    /// Replace the layout, clearing the ideal-path cache. The dictionary is
    /// kept.
    pub fn update_layout(&mut self, layout: KeyboardLayout) -> bool {
        if !self.initialized {
            return false;
        }
        if !self.check_layout(&layout) {
            return false;
        }
        self.generator.set_layout(layout.clone());
        self.layout = layout;
        true
    }

    /// Install new scoring parameters; they take effect on the next
    /// `recognize`.
    pub fn configure(&mut self, config: Config) {
        self.processor.set_min_point_distance(config.min_point_distance);
        self.processor.set_resample_count(config.resample_count);
        self.scorer.configure(&config);
        self.config = config;
    }

    pub fn set_error_callback(&mut self, callback: ErrorCallback) {
        self.error_callback = Some(callback);
    }

    /// Unload the dictionary and clear caches. Idempotent.
    pub fn shutdown(&mut self) {
        self.dictionary.unload();
        self.generator.clear_cache();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Entries currently memoized in the ideal-path cache.
    pub fn cache_size(&self) -> usize {
        self.generator.cache_size()
    }

    /// Warm the ideal-path cache for a batch of words.
    pub fn pregenerate<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.generator.pregenerate(words);
    }

    fn check_layout(&mut self, layout: &KeyboardLayout) -> bool {
        if layout.is_valid() {
            return true;
        }
        self.report(Error::LayoutInvalid(
            "no character keys or non-positive dimensions".into(),
        ));
        false
    }

    fn install_layout(&mut self, layout: KeyboardLayout) {
        self.generator.set_layout(layout.clone());
        self.layout = layout;
        self.scorer.configure(&self.config);
        self.initialized = true;
    }

    /// Lowercased ASCII letter of the key at `index`, if it is one.
    fn key_char(&self, index: Option<usize>) -> Option<u8> {
        let key = &self.layout.keys[index?];
        let cp = key.code_point;
        match u8::try_from(cp).ok()? {
            b @ b'a'..=b'z' => Some(b),
            b @ b'A'..=b'Z' => Some(b.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Word length estimate: distinct consecutive nearest keys along the raw
    /// (un-deduplicated) path. A key transition increments the count;
    /// revisits of the current key do not.
    fn estimate_word_length(&self, raw: &RawPath) -> f32 {
        if raw.points.len() < 2 {
            return 1.0;
        }
        let mut prev: Option<usize> = None;
        let mut transitions = 0u32;
        for point in &raw.points {
            if let Some(key) = self.layout.find_nearest_key(point.x, point.y) {
                if prev != Some(key) {
                    transitions += 1;
                    prev = Some(key);
                }
            }
        }
        (transitions as f32).max(1.0)
    }

    fn report(&mut self, error: Error) {
        tracing::warn!(%error, "engine error");
        if let Some(callback) = &self.error_callback {
            callback(&error);
        }
        self.last_error = Some(error);
    }
}
