//! Ranked recognition candidates.

use serde::{Deserialize, Serialize};

/// Candidate came from the main dictionary.
pub const SOURCE_MAIN_DICT: u32 = 0x01;
/// Reserved for host-side user dictionaries.
pub const SOURCE_USER_DICT: u32 = 0x02;
/// Reserved for host-side completion suggestions.
pub const SOURCE_COMPLETION: u32 = 0x04;

/// A recognized word with its confidence and scoring diagnostics.
///
/// Confidence is in `[0, 1]`; higher is better. `dtw_score` and
/// `frequency_score` are kept so hosts can inspect why a word ranked where
/// it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub word: String,
    pub confidence: f32,
    /// Bitmask of `SOURCE_*` flags.
    pub source_flags: u32,
    /// Raw DTW distance against the word's ideal path.
    pub dtw_score: f32,
    /// Word frequency normalized against the dictionary maximum, in `[0, 1]`.
    pub frequency_score: f32,
}

impl Candidate {
    pub fn new<T: Into<String>>(word: T, confidence: f32) -> Self {
        Candidate {
            word: word.into(),
            confidence,
            source_flags: SOURCE_MAIN_DICT,
            dtw_score: 0.0,
            frequency_score: 0.0,
        }
    }
}
