//! libswipe-core
//!
//! Swipe-typing gesture recognition: given a continuous touch trajectory
//! over a soft keyboard and a dictionary of candidate words, produce a
//! ranked list of likely intended words with confidence scores.
//!
//! The pipeline runs path normalization, candidate filtering, cached
//! reference-path generation, band-constrained DTW scoring, and rank fusion
//! with word frequency. It is built for on-device use: single-threaded per
//! engine, no I/O after dictionary load, and a bounded worst case per
//! recognition.
//!
//! Public API:
//! - `Engine` - recognition engine orchestrating the pipeline
//! - `Dictionary` - binary lexicon store (`.glide` format)
//! - `KeyboardLayout` / `KeyDescriptor` - key geometry contract with the host
//! - `PathProcessor` - raw trajectory → normalized path
//! - `IdealPathGenerator` - per-word reference paths with memoization
//! - `Scorer` - DTW distance and confidence fusion
//! - `Candidate` - ranked result with diagnostics
//! - `Config` - tunable scoring parameters with TOML load/save

use serde::{Deserialize, Serialize};

pub mod candidate;
pub use candidate::{Candidate, SOURCE_COMPLETION, SOURCE_MAIN_DICT, SOURCE_USER_DICT};

pub mod dictionary;
pub use dictionary::{DictEntry, DictHeader, Dictionary};

pub mod error;
pub use error::{Error, ErrorCallback, ErrorKind};

pub mod layout;
pub use layout::{KeyDescriptor, KeyboardLayout};

pub mod path;
pub use path::{NormalizedPath, NormalizedPoint, PathProcessor, RawPath, RawPoint};

pub mod ideal;
pub use ideal::IdealPathGenerator;

pub mod scorer;
pub use scorer::Scorer;

pub mod engine;
pub use engine::Engine;

/// Points per normalized path. All normalized paths have exactly this many.
pub const RESAMPLE_COUNT: usize = 64;

/// Minimum Euclidean distance (dp) between consecutive kept raw points.
pub const MIN_POINT_DISTANCE_DP: f32 = 2.0;

/// Minimum raw points for a recognizable gesture.
pub const MIN_GESTURE_POINTS: usize = 2;

/// Sakoe-Chiba band width as a fraction of [`RESAMPLE_COUNT`].
pub const DTW_BANDWIDTH_RATIO: f32 = 0.10;

/// Weight of dictionary frequency in the fused score, in `[0, 1]`.
pub const FREQUENCY_WEIGHT: f32 = 0.30;

/// Candidates returned when a host does not ask for a specific count.
pub const DEFAULT_MAX_CANDIDATES: usize = 8;

/// Hard upper limit for the `max_candidates` parameter.
pub const MAX_MAX_CANDIDATES: usize = 20;

/// Tolerance (± characters) of the word-length pre-filter.
pub const LENGTH_FILTER_TOLERANCE: f32 = 3.0;

/// Floor for max-DTW normalization so a lone candidate keeps a meaningful
/// absolute confidence. A good gesture match typically lands at DTW
/// ~0.2–0.5, a poor one at ~2–4.
pub const MAX_DTW_FLOOR: f32 = 3.0;

/// Tunable parameters of the scoring pipeline.
///
/// Every field has the default shown in the constants above; any combination
/// is accepted and takes effect on the next `recognize`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Points per normalized path. The DTW scorer expects exactly
    /// [`RESAMPLE_COUNT`]; other values only make sense for processor-level
    /// experiments.
    pub resample_count: usize,

    /// Minimum distance (dp) between consecutive kept raw points.
    pub min_point_distance: f32,

    /// Sakoe-Chiba band width as a fraction of the resample count.
    pub dtw_bandwidth_ratio: f32,

    /// Weight of dictionary frequency in the fused score, in `[0, 1]`.
    pub frequency_weight: f32,

    /// Upper bound on candidates returned per recognition. The effective
    /// ceiling of a `recognize` call is the smaller of this and
    /// [`MAX_MAX_CANDIDATES`]; values above the hard limit cannot raise it.
    pub max_candidates_evaluated: usize,

    /// Tolerance (± characters) of the word-length pre-filter.
    pub length_filter_tolerance: f32,

    /// Floor for max-DTW normalization in the single-candidate case.
    pub max_dtw_floor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            resample_count: RESAMPLE_COUNT,
            min_point_distance: MIN_POINT_DISTANCE_DP,
            dtw_bandwidth_ratio: DTW_BANDWIDTH_RATIO,
            frequency_weight: FREQUENCY_WEIGHT,
            max_candidates_evaluated: MAX_MAX_CANDIDATES,
            length_filter_tolerance: LENGTH_FILTER_TOLERANCE,
            max_dtw_floor: MAX_DTW_FLOOR,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
