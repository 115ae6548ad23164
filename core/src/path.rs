//! Gesture path types and normalization.
//!
//! A raw touch trajectory is deduplicated, resampled to a fixed point count
//! with the $1-recognizer arc-length scheme (Wobbrock et al., 2007), and
//! mapped into a `[0, 1]` bounding box with a uniform scale so the user's
//! path stays comparable to the reference paths generated for words.
//!
//! The resample and bounding-box helpers are shared with
//! [`crate::ideal::IdealPathGenerator`] so both sides of the comparison go
//! through identical arithmetic.

use crate::layout::KeyboardLayout;
use crate::{MIN_GESTURE_POINTS, MIN_POINT_DISTANCE_DP, RESAMPLE_COUNT};
use serde::{Deserialize, Serialize};

/// A single raw touch point in keyboard-local dp coordinates.
///
/// `t` is monotonic milliseconds from gesture start (first point = 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
    pub t: i64,
}

impl RawPoint {
    pub fn new(x: f32, y: f32, t: i64) -> Self {
        RawPoint { x, y, t }
    }
}

/// Unprocessed touch trajectory as captured by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    pub points: Vec<RawPoint>,
}

impl RawPath {
    pub fn new(points: Vec<RawPoint>) -> Self {
        RawPath { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the path has too few points to recognize.
    pub fn is_too_short(&self) -> bool {
        self.points.len() < MIN_GESTURE_POINTS
    }
}

/// A point of a normalized path; all components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
    pub t: f32,
}

impl NormalizedPoint {
    pub fn new(x: f32, y: f32, t: f32) -> Self {
        NormalizedPoint { x, y, t }
    }
}

/// The input to the scorer: exactly [`RESAMPLE_COUNT`] normalized points
/// plus the pre-normalization geometry the pipeline wants to keep around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPath {
    pub points: Vec<NormalizedPoint>,
    /// width/height of the pre-normalization bounding box (1.0 for flat
    /// paths).
    pub aspect_ratio: f32,
    /// Arc length of the path before normalization, in input units.
    pub total_arc_length: f32,
    /// Layout key nearest to the first raw touch point.
    pub start_key_index: Option<usize>,
    /// Layout key nearest to the last raw touch point.
    pub end_key_index: Option<usize>,
}

impl NormalizedPath {
    pub fn is_valid(&self) -> bool {
        self.points.len() == RESAMPLE_COUNT
    }
}

/// Transforms raw trajectories into normalized paths.
#[derive(Debug, Clone)]
pub struct PathProcessor {
    min_point_distance: f32,
    resample_count: usize,
}

impl Default for PathProcessor {
    fn default() -> Self {
        PathProcessor {
            min_point_distance: MIN_POINT_DISTANCE_DP,
            resample_count: RESAMPLE_COUNT,
        }
    }
}

impl PathProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_min_point_distance(&mut self, distance_dp: f32) {
        self.min_point_distance = distance_dp;
    }

    pub fn set_resample_count(&mut self, count: usize) {
        if count >= 2 {
            self.resample_count = count;
        }
    }

    /// Deduplicate, resample, and bounding-box-normalize a raw path.
    ///
    /// Start/end key indices are looked up from the raw endpoints, not the
    /// resampled ones, so endpoint fidelity survives resampling drift.
    /// Returns `None` when fewer than two points survive deduplication.
    pub fn normalize(&self, raw: &RawPath, layout: &KeyboardLayout) -> Option<NormalizedPath> {
        if raw.is_too_short() {
            return None;
        }

        let deduped = self.deduplicate(&raw.points);
        if deduped.len() < MIN_GESTURE_POINTS {
            return None;
        }

        let arc_len = arc_length(&deduped);
        let resampled = resample(&deduped, self.resample_count);
        let mut path = normalize_bounding_box(&resampled, arc_len);

        let first = raw.points[0];
        let last = raw.points[raw.points.len() - 1];
        path.start_key_index = layout.find_nearest_key(first.x, first.y);
        path.end_key_index = layout.find_nearest_key(last.x, last.y);

        Some(path)
    }

    /// Keep the first point, then every point at least `min_point_distance`
    /// from the last kept one. The final raw point is always kept.
    fn deduplicate(&self, points: &[RawPoint]) -> Vec<RawPoint> {
        if points.len() <= 2 {
            return points.to_vec();
        }

        let mut kept = Vec::with_capacity(points.len());
        kept.push(points[0]);
        for point in &points[1..points.len() - 1] {
            let last = kept[kept.len() - 1];
            if euclidean(last.x, last.y, point.x, point.y) >= self.min_point_distance {
                kept.push(*point);
            }
        }
        kept.push(points[points.len() - 1]);
        kept
    }
}

pub(crate) fn euclidean(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

pub(crate) fn arc_length(points: &[RawPoint]) -> f32 {
    points
        .windows(2)
        .map(|pair| euclidean(pair[0].x, pair[0].y, pair[1].x, pair[1].y))
        .sum()
}

/// Resample to exactly `count` approximately-equidistant points.
///
/// $1-recognizer style: walk adjacent segments accumulating length; when the
/// accumulator would cross the target interval, interpolate a new point
/// (position and timestamp), emit it, and splice it into the working list so
/// the remainder of the segment is re-examined.
pub(crate) fn resample(points: &[RawPoint], count: usize) -> Vec<RawPoint> {
    if points.len() < 2 || count < 2 {
        return points.to_vec();
    }

    let total_len = arc_length(points);
    if total_len < 1e-6 {
        return vec![points[0]; count];
    }

    let interval = total_len / (count - 1) as f32;
    let mut pts = points.to_vec();
    let mut out = Vec::with_capacity(count);
    out.push(pts[0]);

    let mut accumulated = 0.0f32;
    let mut i = 1;
    while i < pts.len() && out.len() < count - 1 {
        let dx = pts[i].x - pts[i - 1].x;
        let dy = pts[i].y - pts[i - 1].y;
        let d = (dx * dx + dy * dy).sqrt();

        if accumulated + d >= interval {
            let frac = (interval - accumulated) / d;
            let new_point = RawPoint {
                x: pts[i - 1].x + frac * dx,
                y: pts[i - 1].y + frac * dy,
                t: pts[i - 1].t + (frac * (pts[i].t - pts[i - 1].t) as f32) as i64,
            };
            out.push(new_point);
            pts.insert(i, new_point);
            accumulated = 0.0;
            i += 1;
        } else {
            accumulated += d;
            i += 1;
        }
    }

    // Floating-point drift can leave the output short of count.
    while out.len() < count {
        out.push(pts[pts.len() - 1]);
    }
    out.truncate(count);
    out
}

/// Map points into a `[0, 1]` box with uniform scale `max(width, height)`,
/// and timestamps linearly into `[0, 1]`.
pub(crate) fn normalize_bounding_box(points: &[RawPoint], total_arc_length: f32) -> NormalizedPath {
    let mut min_x = points[0].x;
    let mut max_x = points[0].x;
    let mut min_y = points[0].y;
    let mut max_y = points[0].y;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let width = max_x - min_x;
    let height = max_y - min_y;

    // Near-point path: nothing to scale.
    if width < 0.001 && height < 0.001 {
        return NormalizedPath {
            points: vec![NormalizedPoint::new(0.5, 0.5, 0.5); points.len()],
            aspect_ratio: 1.0,
            total_arc_length,
            start_key_index: None,
            end_key_index: None,
        };
    }

    let scale = width.max(height);
    let aspect_ratio = if height > 0.001 { width / height } else { 1.0 };

    let first_ts = points[0].t;
    let last_ts = points[points.len() - 1].t;
    let ts_range = (last_ts - first_ts) as f32;

    let normalized = points
        .iter()
        .map(|p| {
            let nt = if ts_range > 0.0 {
                (p.t - first_ts) as f32 / ts_range
            } else {
                0.5
            };
            NormalizedPoint::new((p.x - min_x) / scale, (p.y - min_y) / scale, nt)
        })
        .collect();

    NormalizedPath {
        points: normalized,
        aspect_ratio,
        total_arc_length,
        start_key_index: None,
        end_key_index: None,
    }
}
