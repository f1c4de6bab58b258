//! Duration policy table.
//!
//! Maps a target session length onto exercise and set bounds. Lookups are
//! total: every minute value resolves to exactly one bucket.

use crate::types::DurationConfig;
use serde::Serialize;

/// Fixed target-duration buckets
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    Min20,
    Min30,
    Min45,
    Min60,
    Min75,
    Other,
}

/// Buckets with an exact minute value, shortest first
const TIMED_BUCKETS: [(u32, DurationBucket); 5] = [
    (20, DurationBucket::Min20),
    (30, DurationBucket::Min30),
    (45, DurationBucket::Min45),
    (60, DurationBucket::Min60),
    (75, DurationBucket::Min75),
];

impl DurationBucket {
    /// Resolve a minute value to its bucket
    ///
    /// Exact matches win; anything longer than 75 minutes is `Other`;
    /// everything else snaps to the nearest bucket, ties going to the
    /// shorter one.
    pub fn for_minutes(minutes: u32) -> Self {
        if let Some((_, bucket)) = TIMED_BUCKETS.iter().find(|(m, _)| *m == minutes) {
            return *bucket;
        }
        if minutes > 75 {
            return DurationBucket::Other;
        }

        TIMED_BUCKETS
            .iter()
            .min_by_key(|(m, _)| m.abs_diff(minutes))
            .map(|(_, bucket)| *bucket)
            .unwrap_or(DurationBucket::Other)
    }

    pub fn config(&self) -> DurationConfig {
        let (min_exercises, max_exercises, min_sets, max_sets, default_sets) = match self {
            DurationBucket::Min20 => (3, 4, 2, 3, 2),
            DurationBucket::Min30 => (4, 5, 2, 4, 3),
            DurationBucket::Min45 => (5, 7, 3, 4, 3),
            DurationBucket::Min60 => (6, 8, 3, 5, 4),
            DurationBucket::Min75 => (7, 9, 3, 5, 4),
            DurationBucket::Other => (8, 10, 3, 6, 4),
        };

        DurationConfig {
            min_exercises,
            max_exercises,
            min_sets,
            max_sets,
            default_sets,
        }
    }
}

/// Policy for a target duration
pub fn duration_config(target_minutes: u32) -> DurationConfig {
    DurationBucket::for_minutes(target_minutes).config()
}
