//! Session duration estimate for a list of exercises.

use crate::types::GeneratedExercise;

/// Warmup budget added once per non-empty session
pub const WARMUP_SECONDS: u32 = 5 * 60;
/// Execution cost of a single set
pub const SECONDS_PER_SET: u32 = 45;
/// Changeover cost between consecutive exercises
pub const TRANSITION_SECONDS: u32 = 35;

/// Total estimated session length in seconds
///
/// Zero for an empty list (no warmup either).
pub fn estimate_seconds(exercises: &[GeneratedExercise]) -> u64 {
    if exercises.is_empty() {
        return 0;
    }

    let last = exercises.len() - 1;
    let mut total = u64::from(WARMUP_SECONDS);

    for (idx, exercise) in exercises.iter().enumerate() {
        let sets = u64::from(exercise.set_count().max(1));
        total += sets * u64::from(SECONDS_PER_SET);
        if sets > 1 {
            total += (sets - 1) * u64::from(exercise.rest_seconds);
        }
        if idx < last {
            total += u64::from(TRANSITION_SECONDS);
        }
    }

    total
}

/// Estimated session length in whole minutes (rounded half away from zero)
pub fn estimate(exercises: &[GeneratedExercise]) -> u32 {
    let seconds = estimate_seconds(exercises);
    (seconds as f64 / 60.0).round() as u32
}

/// Clamp an estimate into the ±10% window around the target
///
/// Only used for presentation; the exercise list is left alone.
pub fn display_minutes(estimated: u32, target_minutes: u32) -> u32 {
    let target = f64::from(target_minutes);
    f64::from(estimated)
        .clamp(target * 0.9, target * 1.1)
        .round() as u32
}
