//! Duration balancer.
//!
//! Adjusts a candidate exercise list until its estimated duration falls
//! within ±10% of the target:
//!
//! 1. Filter to the selected groups and clamp set counts to the bucket
//! 2. Order compound lifts before isolation work
//! 3. Cover every selected group
//! 4. Grow (add exercises, then sets) while under the window
//! 5. Shrink (drop isolation sets, then isolation exercises) while over it
//! 6. Top up to a floor of four exercises
//!
//! Compound lifts gain volume first and are trimmed last. Each loop stops
//! after `MAX_ITERATIONS` passes; an unreachable target just returns the
//! closest list reached.

use crate::estimator::estimate;
use crate::library::{default_library, make_session_exercise, Library};
use crate::policy::duration_config;
use crate::types::*;

/// Ceiling for each of the grow and shrink loops
pub const MAX_ITERATIONS: usize = 20;

/// Minimum exercise count of any balanced workout
pub const HARD_FLOOR_EXERCISES: usize = 4;

/// Name fragments that mark a multi-joint lift
const COMPOUND_KEYWORDS: [&str; 12] = [
    "press", "squat", "deadlift", "row", "pull", "bench", "lunge", "clean", "snatch", "chin",
    "dip", "overhead",
];

/// Case-insensitive keyword check for compound lifts
pub fn is_compound(name: &str) -> bool {
    let lowered = name.to_lowercase();
    COMPOUND_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Compound exercises first, each tier by name ascending
pub fn reorder(exercises: &mut [GeneratedExercise]) {
    exercises.sort_by(|a, b| {
        is_compound(&b.name)
            .cmp(&is_compound(&a.name))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Balance against the default library
pub fn balance(
    initial: Vec<GeneratedExercise>,
    target_minutes: u32,
    groups: &[MuscleGroup],
) -> Vec<GeneratedExercise> {
    balance_with(default_library(), initial, target_minutes, groups)
}

/// Balance an exercise list toward `target_minutes`
///
/// An empty `groups` selection means every group.
pub fn balance_with(
    library: &Library,
    initial: Vec<GeneratedExercise>,
    target_minutes: u32,
    groups: &[MuscleGroup],
) -> Vec<GeneratedExercise> {
    let config = duration_config(target_minutes);
    let groups = MuscleGroup::or_all(groups);
    let lower = f64::from(target_minutes) * 0.9;
    let upper = f64::from(target_minutes) * 1.1;

    let mut exercises = filter_to_groups(library, initial, &groups);

    for exercise in exercises.iter_mut() {
        let sets = exercise.set_count().clamp(config.min_sets, config.max_sets);
        exercise.resize_sets(sets);
    }
    reorder(&mut exercises);

    ensure_coverage(library, &mut exercises, &groups, &config);

    let mut iterations = 0;
    while f64::from(estimate(&exercises)) < lower && iterations < MAX_ITERATIONS {
        iterations += 1;
        if !grow_step(library, &mut exercises, &groups, &config) {
            tracing::debug!("Target {}m unreachable by growing, keeping current list", target_minutes);
            break;
        }
    }

    let mut iterations = 0;
    while f64::from(estimate(&exercises)) > upper && iterations < MAX_ITERATIONS {
        iterations += 1;
        if !shrink_step(&mut exercises, &config) {
            tracing::debug!("Target {}m unreachable by shrinking, keeping current list", target_minutes);
            break;
        }
    }

    while exercises.len() < HARD_FLOOR_EXERCISES {
        match next_unused_seed(library, &exercises, &groups) {
            Some(seed) => {
                let sets = config.default_sets.clamp(config.min_sets, config.max_sets);
                exercises.push(make_session_exercise(seed, sets));
            }
            None => break,
        }
    }

    tracing::info!(
        "Balanced workout: {} exercises, ~{}m for a {}m target",
        exercises.len(),
        estimate(&exercises),
        target_minutes
    );

    exercises
}

/// Keep exercises listed under a selected group, or everything if none are
fn filter_to_groups(
    library: &Library,
    exercises: Vec<GeneratedExercise>,
    groups: &[MuscleGroup],
) -> Vec<GeneratedExercise> {
    let matching: Vec<_> = exercises
        .iter()
        .filter(|e| library.in_groups(groups, &e.name))
        .cloned()
        .collect();

    if matching.is_empty() {
        tracing::debug!("No exercise matched the selected groups, keeping all {}", exercises.len());
        exercises
    } else {
        matching
    }
}

fn has_name(exercises: &[GeneratedExercise], name: &str) -> bool {
    exercises.iter().any(|e| e.name.eq_ignore_ascii_case(name))
}

/// Add the first compound seed of every selected group that has no exercise yet
fn ensure_coverage(
    library: &Library,
    exercises: &mut Vec<GeneratedExercise>,
    groups: &[MuscleGroup],
    config: &DurationConfig,
) {
    let mut added = false;
    for group in groups {
        let Some(pool) = library.pool(*group) else {
            continue;
        };
        if exercises.iter().any(|e| pool.contains(&e.name)) {
            continue;
        }
        if let Some(seed) = pool.compound.first() {
            tracing::debug!("Covering {} with {}", group, seed.name);
            exercises.push(make_session_exercise(seed, config.default_sets));
            added = true;
        }
    }
    if added {
        reorder(exercises);
    }
}

/// First seed not yet present: groups in selection order, isolation before compound
fn next_unused_seed<'a>(
    library: &'a Library,
    exercises: &[GeneratedExercise],
    groups: &[MuscleGroup],
) -> Option<&'a ExerciseSeed> {
    groups
        .iter()
        .filter_map(|group| library.pool(*group))
        .flat_map(|pool| pool.isolation.iter().chain(pool.compound.iter()))
        .find(|seed| !has_name(exercises, seed.name))
}

/// One growth move; false when nothing can grow
fn grow_step(
    library: &Library,
    exercises: &mut Vec<GeneratedExercise>,
    groups: &[MuscleGroup],
    config: &DurationConfig,
) -> bool {
    if exercises.len() < config.max_exercises {
        if let Some(seed) = next_unused_seed(library, exercises, groups) {
            let sets = config.default_sets.clamp(config.min_sets, config.max_sets);
            exercises.push(make_session_exercise(seed, sets));
            reorder(exercises);
            return true;
        }
    }

    let has_room = |e: &GeneratedExercise| e.set_count() < config.max_sets;
    let target = exercises
        .iter()
        .position(|e| is_compound(&e.name) && has_room(e))
        .or_else(|| exercises.iter().position(has_room));

    match target {
        Some(idx) => {
            exercises[idx].push_set();
            true
        }
        None => false,
    }
}

/// One shrink move; false when nothing can shrink
fn shrink_step(exercises: &mut Vec<GeneratedExercise>, config: &DurationConfig) -> bool {
    if let Some(idx) = exercises
        .iter()
        .rposition(|e| !is_compound(&e.name) && e.set_count() > config.min_sets)
    {
        return exercises[idx].pop_set();
    }

    if exercises.len() > config.min_exercises {
        if let Some(idx) = exercises.iter().rposition(|e| !is_compound(&e.name)) {
            let removed = exercises.remove(idx);
            tracing::trace!("Removed isolation exercise {}", removed.name);
            return true;
        }
    }

    if let Some(idx) = exercises
        .iter()
        .rposition(|e| e.set_count() > config.min_sets)
    {
        return exercises[idx].pop_set();
    }

    false
}
