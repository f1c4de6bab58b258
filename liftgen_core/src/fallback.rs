//! Library-only workout builder for when the AI response is unusable.

use crate::balancer::balance_with;
use crate::library::{default_library, make_session_exercise, Library};
use crate::policy::duration_config;
use crate::types::*;

/// Deterministic exercise list built straight from the default library
///
/// The result is not balanced yet; see [`quick_build`].
pub fn fallback(groups: &[MuscleGroup], target_minutes: u32) -> Vec<GeneratedExercise> {
    fallback_with(default_library(), groups, target_minutes)
}

/// Fallback list, balanced toward the target
pub fn quick_build(groups: &[MuscleGroup], target_minutes: u32) -> Vec<GeneratedExercise> {
    let library = default_library();
    let exercises = fallback_with(library, groups, target_minutes);
    balance_with(library, exercises, target_minutes, groups)
}

/// Build the fallback list against a specific library
///
/// 1. First compound seed of each group (every group if none selected)
/// 2. First isolation seed of each group while below `min_exercises`
/// 3. Any remaining seed in library order while below `min_exercises`
pub fn fallback_with(
    library: &Library,
    groups: &[MuscleGroup],
    target_minutes: u32,
) -> Vec<GeneratedExercise> {
    let config = duration_config(target_minutes);
    let groups = MuscleGroup::or_all(groups);
    let mut exercises: Vec<GeneratedExercise> = Vec::new();

    let push = |exercises: &mut Vec<GeneratedExercise>, seed: &ExerciseSeed| {
        if !exercises.iter().any(|e| e.name == seed.name) {
            exercises.push(make_session_exercise(seed, config.default_sets));
        }
    };

    for pool in groups.iter().filter_map(|g| library.pool(*g)) {
        if let Some(seed) = pool.compound.first() {
            push(&mut exercises, seed);
        }
    }

    for pool in groups.iter().filter_map(|g| library.pool(*g)) {
        if exercises.len() >= config.min_exercises {
            break;
        }
        if let Some(seed) = pool.isolation.first() {
            push(&mut exercises, seed);
        }
    }

    for (_, pool) in library.pools() {
        for seed in pool.seeds() {
            if exercises.len() >= config.min_exercises {
                break;
            }
            push(&mut exercises, seed);
        }
    }

    tracing::debug!(
        "Fallback built {} exercises for {} groups",
        exercises.len(),
        groups.len()
    );
    exercises
}
