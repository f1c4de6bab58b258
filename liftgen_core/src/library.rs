//! Default exercise library, one pool of seeds per muscle group.
//!
//! The library is built once and shared read-only by every generation
//! request.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Cached default library
static DEFAULT_LIBRARY: Lazy<Library> = Lazy::new(build_default_library);

/// Mapping from muscle group to its exercise pool
#[derive(Clone, Debug)]
pub struct Library {
    pools: HashMap<MuscleGroup, ExercisePool>,
}

/// Get a reference to the cached default library
pub fn default_library() -> &'static Library {
    &DEFAULT_LIBRARY
}

const fn seed(name: &'static str, canonical_rest_seconds: u32) -> ExerciseSeed {
    ExerciseSeed {
        name,
        canonical_rest_seconds,
    }
}

/// Builds the default library
///
/// Prefer `default_library()`, which returns the cached copy.
pub fn build_default_library() -> Library {
    let mut pools = HashMap::new();

    pools.insert(
        MuscleGroup::Chest,
        ExercisePool {
            compound: vec![
                seed("Barbell Bench Press", 120),
                seed("Incline Dumbbell Press", 90),
                seed("Weighted Dip", 90),
            ],
            isolation: vec![seed("Cable Fly", 60), seed("Pec Deck", 60)],
        },
    );

    pools.insert(
        MuscleGroup::Back,
        ExercisePool {
            compound: vec![
                seed("Barbell Row", 120),
                seed("Lat Pulldown", 90),
                seed("Pull-Up", 120),
            ],
            isolation: vec![seed("Dumbbell Shrug", 60), seed("Back Extension", 60)],
        },
    );

    pools.insert(
        MuscleGroup::Shoulders,
        ExercisePool {
            compound: vec![
                seed("Overhead Press", 120),
                seed("Seated Dumbbell Shoulder Press", 90),
            ],
            isolation: vec![seed("Lateral Raise", 60), seed("Rear Delt Fly", 60)],
        },
    );

    pools.insert(
        MuscleGroup::Arms,
        ExercisePool {
            compound: vec![seed("Close-Grip Bench Press", 90), seed("Chin-Up", 90)],
            isolation: vec![
                seed("Barbell Curl", 60),
                seed("Triceps Pushdown", 60),
                seed("Hammer Curl", 60),
            ],
        },
    );

    pools.insert(
        MuscleGroup::Quads,
        ExercisePool {
            compound: vec![
                seed("Back Squat", 150),
                seed("Front Squat", 120),
                seed("Walking Lunge", 90),
            ],
            isolation: vec![seed("Leg Extension", 60)],
        },
    );

    pools.insert(
        MuscleGroup::Core,
        ExercisePool {
            compound: vec![seed("Ab Wheel Rollout", 60), seed("Pallof Press", 60)],
            isolation: vec![seed("Cable Crunch", 45), seed("Plank", 45)],
        },
    );

    pools.insert(
        MuscleGroup::Glutes,
        ExercisePool {
            compound: vec![seed("Hip Thrust", 90), seed("Bulgarian Split Squat", 90)],
            isolation: vec![seed("Cable Kickback", 60), seed("Glute Bridge", 60)],
        },
    );

    pools.insert(
        MuscleGroup::Hamstrings,
        ExercisePool {
            compound: vec![seed("Romanian Deadlift", 120)],
            isolation: vec![seed("Lying Leg Curl", 60), seed("Seated Leg Curl", 60)],
        },
    );

    pools.insert(
        MuscleGroup::Calves,
        ExercisePool {
            compound: vec![seed("Standing Calf Raise", 60)],
            isolation: vec![seed("Seated Calf Raise", 45)],
        },
    );

    pools.insert(
        MuscleGroup::Forearms,
        ExercisePool {
            compound: vec![seed("Farmer's Carry", 90)],
            isolation: vec![seed("Wrist Curl", 45), seed("Reverse Wrist Curl", 45)],
        },
    );

    Library { pools }
}

impl Library {
    /// Pool for a group; every group has one in the default library
    pub fn pool(&self, group: MuscleGroup) -> Option<&ExercisePool> {
        self.pools.get(&group)
    }

    /// Pools in canonical group order
    pub fn pools(&self) -> impl Iterator<Item = (MuscleGroup, &ExercisePool)> {
        MuscleGroup::ALL
            .iter()
            .filter_map(move |group| self.pools.get(group).map(|pool| (*group, pool)))
    }

    /// True if any of `groups` lists `name` (case-insensitive)
    pub fn in_groups(&self, groups: &[MuscleGroup], name: &str) -> bool {
        groups
            .iter()
            .filter_map(|group| self.pool(*group))
            .any(|pool| pool.contains(name))
    }

    /// Group whose pool lists `name`, if any
    pub fn find_group(&self, name: &str) -> Option<MuscleGroup> {
        self.pools()
            .find(|(_, pool)| pool.contains(name))
            .map(|(group, _)| group)
    }

    /// Validate the library for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for group in MuscleGroup::ALL {
            let Some(pool) = self.pools.get(&group) else {
                errors.push(format!("Group '{}' has no pool", group));
                continue;
            };

            if pool.compound.is_empty() {
                errors.push(format!("Group '{}' has no compound seed", group));
            }

            for seed in pool.seeds() {
                if seed.name.trim().is_empty() {
                    errors.push(format!("Group '{}' has a seed with an empty name", group));
                }
                if clamp_rest(seed.canonical_rest_seconds) != seed.canonical_rest_seconds {
                    errors.push(format!(
                        "Seed '{}' rest {}s is outside [{}, {}]",
                        seed.name, seed.canonical_rest_seconds, MIN_REST_SECONDS, MAX_REST_SECONDS
                    ));
                }
                if !seen.insert(seed.name.to_lowercase()) {
                    errors.push(format!("Seed '{}' appears more than once", seed.name));
                }
            }
        }

        errors
    }
}

/// Turn a seed into a session-ready exercise
///
/// Uses the seed's canonical rest and the library default of 10 reps.
pub fn make_session_exercise(seed: &ExerciseSeed, sets: u32) -> GeneratedExercise {
    GeneratedExercise::new(seed.name, sets, DEFAULT_REPS, seed.canonical_rest_seconds)
}
