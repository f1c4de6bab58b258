//! Core domain types for the workout generation engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Muscle groups and library seeds
//! - Generated exercises and their sets
//! - Duration policy bounds
//! - Parsed and final generation results
//! - Saved workout templates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Clamp bounds
// ============================================================================

/// Shortest rest interval accepted anywhere in the engine
pub const MIN_REST_SECONDS: u32 = 30;
/// Longest rest interval accepted anywhere in the engine
pub const MAX_REST_SECONDS: u32 = 150;
/// Rest used when a response does not specify one
pub const DEFAULT_REST_SECONDS: u32 = 90;
/// Warmup rest is capped at this value
pub const WARMUP_REST_CAP_SECONDS: u32 = 60;

/// Set count bounds applied when an exercise is created
pub const MIN_SETS: u32 = 1;
pub const MAX_SETS: u32 = 6;
/// Set count used when a response does not specify one
pub const DEFAULT_SETS: u32 = 3;
/// Reps text used when a response does not specify one
pub const DEFAULT_REPS: &str = "10";

pub fn clamp_rest(rest_seconds: u32) -> u32 {
    rest_seconds.clamp(MIN_REST_SECONDS, MAX_REST_SECONDS)
}

pub fn clamp_sets(sets: u32) -> u32 {
    sets.clamp(MIN_SETS, MAX_SETS)
}

// ============================================================================
// Muscle Groups
// ============================================================================

/// Muscle group keys understood by the exercise library
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Quads,
    Core,
    Glutes,
    Hamstrings,
    Calves,
    Forearms,
}

impl MuscleGroup {
    /// Every group, in library iteration order
    pub const ALL: [MuscleGroup; 10] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Quads,
        MuscleGroup::Core,
        MuscleGroup::Glutes,
        MuscleGroup::Hamstrings,
        MuscleGroup::Calves,
        MuscleGroup::Forearms,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Core => "core",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Calves => "calves",
            MuscleGroup::Forearms => "forearms",
        }
    }

    /// Resolve an empty selection to every group
    pub fn or_all(groups: &[MuscleGroup]) -> Vec<MuscleGroup> {
        if groups.is_empty() {
            Self::ALL.to_vec()
        } else {
            groups.to_vec()
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MuscleGroup {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let normalized = s.trim().to_lowercase();
        MuscleGroup::ALL
            .iter()
            .copied()
            .find(|group| group.key() == normalized)
            .ok_or_else(|| crate::Error::UnknownMuscleGroup(s.trim().to_string()))
    }
}

// ============================================================================
// Library Types
// ============================================================================

/// A static library entry used to synthesize a generated exercise
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ExerciseSeed {
    pub name: &'static str,
    pub canonical_rest_seconds: u32,
}

/// Seeds for one muscle group, split by tier
#[derive(Clone, Debug, Serialize)]
pub struct ExercisePool {
    pub compound: Vec<ExerciseSeed>,
    pub isolation: Vec<ExerciseSeed>,
}

impl ExercisePool {
    /// Compound seeds followed by isolation seeds
    pub fn seeds(&self) -> impl Iterator<Item = &ExerciseSeed> {
        self.compound.iter().chain(self.isolation.iter())
    }

    /// Case-insensitive membership check across both tiers
    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.seeds().any(|seed| seed.name.to_lowercase() == needle)
    }
}

// ============================================================================
// Generated Exercises
// ============================================================================

/// One planned set of an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetEntry {
    pub reps_text: String,
    #[serde(default)]
    pub weight_text: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl SetEntry {
    pub fn new(reps_text: impl Into<String>) -> Self {
        Self {
            reps_text: reps_text.into(),
            weight_text: String::new(),
            is_complete: false,
        }
    }

    /// Copy reps and weight into a fresh, incomplete set
    fn planned_copy(&self) -> Self {
        Self {
            reps_text: self.reps_text.clone(),
            weight_text: self.weight_text.clone(),
            is_complete: false,
        }
    }
}

/// An exercise produced by the parser or the fallback generator
///
/// Always holds at least one set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedExercise {
    pub name: String,
    pub sets: Vec<SetEntry>,
    pub rest_seconds: u32,
    pub warmup_rest_seconds: u32,
}

impl GeneratedExercise {
    /// Build an exercise, clamping sets to [1, 6] and rest to [30, 150]
    pub fn new(
        name: impl Into<String>,
        set_count: u32,
        reps_text: impl Into<String>,
        rest_seconds: u32,
    ) -> Self {
        let rest_seconds = clamp_rest(rest_seconds);
        let set = SetEntry::new(reps_text);
        Self {
            name: name.into(),
            sets: vec![set; clamp_sets(set_count) as usize],
            rest_seconds,
            warmup_rest_seconds: rest_seconds.min(WARMUP_REST_CAP_SECONDS),
        }
    }

    pub fn set_count(&self) -> u32 {
        self.sets.len() as u32
    }

    /// Reps text of the first set, or the default when there is none
    pub fn reps_text(&self) -> &str {
        self.sets
            .first()
            .map(|s| s.reps_text.as_str())
            .unwrap_or(DEFAULT_REPS)
    }

    /// Grow or shrink to exactly `count` sets (never below one)
    ///
    /// New sets copy the first set's reps and weight.
    pub fn resize_sets(&mut self, count: u32) {
        let count = count.max(1) as usize;
        if self.sets.len() > count {
            self.sets.truncate(count);
            return;
        }
        let template = self
            .sets
            .first()
            .map(SetEntry::planned_copy)
            .unwrap_or_else(|| SetEntry::new(DEFAULT_REPS));
        self.sets.resize(count, template);
    }

    /// Append one set cloned from the last set
    pub fn push_set(&mut self) {
        let next = self
            .sets
            .last()
            .map(SetEntry::planned_copy)
            .unwrap_or_else(|| SetEntry::new(DEFAULT_REPS));
        self.sets.push(next);
    }

    /// Drop the last set; returns false when only one set is left
    pub fn pop_set(&mut self) -> bool {
        if self.sets.len() <= 1 {
            return false;
        }
        self.sets.pop();
        true
    }
}

// ============================================================================
// Policy and Results
// ============================================================================

/// Exercise and set bounds for one duration bucket
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct DurationConfig {
    pub min_exercises: usize,
    pub max_exercises: usize,
    pub min_sets: u32,
    pub max_sets: u32,
    pub default_sets: u32,
}

/// Transient result of parsing one AI response
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ParsedGeneratedWorkout {
    pub title: String,
    pub exercises: Vec<GeneratedExercise>,
}

/// Where the exercises of a generated workout came from
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutSource {
    /// The AI response yielded usable exercises
    Parsed,
    /// The AI returned text, but nothing structured could be extracted
    Unparsed { preview: String },
    /// The AI returned an empty body
    EmptyResponse,
    /// The AI call failed before returning anything
    ServiceUnavailable,
}

impl WorkoutSource {
    /// User-facing notice for results built from the fallback generator
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            WorkoutSource::Parsed => None,
            WorkoutSource::Unparsed { .. } => {
                Some("The AI response couldn't be parsed, using quick build")
            }
            WorkoutSource::EmptyResponse => Some("The AI returned nothing, using quick build"),
            WorkoutSource::ServiceUnavailable => Some("Server unavailable, using quick build"),
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, WorkoutSource::Parsed)
    }
}

/// Final, balanced result of one generation request
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedWorkout {
    pub title: String,
    pub exercises: Vec<GeneratedExercise>,
    pub target_minutes: u32,
    /// Raw estimator output for `exercises`
    pub estimated_minutes: u32,
    /// Estimate clamped into the ±10% window, for presentation only
    pub display_minutes: u32,
    pub source: WorkoutSource,
}

// ============================================================================
// Saved Templates
// ============================================================================

/// One exercise row of a saved template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateExercise {
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,
    pub sets: u32,
    /// Lower bound of the reps text; ranges keep only their first number
    pub reps: u32,
    pub rest_seconds: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A generated workout saved for reuse
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "ai" for parsed responses, "quick_build" for library fallbacks
    pub mode: String,
    pub created_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub exercises: Vec<TemplateExercise>,
}
