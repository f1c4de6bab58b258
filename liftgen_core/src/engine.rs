//! Generation pipeline.
//!
//! Turns the (possibly missing) AI response for a request into a balanced
//! workout:
//! - Unwrap the response envelope and parse it
//! - Fall back to the library when nothing usable came back
//! - Balance toward the target and estimate the result

use crate::balancer::balance_with;
use crate::estimator::{display_minutes, estimate};
use crate::fallback::fallback_with;
use crate::library::{default_library, Library};
use crate::parser::{parse_response, FALLBACK_TITLE};
use crate::request::{unwrap_envelope, GenerationRequest};
use crate::types::*;

/// Generate a workout against the default library
///
/// `response` is `None` when the AI call itself failed.
pub fn generate(response: Option<&str>, request: &GenerationRequest) -> GeneratedWorkout {
    generate_with(default_library(), response, request)
}

/// Generate a workout against a specific library
pub fn generate_with(
    library: &Library,
    response: Option<&str>,
    request: &GenerationRequest,
) -> GeneratedWorkout {
    let target = request.duration_minutes;
    let groups = &request.muscle_groups;

    let (title, candidates, source) = match response {
        None => {
            tracing::warn!("No AI response, building from library");
            (
                FALLBACK_TITLE.to_string(),
                fallback_with(library, groups, target),
                WorkoutSource::ServiceUnavailable,
            )
        }
        Some(body) if body.trim().is_empty() => {
            tracing::warn!("Empty AI response, building from library");
            (
                FALLBACK_TITLE.to_string(),
                fallback_with(library, groups, target),
                WorkoutSource::EmptyResponse,
            )
        }
        Some(body) => {
            let text = unwrap_envelope(body);
            let parsed = parse_response(&text);
            if parsed.exercises.is_empty() {
                tracing::warn!("AI response could not be parsed, building from library");
                (
                    FALLBACK_TITLE.to_string(),
                    fallback_with(library, groups, target),
                    WorkoutSource::Unparsed {
                        preview: text.trim().to_string(),
                    },
                )
            } else {
                (parsed.title, parsed.exercises, WorkoutSource::Parsed)
            }
        }
    };

    let exercises = balance_with(library, candidates, target, groups);
    let estimated_minutes = estimate(&exercises);

    tracing::info!(
        "Generated '{}' ({:?}): {} exercises, ~{}m",
        title,
        source,
        exercises.len(),
        estimated_minutes
    );

    GeneratedWorkout {
        title,
        exercises,
        target_minutes: target,
        estimated_minutes,
        display_minutes: display_minutes(estimated_minutes, target),
        source,
    }
}
