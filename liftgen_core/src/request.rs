//! User selection for one generation request and the payload sent upstream.

use crate::types::MuscleGroup;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the user picked before asking for a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub muscle_groups: Vec<MuscleGroup>,
    /// Forwarded upstream only; the engine ignores equipment
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub workout_type: Option<String>,
    pub duration_minutes: u32,
}

impl GenerationRequest {
    pub fn new(muscle_groups: Vec<MuscleGroup>, duration_minutes: u32) -> Self {
        Self {
            muscle_groups,
            equipment: Vec::new(),
            workout_type: None,
            duration_minutes,
        }
    }

    /// Caller-level checks run before the AI service is contacted
    pub fn validate(&self) -> Result<()> {
        if self.muscle_groups.is_empty() {
            return Err(Error::Validation("pick at least one muscle group".into()));
        }
        if self.duration_minutes == 0 {
            return Err(Error::Validation("duration must be at least one minute".into()));
        }
        Ok(())
    }

    /// JSON input handed to the workout-generation prompt
    pub fn prompt_input(&self) -> Value {
        serde_json::json!({
            "muscle_groups": self.muscle_groups,
            "workout_type": self.workout_type,
            "equipment": self.equipment,
            "duration_minutes": self.duration_minutes,
        })
    }
}

/// Envelope returned by the generation endpoint
#[derive(Debug, Deserialize)]
struct TemplateEnvelope {
    template: String,
}

/// Inner text of a `{"template": "..."}` response, or the body unchanged
pub fn unwrap_envelope(body: &str) -> String {
    match serde_json::from_str::<TemplateEnvelope>(body.trim()) {
        Ok(envelope) => {
            tracing::debug!("Unwrapped template envelope ({} bytes)", envelope.template.len());
            envelope.template
        }
        Err(_) => body.to_string(),
    }
}
