//! Response parser for AI-generated workouts.
//!
//! The AI service is an untrusted text source. A response may be bare JSON,
//! JSON inside a fenced code block, JSON surrounded by prose, or plain
//! bullet lines. Parsing never fails: anything unusable degrades to an
//! empty exercise list and the caller falls back to the library.
//!
//! Order of attempts:
//! 1. JSON candidates (fenced blocks, brace/bracket spans, whole text)
//! 2. Line-based parsing of the raw text

use crate::types::*;
use once_cell::sync::Lazy;
use regex::{Match, Regex};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Title used when the response does not carry one
pub const DEFAULT_TITLE: &str = "AI Generated Workout";
/// Title used for library-built fallback content
pub const FALLBACK_TITLE: &str = "Quick Build";

/// How many times a JSON string value may be re-parsed as raw text
const MAX_EMBEDDED_DEPTH: usize = 4;

/// Keys searched, in order, for a nested workout payload
const NESTED_KEYS: [&str; 5] = ["workout", "template", "plan", "result", "data"];

/// Structural field names that must never become exercise names
const STRUCTURAL_NAMES: [&str; 16] = [
    "rest_seconds",
    "rest",
    "reps",
    "sets",
    "name",
    "exercise",
    "exercises",
    "notes",
    "title",
    "tempo",
    "duration",
    "weight",
    "muscle_groups",
    "equipment",
    "workout",
    "template",
];

const QUOTE_CHARS: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Separators between an exercise name and its prescription
const NAME_SEPARATORS: [&str; 4] = [" - ", " \u{2013} ", " \u{2014} ", ": "];

// ============================================================================
// Patterns
// ============================================================================

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static parser pattern")
}

/// Body of a fenced code block; group 1 is the content
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| regex(r"(?s)```[A-Za-z0-9_+-]*(.*?)```"));

/// A comma directly before a closing bracket or brace
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| regex(r",(\s*[}\]])"));

/// `a-b` rep range; groups 1 and 2 are the bounds
static REP_RANGE: Lazy<Regex> = Lazy::new(|| regex(r"(\d+)\s*[-\u{2013}]\s*(\d+)"));

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| regex(r"\d+"));

/// `3x8`, `4 × 8-10 reps`; group 1 is sets, group 2 is reps
static SETS_BY_REPS: Lazy<Regex> = Lazy::new(|| {
    regex(r"(?i)\b(\d+)\s*[x\u{00D7}]\s*(\d+(?:\s*[-\u{2013}]\s*\d+)?)(?:\s*reps?\b)?")
});

/// `3 sets of 8`, `4 sets x 10 reps`; group 1 is sets, group 2 is reps
static SETS_OF_REPS: Lazy<Regex> = Lazy::new(|| {
    regex(r"(?i)\b(\d+)\s*sets?\s*(?:of|x|\u{00D7})\s*(\d+(?:\s*[-\u{2013}]\s*\d+)?)(?:\s*reps?\b)?")
});

/// `rest 90s`, `Rest: 60 seconds`; group 1 is seconds
static REST_LEADING: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)\brest(?:ing)?\s*[:\-]?\s*(\d+)\s*(?:seconds|secs?|s)?\b"));

/// `90 sec rest`, `60s rest`; group 1 is seconds
static REST_TRAILING: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)\b(\d+)\s*(?:seconds|secs?|s)\s*rest\b"));

/// Bare `rest: 90`, `reps = 10`, `Sets 3` lines
static KEY_VALUE_LINE: Lazy<Regex> = Lazy::new(|| {
    regex(r#"(?i)^["']?(?:rest(?:[ _-]?(?:seconds|time))?|reps|sets)["']?\s*[:=]?\s*\d"#)
});

/// `1.` or `2)` list numbering
static LIST_NUMBER: Lazy<Regex> = Lazy::new(|| regex(r"^\d+[.)]\s+"));

// ============================================================================
// Field aliases
// ============================================================================

/// Logical exercise fields and their accepted spellings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Title,
    Exercises,
    Name,
    Sets,
    Reps,
    Rest,
}

impl Field {
    /// Aliases in priority order
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["title", "workout_name", "workoutName", "name"],
            Field::Exercises => &["exercises", "exercise_list", "exerciseList"],
            Field::Name => &[
                "name",
                "exercise",
                "exercise_name",
                "exerciseName",
                "movement",
                "movement_name",
                "movementName",
            ],
            Field::Sets => &["sets", "set_count", "setCount"],
            Field::Reps => &[
                "reps",
                "rep_range",
                "repRange",
                "repetitions",
                "rep_count",
                "repCount",
            ],
            Field::Rest => &[
                "rest_seconds",
                "restSeconds",
                "rest_time",
                "restTime",
                "rest_time_seconds",
                "restTimeSeconds",
                "rest",
            ],
        }
    }

    /// Values present under this field's aliases, in priority order
    fn values<'a>(self, object: &'a Map<String, Value>) -> impl Iterator<Item = &'a Value> {
        self.aliases().iter().filter_map(move |key| object.get(*key))
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse a raw AI response into a workout
///
/// Never fails; an unusable response yields an empty exercise list.
pub fn parse_response(raw: &str) -> ParsedGeneratedWorkout {
    parse_text(raw, 0)
}

/// JSON first, then lines; `depth` counts embedded-string re-parses
fn parse_text(raw: &str, depth: usize) -> ParsedGeneratedWorkout {
    if let Some(workout) = parse_json_payload(raw, depth) {
        tracing::debug!(
            "Parsed {} exercises from JSON payload",
            workout.exercises.len()
        );
        return workout;
    }

    let workout = parse_lines(raw);
    if workout.exercises.is_empty() {
        tracing::debug!("No exercises found in response ({} bytes)", raw.len());
    } else {
        tracing::debug!(
            "Parsed {} exercises from text lines",
            workout.exercises.len()
        );
    }
    workout
}

// ============================================================================
// JSON path
// ============================================================================

/// Strict shape: a top-level object with a list of exercise objects
#[derive(Debug, Deserialize)]
struct StrictWorkout {
    #[serde(alias = "exercise_list", alias = "exerciseList")]
    exercises: Vec<Map<String, Value>>,
    /// Everything else; the title is resolved from here
    #[serde(flatten)]
    rest: Map<String, Value>,
}

fn parse_json_payload(text: &str, depth: usize) -> Option<ParsedGeneratedWorkout> {
    for candidate in json_candidates(text) {
        let sanitized = strip_trailing_commas(&candidate);

        if let Ok(strict) = serde_json::from_str::<StrictWorkout>(&sanitized) {
            let exercises: Vec<_> = strict.exercises.iter().filter_map(resolve_exercise).collect();
            if !exercises.is_empty() {
                return Some(ParsedGeneratedWorkout {
                    title: resolve_title(Field::Title.values(&strict.rest).find_map(non_empty_str)),
                    exercises,
                });
            }
        }

        match serde_json::from_str::<Value>(&sanitized) {
            Ok(value) => {
                if let Some(workout) = extract_workout(&value, depth) {
                    return Some(workout);
                }
            }
            Err(e) => tracing::trace!("Candidate is not JSON: {}", e),
        }
    }
    None
}

/// Substrings that may hold a JSON payload, deduplicated, fenced blocks first
fn json_candidates(text: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        let normalized = candidate.trim();
        if !normalized.is_empty() && !candidates.iter().any(|c| c == normalized) {
            candidates.push(normalized.to_string());
        }
    };

    for caps in FENCED_BLOCK.captures_iter(text) {
        if let Some(body) = caps.get(1) {
            push(body.as_str());
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close)) {
            if start < end {
                push(&text[start..=end]);
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        push(trimmed);
    }

    candidates
}

fn strip_trailing_commas(json: &str) -> String {
    TRAILING_COMMA.replace_all(json, "$1").into_owned()
}

/// Recursively look for a title + exercises shape inside a JSON value
fn extract_workout(value: &Value, depth: usize) -> Option<ParsedGeneratedWorkout> {
    match value {
        Value::Object(object) => {
            if let Some(items) = Field::Exercises.values(object).find_map(Value::as_array) {
                let exercises = resolve_items(items);
                if !exercises.is_empty() {
                    let title = Field::Title.values(object).find_map(non_empty_str);
                    return Some(ParsedGeneratedWorkout {
                        title: resolve_title(title),
                        exercises,
                    });
                }
            }

            NESTED_KEYS
                .iter()
                .filter_map(|key| object.get(*key))
                .find_map(|nested| match nested {
                    Value::String(text) if depth < MAX_EMBEDDED_DEPTH => {
                        let embedded = parse_text(text, depth + 1);
                        (!embedded.exercises.is_empty()).then_some(embedded)
                    }
                    other => extract_workout(other, depth),
                })
        }
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .find_map(|item| extract_workout(item, depth))
            .or_else(|| {
                let exercises = resolve_items(items);
                (!exercises.is_empty()).then(|| ParsedGeneratedWorkout {
                    title: DEFAULT_TITLE.to_string(),
                    exercises,
                })
            }),
        _ => None,
    }
}

/// Exercises from a JSON array of objects or of one-line descriptions
fn resolve_items(items: &[Value]) -> Vec<GeneratedExercise> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(object) => resolve_exercise(object),
            Value::String(line) => parse_exercise_line(line),
            _ => None,
        })
        .collect()
}

fn resolve_title(title: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn resolve_exercise(object: &Map<String, Value>) -> Option<GeneratedExercise> {
    let name = Field::Name.values(object).find_map(non_empty_str)?.trim();
    if !is_acceptable_name(name) {
        tracing::trace!("Rejected exercise name {:?}", name);
        return None;
    }

    let sets = Field::Sets
        .values(object)
        .find_map(count_value)
        .unwrap_or(DEFAULT_SETS);
    let reps = Field::Reps
        .values(object)
        .find_map(reps_value)
        .unwrap_or_else(|| DEFAULT_REPS.to_string());
    let rest = Field::Rest
        .values(object)
        .find_map(integer_value)
        .unwrap_or(DEFAULT_REST_SECONDS);

    Some(GeneratedExercise::new(name, sets, reps, rest))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Non-negative integer from a number or the first digit run of a string
fn integer_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.min(u64::from(u32::MAX)) as u32)
            } else if n.as_i64().is_some() {
                Some(0)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.max(0.0).min(f64::from(u32::MAX)) as u32)
            }
        }
        Value::String(s) => first_integer(s),
        _ => None,
    }
}

/// Set count: an integer, or the length of a list of set objects
fn count_value(value: &Value) -> Option<u32> {
    match value {
        Value::Array(sets) if !sets.is_empty() => Some(sets.len().min(u32::MAX as usize) as u32),
        other => integer_value(other),
    }
}

fn reps_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(normalize_reps(s)),
        Value::Number(n) => Some(normalize_reps(&n.to_string())),
        _ => None,
    }
}

fn first_integer(text: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(|n| n.min(u64::from(u32::MAX)) as u32)
}

/// Keep an `a-b` range (whitespace stripped), else the first integer, else "10"
pub fn normalize_reps(text: &str) -> String {
    if let Some(caps) = REP_RANGE.captures(text) {
        return format!("{}-{}", &caps[1], &caps[2]);
    }
    FIRST_INTEGER
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_REPS.to_string())
}

/// True for names that are safe to show as an exercise
pub fn is_acceptable_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && !trimmed.starts_with(&QUOTE_CHARS[..])
        && !trimmed.ends_with(&QUOTE_CHARS[..])
        && !is_structural(trimmed)
}

fn is_structural(word: &str) -> bool {
    let lowered = word.trim().to_lowercase();
    STRUCTURAL_NAMES.contains(&lowered.as_str())
}

// ============================================================================
// Line path
// ============================================================================

fn parse_lines(raw: &str) -> ParsedGeneratedWorkout {
    let mut title = None;
    let mut exercises = Vec::new();

    for line in raw.lines() {
        let line = strip_list_marker(line);

        if let Some(heading) = line.strip_prefix('#') {
            if title.is_none() && exercises.is_empty() {
                let heading = heading.trim_start_matches('#').trim().replace("**", "");
                if !heading.is_empty() {
                    title = Some(heading);
                }
            }
            continue;
        }

        if let Some(exercise) = parse_exercise_line(line) {
            exercises.push(exercise);
        }
    }

    ParsedGeneratedWorkout {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        exercises,
    }
}

/// Strip bullet markers and list numbering
fn strip_list_marker(line: &str) -> &str {
    let mut line = line.trim();
    loop {
        let stripped = line
            .strip_prefix('-')
            .or_else(|| line.strip_prefix('\u{2022}'))
            .or_else(|| {
                // `**Bold**` is emphasis, not a bullet
                line.strip_prefix('*').filter(|rest| !rest.starts_with('*'))
            })
            .or_else(|| LIST_NUMBER.find(line).map(|m| &line[m.end()..]));

        match stripped {
            Some(rest) => line = rest.trim(),
            None => return line,
        }
    }
}

fn is_structural_line(line: &str) -> bool {
    let token = line.trim_end_matches(',').trim();
    if matches!(token, "{" | "}" | "[" | "]" | "{}" | "[]") || token.starts_with("```") {
        return true;
    }

    if let Some((key, _)) = token.split_once(':') {
        let key = key.trim_matches(|c: char| c.is_whitespace() || "{[\"'".contains(c));
        if is_structural(key) {
            return true;
        }
    }

    KEY_VALUE_LINE.is_match(token)
}

/// One exercise from a single line such as `Bench Press - 3x8, rest 90s`
///
/// A line must carry a sets/reps prescription to count as an exercise;
/// otherwise every sentence of chatty prose around a plan would become one.
fn parse_exercise_line(line: &str) -> Option<GeneratedExercise> {
    let line = strip_list_marker(line);
    if line.is_empty() || is_structural_line(line) {
        return None;
    }

    let caps = SETS_OF_REPS
        .captures(line)
        .or_else(|| SETS_BY_REPS.captures(line))?;
    let prescription = caps.get(0)?;
    let sets = caps
        .get(1)
        .and_then(|m| first_integer(m.as_str()))
        .unwrap_or(DEFAULT_SETS);
    let reps = caps
        .get(2)
        .map(|m| normalize_reps(m.as_str()))
        .unwrap_or_else(|| DEFAULT_REPS.to_string());

    let rest_match = REST_LEADING
        .captures(line)
        .or_else(|| REST_TRAILING.captures(line));
    let rest = rest_match
        .as_ref()
        .and_then(|c| c.get(1))
        .and_then(|m| first_integer(m.as_str()))
        .unwrap_or(DEFAULT_REST_SECONDS);
    let rest_span = rest_match.as_ref().and_then(|c| c.get(0));

    let name = line_name(line, prescription, rest_span);
    if !is_acceptable_name(&name) {
        return None;
    }

    Some(GeneratedExercise::new(name, sets, reps, rest))
}

/// The line minus its matched patterns, cut at the first name separator
fn line_name(line: &str, prescription: Match<'_>, rest: Option<Match<'_>>) -> String {
    let mut spans = vec![(prescription.start(), prescription.end())];
    if let Some(rest) = rest {
        spans.push((rest.start(), rest.end()));
    }
    spans.sort_unstable();

    let mut remainder = String::with_capacity(line.len());
    let mut cursor = 0;
    for (start, end) in spans {
        if start >= cursor {
            remainder.push_str(&line[cursor..start]);
        }
        cursor = cursor.max(end);
    }
    remainder.push_str(&line[cursor..]);

    // `3x8 - Squat` leaves nothing before the separator; keep the whole text then
    NAME_SEPARATORS
        .iter()
        .filter_map(|sep| remainder.find(sep))
        .min()
        .map(|pos| clean_name(&remainder[..pos]))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| clean_name(&remainder))
}

fn clean_name(raw: &str) -> String {
    raw.replace("**", "")
        .trim_matches(|c: char| c.is_whitespace() || "-\u{2013}\u{2014}:,;()|.".contains(c))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    fn names(workout: &ParsedGeneratedWorkout) -> Vec<&str> {
        workout.exercises.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_fenced_json_block() {
        let raw = "Here is your plan:\n```json\n{\"title\":\"Leg Day\",\"exercises\":[{\"name\":\"Squat\",\"sets\":4,\"reps\":\"6\"}]}\n```\nEnjoy!";
        let workout = parse_response(raw);

        assert_eq!(workout.title, "Leg Day");
        assert_eq!(workout.exercises.len(), 1);
        let squat = &workout.exercises[0];
        assert_eq!(squat.name, "Squat");
        assert_eq!(squat.set_count(), 4);
        assert_eq!(squat.reps_text(), "6");
        assert_eq!(squat.rest_seconds, 90);
        assert_eq!(squat.warmup_rest_seconds, 60);
    }

    #[test]
    fn test_line_parsing_skips_structural_keys() {
        let workout = parse_response("rest_seconds: 90\nBench Press - 3x8");

        assert_eq!(workout.exercises.len(), 1);
        assert_eq!(workout.exercises[0].name, "Bench Press");
        assert_eq!(workout.exercises[0].set_count(), 3);
        assert_eq!(workout.exercises[0].reps_text(), "8");
        assert_eq!(workout.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_json_in_prose_with_aliases() {
        let raw = r#"Sure! {"workoutName": "Push", "exercises": [
            {"exercise_name": "Incline Press", "setCount": "5", "rep_range": "8 - 12 reps", "restSeconds": 200},
            {"movement": "Cable Fly", "set_count": 2, "repetitions": 15, "rest_time": "45s"},
        ]} Good luck."#;
        let workout = parse_response(raw);

        assert_eq!(workout.title, "Push");
        assert_eq!(names(&workout), vec!["Incline Press", "Cable Fly"]);
        let press = &workout.exercises[0];
        assert_eq!(press.set_count(), 5);
        assert_eq!(press.reps_text(), "8-12");
        assert_eq!(press.rest_seconds, 150);
        let fly = &workout.exercises[1];
        assert_eq!(fly.set_count(), 2);
        assert_eq!(fly.reps_text(), "15");
        assert_eq!(fly.rest_seconds, 45);
        assert_eq!(fly.warmup_rest_seconds, 45);
    }

    #[test]
    fn test_set_count_is_clamped() {
        let raw = r#"{"exercises":[{"name":"Row","sets":12},{"name":"Curl","sets":0},{"name":"Dip","sets":"lots"}]}"#;
        let workout = parse_response(raw);
        let counts: Vec<_> = workout.exercises.iter().map(|e| e.set_count()).collect();
        assert_eq!(counts, vec![6, 1, 3]);
    }

    #[test]
    fn test_rest_is_clamped_and_defaulted() {
        let raw = r#"{"exercises":[{"name":"A","rest":5},{"name":"B","rest_seconds":"two minutes"},{"name":"C","rest":-20}]}"#;
        let rests: Vec<_> = parse_response(raw)
            .exercises
            .iter()
            .map(|e| e.rest_seconds)
            .collect();
        assert_eq!(rests, vec![30, 90, 30]);
    }

    #[test]
    fn test_reps_defaults() {
        let raw = r#"{"exercises":[{"name":"A","reps":"AMRAP"},{"name":"B"},{"name":"C","reps":"3x 12 each side"},{"name":"D","reps":8.0}]}"#;
        let reps: Vec<_> = parse_response(raw)
            .exercises
            .iter()
            .map(|e| e.reps_text().to_string())
            .collect();
        assert_eq!(reps, vec!["10", "10", "3", "8"]);
    }

    #[test]
    fn test_blocklisted_and_quoted_names_rejected() {
        let raw = r#"{"exercises":[
            {"name":"rest_seconds","sets":3},
            {"name":"REPS"},
            {"name":"\"Squat\""},
            {"name":"   "},
            {"name":"Deadlift","sets":2}
        ]}"#;
        let workout = parse_response(raw);
        assert_eq!(names(&workout), vec!["Deadlift"]);
    }

    #[test]
    fn test_nested_payload_keys() {
        let raw = r#"{"status":"ok","data":{"plan":{"title":"Pull","exercises":[{"name":"Barbell Row"}]}}}"#;
        let workout = parse_response(raw);
        assert_eq!(workout.title, "Pull");
        assert_eq!(names(&workout), vec!["Barbell Row"]);
        assert_eq!(workout.exercises[0].set_count(), 3);
    }

    #[test]
    fn test_template_envelope_with_embedded_text() {
        let inner = "```json\n{\"title\":\"Arms\",\"exercises\":[{\"name\":\"Hammer Curl\",\"sets\":3,\"reps\":12}]}\n```";
        let raw = serde_json::json!({ "template": inner }).to_string();
        let workout = parse_response(&raw);
        assert_eq!(workout.title, "Arms");
        assert_eq!(names(&workout), vec!["Hammer Curl"]);
    }

    #[test]
    fn test_top_level_array_of_exercises() {
        let raw = r#"[{"name":"Lunge","sets":3,"reps":"10-12"},{"name":"Plank","sets":2,"reps":"45"}]"#;
        let workout = parse_response(raw);
        assert_eq!(workout.title, DEFAULT_TITLE);
        assert_eq!(names(&workout), vec!["Lunge", "Plank"]);
        assert_eq!(workout.exercises[0].reps_text(), "10-12");
    }

    #[test]
    fn test_array_of_workouts() {
        let raw = r#"[{"title":"Day 1","exercises":[{"name":"Squat"}]},{"title":"Day 2","exercises":[{"name":"Bench"}]}]"#;
        let workout = parse_response(raw);
        assert_eq!(workout.title, "Day 1");
        assert_eq!(names(&workout), vec!["Squat"]);
    }

    #[test]
    fn test_string_exercise_items() {
        let raw = r#"{"title":"Quick","exercises":["Goblet Squat - 3x12","Push-Up 4 x 15"]}"#;
        let workout = parse_response(raw);
        assert_eq!(names(&workout), vec!["Goblet Squat", "Push-Up"]);
        assert_eq!(workout.exercises[1].set_count(), 4);
    }

    #[test]
    fn test_sets_as_list_of_objects() {
        let raw = r#"{"exercises":[{"name":"Press","sets":[{"reps":5},{"reps":5}],"reps":5}]}"#;
        let workout = parse_response(raw);
        assert_eq!(workout.exercises[0].set_count(), 2);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let raw = "- Curl - 3x10\n- Curl - 2x12";
        assert_eq!(parse_response(raw).exercises.len(), 2);
    }

    #[test]
    fn test_bullets_rest_and_heading() {
        let raw = "# Upper Body Blast\n\n\
                   1. **Barbell Row**: 4 sets of 8-10 reps, rest 120s\n\
                   • Lateral Raise 3 x 15 (60 sec rest)\n\
                   * Face Pull — 3x12\n\
                   Rest: 90 seconds between exercises\n\
                   Stay hydrated!";
        let workout = parse_response(raw);

        assert_eq!(workout.title, "Upper Body Blast");
        assert_eq!(names(&workout), vec!["Barbell Row", "Lateral Raise", "Face Pull"]);
        let row = &workout.exercises[0];
        assert_eq!(row.set_count(), 4);
        assert_eq!(row.reps_text(), "8-10");
        assert_eq!(row.rest_seconds, 120);
        assert_eq!(workout.exercises[1].rest_seconds, 60);
        assert_eq!(workout.exercises[1].reps_text(), "15");
        assert_eq!(workout.exercises[2].rest_seconds, 90);
    }

    #[test]
    fn test_malformed_json_falls_back_to_lines() {
        let raw = "{\n\"title\": \"Broken\",\n\"exercises\": [\n\"name\": \"Squat\",\n\"sets\": 4,\nSquat - 4x6\n";
        let workout = parse_response(raw);
        assert_eq!(names(&workout), vec!["Squat"]);
        assert_eq!(workout.exercises[0].set_count(), 4);
    }

    #[test]
    fn test_prose_yields_nothing() {
        let workout = parse_response("I'm sorry, I can't help with that today.");
        assert!(workout.exercises.is_empty());
        assert_eq!(workout.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_response("").exercises.is_empty());
        assert!(parse_response("```json\n```").exercises.is_empty());
    }

    #[test]
    fn test_json_without_exercises_uses_lines() {
        let raw = "{\"title\": \"Nothing\"}\nDeadlift - 5x5";
        let workout = parse_response(raw);
        assert_eq!(names(&workout), vec!["Deadlift"]);
        assert_eq!(workout.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_json_candidates_order_and_dedup() {
        let raw = "```\n{\"a\":1}\n```\n{\"a\":1}";
        let candidates = json_candidates(raw);
        assert_eq!(candidates[0], "{\"a\":1}");
        assert_eq!(
            candidates.iter().filter(|c| c.as_str() == "{\"a\":1}").count(),
            1
        );
    }

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(strip_trailing_commas("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(strip_trailing_commas("{\"a\":1,\n}"), "{\"a\":1\n}");
    }

    #[test]
    fn test_normalize_reps() {
        assert_eq!(normalize_reps("8 - 12"), "8-12");
        assert_eq!(normalize_reps("12 reps"), "12");
        assert_eq!(normalize_reps("to failure"), "10");
    }

    #[test]
    fn test_embedded_line_text_under_nested_keys() {
        let workout = parse_response(r#"{"workout": "Bench Press - 3x8\nBarbell Row - 4x10"}"#);
        assert_eq!(names(&workout), vec!["Bench Press", "Barbell Row"]);
        assert_eq!(workout.exercises[1].set_count(), 4);

        let workout = parse_response(r#"{"data": {"plan": "Squat - 5x5"}}"#);
        assert_eq!(names(&workout), vec!["Squat"]);
        assert_eq!(workout.exercises[0].reps_text(), "5");
    }

    #[test]
    fn test_name_key_titles_strict_shape() {
        let raw = r#"{"name":"Push Day","exercises":[{"name":"Dip","sets":3}]}"#;
        let workout = parse_response(raw);
        assert_eq!(workout.title, "Push Day");
        assert_eq!(names(&workout), vec!["Dip"]);
    }

    #[test]
    fn test_line_name_cut_at_separator_after_prescription() {
        let workout = parse_response("Squat 3x8 - heavy\n3x12 - Cable Fly");
        assert_eq!(names(&workout), vec!["Squat", "Cable Fly"]);
    }

    #[test]
    fn test_is_acceptable_name() {
        assert!(is_acceptable_name("Farmer's Carry"));
        assert!(!is_acceptable_name("Muscle_Groups"));
        assert!(!is_acceptable_name("'Row"));
        assert!(!is_acceptable_name(""));
    }

    fn assert_well_formed(workout: &ParsedGeneratedWorkout) -> Result<(), TestCaseError> {
        for e in &workout.exercises {
            prop_assert!(is_acceptable_name(&e.name), "bad name {:?}", e.name);
            prop_assert!((MIN_SETS..=MAX_SETS).contains(&e.set_count()));
            prop_assert!((MIN_REST_SECONDS..=MAX_REST_SECONDS).contains(&e.rest_seconds));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_arbitrary_text_never_panics(raw in "\\PC*") {
            assert_well_formed(&parse_response(&raw))?;
        }

        #[test]
        fn prop_list_like_text_yields_valid_exercises(
            raw in "([-*•#]? ?[0-9]{0,3}[.)]? ?[A-Za-z' ]{0,12}( [-:] )?[0-9]{0,2} ?[xX×]? ?[0-9]{0,3}(-[0-9]{1,2})?( rest [0-9]{1,4}s)?\n){0,8}",
        ) {
            assert_well_formed(&parse_response(&raw))?;
        }

        #[test]
        fn prop_json_like_text_yields_valid_exercises(
            raw in r#"[{}\[\]",:0-9a-z ]{0,120}"#,
        ) {
            assert_well_formed(&parse_response(&raw))?;
        }
    }
}
