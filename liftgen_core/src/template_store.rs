//! Saved workout templates.
//!
//! Templates are appended to a JSONL (JSON Lines) file with file locking
//! so concurrent CLI invocations never interleave writes.

use crate::library::{default_library, Library};
use crate::types::*;
use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Sink for saved templates
pub trait TemplateSink {
    fn append(&mut self, template: &WorkoutTemplate) -> Result<()>;
}

/// JSONL-backed template store
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Read every template, skipping lines that fail to parse
    pub fn read_all(&self) -> Result<Vec<WorkoutTemplate>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let templates = read_templates(&file);
        file.unlock()?;

        let templates = templates?;
        tracing::debug!("Read {} templates from {:?}", templates.len(), self.path);
        Ok(templates)
    }

    /// Remove a template; false if no template has that id
    pub fn delete(&mut self, id: Uuid) -> Result<bool> {
        let mut removed = false;
        self.rewrite(|templates| {
            let before = templates.len();
            templates.retain(|t| t.id != id);
            removed = templates.len() != before;
        })?;

        if removed {
            tracing::info!("Deleted template {}", id);
        } else {
            tracing::warn!("Template {} not found, nothing deleted", id);
        }
        Ok(removed)
    }

    /// Append a copy of a template under a new id
    ///
    /// The copy is titled `title`, or "<original title> Copy" when none is
    /// given. Returns `None` if no template has that id.
    pub fn duplicate(&mut self, id: Uuid, title: Option<&str>) -> Result<Option<WorkoutTemplate>> {
        let mut copy = None;
        self.rewrite(|templates| {
            if let Some(original) = templates.iter().find(|t| t.id == id) {
                let mut duplicate = original.clone();
                duplicate.id = Uuid::new_v4();
                duplicate.created_at = Utc::now();
                duplicate.title = match title.map(str::trim).filter(|t| !t.is_empty()) {
                    Some(title) => title.to_string(),
                    None => format!("{} Copy", original.title),
                };
                templates.push(duplicate.clone());
                copy = Some(duplicate);
            }
        })?;

        match &copy {
            Some(duplicate) => tracing::info!("Duplicated template {} as {}", id, duplicate.id),
            None => tracing::warn!("Template {} not found, nothing duplicated", id),
        }
        Ok(copy)
    }

    /// Read, edit and rewrite the whole store under one exclusive lock
    ///
    /// Lines that fail to parse are dropped by the rewrite.
    fn rewrite(&mut self, edit: impl FnOnce(&mut Vec<WorkoutTemplate>)) -> Result<()> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let result = rewrite_locked(&mut file, edit);
        file.unlock()?;
        result
    }
}

fn rewrite_locked(
    file: &mut File,
    edit: impl FnOnce(&mut Vec<WorkoutTemplate>),
) -> Result<()> {
    let mut templates = read_templates(&*file)?;
    edit(&mut templates);

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    let mut writer = std::io::BufWriter::new(&*file);
    for template in &templates {
        serde_json::to_writer(&mut writer, template)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    drop(writer);
    file.sync_all()?;
    Ok(())
}

/// Parse JSONL records, skipping lines that are not UTF-8 or not a template
fn read_templates(file: &File) -> Result<Vec<WorkoutTemplate>> {
    let reader = BufReader::new(file);
    let mut templates = Vec::new();

    for (line_num, line_result) in reader.split(b'\n').enumerate() {
        let bytes = line_result?;
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Skipping non-UTF-8 template at line {}: {}", line_num + 1, e);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutTemplate>(&line) {
            Ok(template) => templates.push(template),
            Err(e) => {
                tracing::warn!("Skipping unreadable template at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(templates)
}

impl TemplateSink for TemplateStore {
    fn append(&mut self, template: &WorkoutTemplate) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(template)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Saved template {} to {:?}", template.id, self.path);
        Ok(())
    }
}

/// Leading integer of a reps text ("8-12" → 8), defaulting to 10
fn template_reps(reps_text: &str) -> u32 {
    reps_text
        .split('-')
        .next()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(10)
}

impl WorkoutTemplate {
    /// Snapshot a generated workout as a template
    pub fn from_workout(workout: &GeneratedWorkout, created_at: DateTime<Utc>) -> Self {
        Self::from_workout_with(default_library(), workout, created_at)
    }

    pub fn from_workout_with(
        library: &Library,
        workout: &GeneratedWorkout,
        created_at: DateTime<Utc>,
    ) -> Self {
        let exercises = workout
            .exercises
            .iter()
            .map(|e| TemplateExercise {
                name: e.name.clone(),
                muscle_groups: library.find_group(&e.name).into_iter().collect(),
                sets: e.set_count(),
                reps: template_reps(e.reps_text()),
                rest_seconds: e.rest_seconds,
                notes: None,
            })
            .collect();

        let mode = if workout.source.is_fallback() {
            "quick_build"
        } else {
            "ai"
        };

        Self {
            id: Uuid::new_v4(),
            title: workout.title.clone(),
            description: workout.source.notice().map(str::to_string),
            mode: mode.to_string(),
            created_at,
            duration_minutes: workout.target_minutes,
            exercises,
        }
    }
}
