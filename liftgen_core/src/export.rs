//! CSV export of saved templates, one row per template exercise.

use crate::types::WorkoutTemplate;
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    template_id: String,
    title: &'a str,
    created_at: String,
    position: usize,
    name: &'a str,
    sets: u32,
    reps: u32,
    rest_seconds: u32,
}

/// Append templates to a CSV file, writing headers only into an empty file
///
/// Returns the number of rows written.
pub fn export_csv(templates: &[WorkoutTemplate], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for template in templates {
        for (position, exercise) in template.exercises.iter().enumerate() {
            writer.serialize(CsvRow {
                template_id: template.id.to_string(),
                title: &template.title,
                created_at: template.created_at.to_rfc3339(),
                position,
                name: &exercise.name,
                sets: exercise.sets,
                reps: exercise.reps,
                rest_seconds: exercise.rest_seconds,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} template rows to {:?}", rows, csv_path);
    Ok(rows)
}
