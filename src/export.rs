//! CSV export of completed sessions, one row per session.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::StoreError;
use crate::workout::WorkoutSession;

pub fn write_sessions_csv<W: Write>(
    writer: W,
    sessions: &[WorkoutSession],
) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "date",
        "template",
        "duration_secs",
        "exercises",
        "sets",
        "volume_lb",
        "rating",
        "calories",
    ])?;

    for session in sessions {
        wtr.write_record([
            session.started_at.to_rfc3339(),
            session.template_name.clone(),
            session.duration_secs.to_string(),
            session.completed_exercises.len().to_string(),
            session.total_sets().to_string(),
            format!("{:.0}", session.total_volume_lb()),
            session.rating.map_or(String::new(), |r| r.to_string()),
            session.calories.map_or(String::new(), |c| c.to_string()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_to_path(path: &Path, sessions: &[WorkoutSession]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_sessions_csv(file, sessions)
}
