use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Core,
    Mobility,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Bodyweight,
}

/// Library entry, independent of any session. Referenced by id from
/// workout exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub equipment: Equipment,
    pub difficulty: Difficulty,
    pub muscle_groups: Vec<String>,
    pub instructions: String,
    #[serde(default)]
    pub favorite: bool,
}

/// One slot in a template: an exercise with its targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise_id: String,
    pub name: String,
    pub sets: u32,
    pub min_reps: Option<u32>,
    pub max_reps: Option<u32>,
    /// Pounds. Bodyweight movements leave this unset.
    pub target_weight: Option<f64>,
    pub rest_secs: u32,
}

/// A named, reusable workout definition. Immutable once authored; sessions
/// only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ExerciseCategory,
    pub difficulty: Difficulty,
    pub estimated_mins: u32,
    pub exercises: Vec<WorkoutExercise>,
}

/// One execution of an exercise. Created exactly once per logged set and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSet {
    pub set_number: u32,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub exercise_id: String,
    pub name: String,
    pub completed_sets: Vec<CompletedSet>,
}

/// One instance of performing a template, with logged actuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub template_id: String,
    pub template_name: String,
    pub started_at: DateTime<Local>,
    pub duration_secs: u64,
    pub completed_exercises: Vec<CompletedExercise>,
    pub completed: bool,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub calories: Option<u32>,
}

impl WorkoutSession {
    pub fn new(template: &WorkoutTemplate, started_at: DateTime<Local>) -> Self {
        Self {
            id: format!("{}-{}", template.id, started_at.format("%Y%m%d%H%M%S")),
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            started_at,
            duration_secs: 0,
            completed_exercises: Vec::new(),
            completed: false,
            rating: None,
            notes: None,
            calories: None,
        }
    }

    pub fn total_sets(&self) -> usize {
        self.completed_exercises
            .iter()
            .map(|e| e.completed_sets.len())
            .sum()
    }

    /// Sum of reps x weight over every logged set, in pounds. Sets without
    /// both reps and weight contribute nothing.
    pub fn total_volume_lb(&self) -> f64 {
        self.completed_exercises
            .iter()
            .flat_map(|e| &e.completed_sets)
            .filter_map(|s| Some(s.reps? as f64 * s.weight?))
            .sum()
    }
}
