//! Built-in exercise library and workout templates. These seed the store on
//! first open; authoring custom templates is out of scope.

use crate::progression;
use crate::workout::{
    Difficulty, Equipment, Exercise, ExerciseCategory, WorkoutExercise, WorkoutTemplate,
};

fn exercise(
    id: &str,
    name: &str,
    category: ExerciseCategory,
    equipment: Equipment,
    difficulty: Difficulty,
    muscle_groups: &[&str],
    instructions: &str,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        category,
        equipment,
        difficulty,
        muscle_groups: muscle_groups.iter().map(|m| m.to_string()).collect(),
        instructions: instructions.into(),
        favorite: false,
    }
}

pub fn builtin_exercises() -> Vec<Exercise> {
    use Difficulty::*;
    use Equipment::*;
    use ExerciseCategory::*;

    vec![
        exercise(
            progression::SQUAT,
            "Squat",
            Strength,
            Barbell,
            Beginner,
            &["quads", "glutes", "core"],
            "Bar on upper back, sit down below parallel, drive up through the heels.",
        ),
        exercise(
            progression::BENCH_PRESS,
            "Bench Press",
            Strength,
            Barbell,
            Beginner,
            &["chest", "triceps", "shoulders"],
            "Lower the bar to mid-chest, press to lockout with feet planted.",
        ),
        exercise(
            progression::BARBELL_ROW,
            "Barbell Row",
            Strength,
            Barbell,
            Intermediate,
            &["lats", "upper back", "biceps"],
            "Hinge at the hips, pull the bar to the lower chest, lower under control.",
        ),
        exercise(
            progression::OVERHEAD_PRESS,
            "Overhead Press",
            Strength,
            Barbell,
            Intermediate,
            &["shoulders", "triceps", "core"],
            "Press the bar overhead from the shoulders without leg drive.",
        ),
        exercise(
            progression::DEADLIFT,
            "Deadlift",
            Strength,
            Barbell,
            Intermediate,
            &["hamstrings", "glutes", "back"],
            "Bar over mid-foot, flat back, stand up and lock out hips and knees.",
        ),
        exercise(
            "pull-up",
            "Pull-Up",
            Strength,
            Bodyweight,
            Intermediate,
            &["lats", "biceps"],
            "Hang from the bar, pull chin over the bar, lower to a dead hang.",
        ),
        exercise(
            "lunge",
            "Lunge",
            Strength,
            Dumbbell,
            Beginner,
            &["quads", "glutes"],
            "Step forward, lower the back knee toward the floor, push back up.",
        ),
        exercise(
            "plank",
            "Plank",
            Core,
            Bodyweight,
            Beginner,
            &["core"],
            "Hold a straight line from head to heels on forearms and toes.",
        ),
        exercise(
            "kettlebell-swing",
            "Kettlebell Swing",
            Cardio,
            Kettlebell,
            Intermediate,
            &["glutes", "hamstrings", "core"],
            "Hinge and snap the hips to swing the bell to chest height.",
        ),
        exercise(
            "hip-stretch",
            "Hip Flexor Stretch",
            Mobility,
            Bodyweight,
            Beginner,
            &["hip flexors"],
            "Half-kneel, tuck the pelvis, shift forward until a stretch is felt.",
        ),
    ]
}

fn lift(id: &str, name: &str, sets: u32, weight: f64, rest_secs: u32) -> WorkoutExercise {
    WorkoutExercise {
        exercise_id: id.into(),
        name: name.into(),
        sets,
        min_reps: Some(5),
        max_reps: Some(5),
        target_weight: Some(weight),
        rest_secs,
    }
}

pub fn builtin_templates() -> Vec<WorkoutTemplate> {
    vec![
        WorkoutTemplate {
            id: "stronglifts-a".into(),
            name: "StrongLifts A".into(),
            description: "Squat, bench press, barbell row. 5x5, add 5 lb per lift each session."
                .into(),
            category: ExerciseCategory::Strength,
            difficulty: Difficulty::Beginner,
            estimated_mins: 60,
            exercises: vec![
                lift(progression::SQUAT, "Squat", 5, 45.0, 90),
                lift(progression::BENCH_PRESS, "Bench Press", 5, 45.0, 90),
                lift(progression::BARBELL_ROW, "Barbell Row", 5, 65.0, 90),
            ],
        },
        WorkoutTemplate {
            id: "stronglifts-b".into(),
            name: "StrongLifts B".into(),
            description: "Squat, overhead press, deadlift. Deadlift is one heavy set, +10 lb."
                .into(),
            category: ExerciseCategory::Strength,
            difficulty: Difficulty::Beginner,
            estimated_mins: 60,
            exercises: vec![
                lift(progression::SQUAT, "Squat", 5, 45.0, 90),
                lift(progression::OVERHEAD_PRESS, "Overhead Press", 5, 45.0, 90),
                lift(progression::DEADLIFT, "Deadlift", 1, 95.0, 180),
            ],
        },
        WorkoutTemplate {
            id: "full-body".into(),
            name: "Full Body".into(),
            description: "Balanced beginner circuit across the major movement patterns.".into(),
            category: ExerciseCategory::Strength,
            difficulty: Difficulty::Beginner,
            estimated_mins: 40,
            exercises: vec![
                WorkoutExercise {
                    exercise_id: "lunge".into(),
                    name: "Lunge".into(),
                    sets: 3,
                    min_reps: Some(8),
                    max_reps: Some(12),
                    target_weight: Some(20.0),
                    rest_secs: 60,
                },
                WorkoutExercise {
                    exercise_id: "pull-up".into(),
                    name: "Pull-Up".into(),
                    sets: 3,
                    min_reps: Some(3),
                    max_reps: Some(8),
                    target_weight: None,
                    rest_secs: 90,
                },
                WorkoutExercise {
                    exercise_id: "plank".into(),
                    name: "Plank".into(),
                    sets: 3,
                    min_reps: None,
                    max_reps: None,
                    target_weight: None,
                    rest_secs: 45,
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn exercise_ids_are_unique() {
        let exercises = builtin_exercises();
        let ids: HashSet<_> = exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), exercises.len());
    }

    #[test]
    fn template_exercises_reference_known_ids() {
        let known: HashSet<_> = builtin_exercises().into_iter().map(|e| e.id).collect();
        for template in builtin_templates() {
            for ex in &template.exercises {
                assert!(
                    known.contains(&ex.exercise_id),
                    "{} references unknown exercise {}",
                    template.id,
                    ex.exercise_id
                );
            }
        }
    }

    #[test]
    fn stronglifts_templates_match_program_lifts() {
        let templates = builtin_templates();
        let a = templates.iter().find(|t| t.id == "stronglifts-a").unwrap();
        let b = templates.iter().find(|t| t.id == "stronglifts-b").unwrap();

        let a_ids: Vec<_> = a.exercises.iter().map(|e| e.exercise_id.as_str()).collect();
        let b_ids: Vec<_> = b.exercises.iter().map(|e| e.exercise_id.as_str()).collect();

        assert_eq!(
            a_ids,
            progression::lifts_for(progression::LiftVariant::A).to_vec()
        );
        assert_eq!(
            b_ids,
            progression::lifts_for(progression::LiftVariant::B).to_vec()
        );
    }
}
