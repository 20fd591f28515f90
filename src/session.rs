use chrono::Local;

use crate::error::SessionError;
use crate::workout::{
    CompletedExercise, CompletedSet, WorkoutExercise, WorkoutSession, WorkoutTemplate,
};

/// Owns the single active workout session and its exercise cursor.
///
/// States per session: NotStarted -> InProgress -> Completed. The engine
/// itself returns to idle once a session completes or is abandoned, freeing
/// the one-active-session slot. All mutations are synchronous; wrong-state
/// actions are rejected, never queued.
#[derive(Debug, Default)]
pub struct SessionEngine {
    session: Option<WorkoutSession>,
    template: Option<WorkoutTemplate>,
    cursor: usize,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.template.as_ref()?.exercises.get(self.cursor)
    }

    /// Starts a new session from `template`. Fails if one is already in
    /// progress; the running session is left untouched.
    pub fn start(&mut self, template: WorkoutTemplate) -> Result<(), SessionError> {
        if self.session.is_some() {
            return Err(SessionError::InvalidStateTransition(
                "a session is already in progress",
            ));
        }
        if template.exercises.is_empty() {
            return Err(SessionError::ConfigurationError(format!(
                "template '{}' has no exercises",
                template.id
            )));
        }

        log::debug!("starting session from template '{}'", template.id);
        self.session = Some(WorkoutSession::new(&template, Local::now()));
        self.template = Some(template);
        self.cursor = 0;
        Ok(())
    }

    /// Re-attaches a previously saved in-progress session, e.g. after the
    /// process restarted mid-workout.
    pub fn resume(
        &mut self,
        session: WorkoutSession,
        template: WorkoutTemplate,
    ) -> Result<(), SessionError> {
        if self.session.is_some() {
            return Err(SessionError::InvalidStateTransition(
                "a session is already in progress",
            ));
        }
        if session.completed {
            return Err(SessionError::InvalidStateTransition(
                "cannot resume a completed session",
            ));
        }
        if session.template_id != template.id {
            return Err(SessionError::ConfigurationError(format!(
                "session '{}' was started from template '{}', not '{}'",
                session.id, session.template_id, template.id
            )));
        }

        log::debug!("resuming session '{}'", session.id);
        self.session = Some(session);
        self.template = Some(template);
        self.cursor = 0;
        Ok(())
    }

    /// The set number the next log for `exercise_id` must carry.
    pub fn next_set_number(&self, exercise_id: &str) -> u32 {
        self.session
            .as_ref()
            .and_then(|s| {
                s.completed_exercises
                    .iter()
                    .find(|e| e.exercise_id == exercise_id)
            })
            .map_or(0, |e| e.completed_sets.len() as u32)
            + 1
    }

    /// Appends a completed set, creating the exercise entry on its first
    /// set. Returns the configured rest seconds so the caller can arm a
    /// rest timer.
    ///
    /// Rejected: unknown exercise ids, set numbers other than count + 1
    /// (no reordering or backfilling), and sets beyond the template target.
    pub fn log_set(
        &mut self,
        exercise_id: &str,
        set_number: u32,
        reps: Option<u32>,
        weight: Option<f64>,
        duration_secs: Option<u32>,
    ) -> Result<u32, SessionError> {
        let expected = self.next_set_number(exercise_id);
        let template = self
            .template
            .as_ref()
            .ok_or(SessionError::InvalidStateTransition("no session in progress"))?;
        let target = template
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .ok_or_else(|| {
                SessionError::OutOfRange(format!("exercise '{exercise_id}' not in template"))
            })?;

        if set_number != expected {
            return Err(SessionError::OutOfRange(format!(
                "set number {set_number} for '{exercise_id}', expected {expected}"
            )));
        }
        if set_number > target.sets {
            return Err(SessionError::OutOfRange(format!(
                "'{exercise_id}' already has all {} target sets",
                target.sets
            )));
        }

        let rest_secs = target.rest_secs;
        let name = target.name.clone();
        let session = self
            .session
            .as_mut()
            .ok_or(SessionError::InvalidStateTransition("no session in progress"))?;

        let entry = match session
            .completed_exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
        {
            Some(entry) => entry,
            None => {
                session.completed_exercises.push(CompletedExercise {
                    exercise_id: exercise_id.to_string(),
                    name,
                    completed_sets: Vec::new(),
                });
                session.completed_exercises.last_mut().unwrap()
            }
        };

        entry.completed_sets.push(CompletedSet {
            set_number,
            reps,
            weight,
            duration_secs,
        });
        log::debug!("logged set {set_number} for '{exercise_id}'");
        Ok(rest_secs)
    }

    /// True once the exercise under the cursor has all its target sets.
    pub fn exercise_done(&self) -> bool {
        match self.current_exercise() {
            Some(ex) => {
                let id = ex.exercise_id.clone();
                let sets = ex.sets;
                self.next_set_number(&id) > sets
            }
            None => false,
        }
    }

    /// Moves the cursor forward; a no-op at the last exercise or when idle.
    pub fn advance_exercise(&mut self) {
        if let Some(template) = &self.template {
            if self.cursor + 1 < template.exercises.len() {
                self.cursor += 1;
            }
        }
    }

    /// Moves the cursor back; a no-op at the first exercise or when idle.
    pub fn retreat_exercise(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Finalizes the session: stamps the duration, marks it completed, and
    /// frees the active slot. Rating must be within 1..=5 when given.
    pub fn complete(
        &mut self,
        rating: Option<u8>,
        notes: Option<String>,
        calories: Option<u32>,
    ) -> Result<WorkoutSession, SessionError> {
        if self.session.is_none() {
            return Err(SessionError::InvalidStateTransition("no session in progress"));
        }
        if let Some(r) = rating {
            if !(1..=5).contains(&r) {
                return Err(SessionError::OutOfRange(format!("rating {r} outside 1..=5")));
            }
        }

        let mut session = match self.session.take() {
            Some(s) => s,
            None => unreachable!(),
        };
        self.template = None;
        self.cursor = 0;

        let elapsed = Local::now().signed_duration_since(session.started_at);
        session.duration_secs = elapsed.num_seconds().max(0) as u64;
        session.completed = true;
        session.rating = rating;
        session.notes = notes;
        session.calories = calories;
        log::info!(
            "completed session '{}' after {}s",
            session.id,
            session.duration_secs
        );
        Ok(session)
    }

    /// Drops the in-progress session without recording it.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        if self.session.is_none() {
            return Err(SessionError::InvalidStateTransition("no session in progress"));
        }
        log::info!("abandoning in-progress session");
        self.session = None;
        self.template = None;
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Difficulty, ExerciseCategory};
    use assert_matches::assert_matches;

    fn exercise(id: &str, sets: u32, rest_secs: u32) -> WorkoutExercise {
        WorkoutExercise {
            exercise_id: id.into(),
            name: id.into(),
            sets,
            min_reps: Some(5),
            max_reps: Some(5),
            target_weight: Some(45.0),
            rest_secs,
        }
    }

    fn template(exercises: Vec<WorkoutExercise>) -> WorkoutTemplate {
        WorkoutTemplate {
            id: "test".into(),
            name: "Test".into(),
            description: String::new(),
            category: ExerciseCategory::Strength,
            difficulty: Difficulty::Beginner,
            estimated_mins: 30,
            exercises,
        }
    }

    #[test]
    fn start_creates_in_progress_session() {
        let mut engine = SessionEngine::new();
        assert!(!engine.is_in_progress());

        engine.start(template(vec![exercise("squat", 5, 90)])).unwrap();

        assert!(engine.is_in_progress());
        assert_eq!(engine.cursor(), 0);
        assert!(!engine.session().unwrap().completed);
    }

    #[test]
    fn start_rejects_second_session_and_keeps_the_first() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 5, 90)])).unwrap();
        engine.log_set("squat", 1, Some(5), Some(45.0), None).unwrap();

        let err = engine.start(template(vec![exercise("bench", 3, 60)]));

        assert_matches!(err, Err(SessionError::InvalidStateTransition(_)));
        let session = engine.session().unwrap();
        assert_eq!(session.template_id, "test");
        assert_eq!(session.total_sets(), 1);
    }

    #[test]
    fn start_rejects_empty_template() {
        let mut engine = SessionEngine::new();
        assert_matches!(
            engine.start(template(vec![])),
            Err(SessionError::ConfigurationError(_))
        );
        assert!(!engine.is_in_progress());
    }

    #[test]
    fn log_set_assigns_sequential_numbers() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 3, 90)])).unwrap();

        for n in 1..=3 {
            assert_eq!(engine.next_set_number("squat"), n);
            let rest = engine.log_set("squat", n, Some(5), Some(45.0), None).unwrap();
            assert_eq!(rest, 90);
        }

        let sets = &engine.session().unwrap().completed_exercises[0].completed_sets;
        assert_eq!(sets.len(), 3);
        assert_eq!(
            sets.iter().map(|s| s.set_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn log_set_rejects_out_of_order_numbers() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 3, 90)])).unwrap();

        assert_matches!(
            engine.log_set("squat", 2, Some(5), None, None),
            Err(SessionError::OutOfRange(_))
        );
        engine.log_set("squat", 1, Some(5), None, None).unwrap();
        // Duplicate submission of the same set number is also rejected.
        assert_matches!(
            engine.log_set("squat", 1, Some(5), None, None),
            Err(SessionError::OutOfRange(_))
        );
        assert_eq!(engine.session().unwrap().total_sets(), 1);
    }

    #[test]
    fn log_set_rejects_sets_beyond_target() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 2, 90)])).unwrap();
        engine.log_set("squat", 1, Some(5), None, None).unwrap();
        engine.log_set("squat", 2, Some(5), None, None).unwrap();

        assert_matches!(
            engine.log_set("squat", 3, Some(5), None, None),
            Err(SessionError::OutOfRange(_))
        );
        assert_eq!(engine.session().unwrap().total_sets(), 2);
    }

    #[test]
    fn log_set_rejects_unknown_exercise() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 3, 90)])).unwrap();

        assert_matches!(
            engine.log_set("curl", 1, Some(10), None, None),
            Err(SessionError::OutOfRange(_))
        );
    }

    #[test]
    fn log_set_requires_a_session() {
        let mut engine = SessionEngine::new();
        assert_matches!(
            engine.log_set("squat", 1, Some(5), None, None),
            Err(SessionError::InvalidStateTransition(_))
        );
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut engine = SessionEngine::new();
        engine
            .start(template(vec![
                exercise("squat", 3, 90),
                exercise("bench", 3, 90),
            ]))
            .unwrap();

        engine.retreat_exercise();
        assert_eq!(engine.cursor(), 0);

        engine.advance_exercise();
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.current_exercise().unwrap().exercise_id, "bench");

        engine.advance_exercise();
        assert_eq!(engine.cursor(), 1);

        engine.retreat_exercise();
        assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn exercise_done_tracks_target_sets() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 2, 90)])).unwrap();

        assert!(!engine.exercise_done());
        engine.log_set("squat", 1, Some(5), None, None).unwrap();
        assert!(!engine.exercise_done());
        engine.log_set("squat", 2, Some(5), None, None).unwrap();
        assert!(engine.exercise_done());
    }

    #[test]
    fn complete_with_no_sets_yields_empty_completed_session() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 5, 90)])).unwrap();

        let session = engine.complete(None, None, None).unwrap();

        assert!(session.completed);
        assert!(session.completed_exercises.is_empty());
        assert!(!engine.is_in_progress());
    }

    #[test]
    fn complete_rejects_out_of_range_rating() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 5, 90)])).unwrap();

        assert_matches!(
            engine.complete(Some(0), None, None),
            Err(SessionError::OutOfRange(_))
        );
        assert_matches!(
            engine.complete(Some(6), None, None),
            Err(SessionError::OutOfRange(_))
        );
        // Still in progress after the rejections.
        assert!(engine.is_in_progress());

        let session = engine.complete(Some(5), None, None).unwrap();
        assert_eq!(session.rating, Some(5));
    }

    #[test]
    fn complete_requires_a_session() {
        let mut engine = SessionEngine::new();
        assert_matches!(
            engine.complete(None, None, None),
            Err(SessionError::InvalidStateTransition(_))
        );
    }

    #[test]
    fn complete_frees_the_slot_for_a_new_session() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 5, 90)])).unwrap();
        engine.complete(None, None, None).unwrap();

        engine.start(template(vec![exercise("bench", 3, 60)])).unwrap();
        assert!(engine.is_in_progress());
    }

    #[test]
    fn abandon_discards_without_recording() {
        let mut engine = SessionEngine::new();
        engine.start(template(vec![exercise("squat", 5, 90)])).unwrap();
        engine.log_set("squat", 1, Some(5), None, None).unwrap();

        engine.abandon().unwrap();

        assert!(!engine.is_in_progress());
        assert_matches!(engine.abandon(), Err(SessionError::InvalidStateTransition(_)));
    }

    #[test]
    fn resume_restores_set_numbering() {
        let mut engine = SessionEngine::new();
        let t = template(vec![exercise("squat", 3, 90)]);
        engine.start(t.clone()).unwrap();
        engine.log_set("squat", 1, Some(5), None, None).unwrap();
        let saved = engine.session().unwrap().clone();
        engine.abandon().unwrap();

        engine.resume(saved, t).unwrap();

        assert_eq!(engine.next_set_number("squat"), 2);
        engine.log_set("squat", 2, Some(5), None, None).unwrap();
    }

    #[test]
    fn resume_rejects_completed_or_mismatched_sessions() {
        let mut engine = SessionEngine::new();
        let t = template(vec![exercise("squat", 3, 90)]);
        engine.start(t.clone()).unwrap();
        let done = engine.complete(None, None, None).unwrap();

        assert_matches!(
            engine.resume(done.clone(), t.clone()),
            Err(SessionError::InvalidStateTransition(_))
        );

        let mut other = template(vec![exercise("bench", 3, 90)]);
        other.id = "other".into();
        let mut fresh = done;
        fresh.completed = false;
        assert_matches!(
            engine.resume(fresh, other),
            Err(SessionError::ConfigurationError(_))
        );
    }
}
