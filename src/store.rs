use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::catalog;
use crate::error::StoreError;
use crate::history::TimeWindow;
use crate::progression::ProgramState;
use crate::workout::{Exercise, ExerciseCategory, Equipment, WorkoutSession, WorkoutTemplate};

/// Filter for browsing the exercise library.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    pub category: Option<ExerciseCategory>,
    pub equipment: Option<Equipment>,
    pub favorites_only: bool,
    /// Case-insensitive substring match on the exercise name.
    pub search: Option<String>,
}

impl ExerciseFilter {
    fn matches(&self, exercise: &Exercise) -> bool {
        if let Some(c) = self.category {
            if exercise.category != c {
                return false;
            }
        }
        if let Some(e) = self.equipment {
            if exercise.equipment != e {
                return false;
            }
        }
        if self.favorites_only && !exercise.favorite {
            return false;
        }
        if let Some(q) = &self.search {
            if !exercise.name.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Durability layer for sessions, the exercise library, and progression
/// state. The session engine itself stays in memory; everything that must
/// survive a restart goes through here.
pub trait WorkoutStore {
    fn list_templates(&self) -> Result<Vec<WorkoutTemplate>, StoreError>;
    fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, StoreError>;
    fn set_favorite(&self, exercise_id: &str, favorite: bool) -> Result<(), StoreError>;

    fn active_session(&self) -> Result<Option<WorkoutSession>, StoreError>;
    fn save_active_session(&self, session: &WorkoutSession) -> Result<(), StoreError>;
    fn clear_active_session(&self) -> Result<(), StoreError>;

    fn save_session(&self, session: &WorkoutSession) -> Result<(), StoreError>;
    fn list_sessions(&self, window: TimeWindow) -> Result<Vec<WorkoutSession>, StoreError>;

    fn program_state(&self) -> Result<ProgramState, StoreError>;
    fn save_program_state(&self, state: &ProgramState) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at the standard location
    /// under $HOME/.local/state/liftlog.
    pub fn new() -> Result<Self, StoreError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("liftlog.db"));
        Self::open_at(&db_path)
    }

    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                template_id TEXT NOT NULL,
                started_at TEXT NOT NULL,
                completed BOOLEAN NOT NULL,
                session_json TEXT NOT NULL
            )
            "#,
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at)",
            [],
        )?;

        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                favorite BOOLEAN NOT NULL DEFAULT 0,
                exercise_json TEXT NOT NULL
            )
            "#,
            [],
        )?;

        // Single-row tables for the active-session slot and the program
        // state; the CHECK keeps them single-row.
        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS active_session (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                session_json TEXT NOT NULL
            )
            "#,
            [],
        )?;

        self.conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS program_state (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                state_json TEXT NOT NULL
            )
            "#,
            [],
        )?;

        self.seed_exercises()?;
        Ok(())
    }

    /// Inserts the built-in library on first open; existing rows (and their
    /// favorite flags) are left alone.
    fn seed_exercises(&self) -> Result<(), StoreError> {
        for exercise in catalog::builtin_exercises() {
            let json = serde_json::to_string(&exercise)?;
            self.conn.execute(
                "INSERT OR IGNORE INTO exercises (id, favorite, exercise_json) VALUES (?1, 0, ?2)",
                params![exercise.id, json],
            )?;
        }
        Ok(())
    }

    fn load_all_exercises(&self) -> Result<Vec<Exercise>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT exercise_json, favorite FROM exercises ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let json: String = row.get(0)?;
            let favorite: bool = row.get(1)?;
            Ok((json, favorite))
        })?;

        let mut exercises = Vec::new();
        for row in rows {
            let (json, favorite) = row?;
            let mut exercise: Exercise = serde_json::from_str(&json)?;
            // The column is authoritative; the JSON copy goes stale when
            // favorites are toggled.
            exercise.favorite = favorite;
            exercises.push(exercise);
        }
        Ok(exercises)
    }
}

impl WorkoutStore for SqliteStore {
    fn list_templates(&self) -> Result<Vec<WorkoutTemplate>, StoreError> {
        // Templates are code-defined; custom authoring is out of scope.
        Ok(catalog::builtin_templates())
    }

    fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, StoreError> {
        Ok(self
            .load_all_exercises()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect())
    }

    fn set_favorite(&self, exercise_id: &str, favorite: bool) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE exercises SET favorite = ?1 WHERE id = ?2",
            params![favorite, exercise_id],
        )?;
        if changed == 0 {
            log::warn!("set_favorite: no exercise with id '{exercise_id}'");
        }
        Ok(())
    }

    fn active_session(&self) -> Result<Option<WorkoutSession>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT session_json FROM active_session WHERE slot = 0", [], |row| {
                row.get(0)
            })
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_active_session(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO active_session (slot, session_json) VALUES (0, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn clear_active_session(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM active_session", [])?;
        Ok(())
    }

    fn save_session(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO sessions (id, template_id, started_at, completed, session_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                session.id,
                session.template_id,
                session.started_at.to_rfc3339(),
                session.completed,
                json,
            ],
        )?;
        log::debug!("saved session '{}'", session.id);
        Ok(())
    }

    fn list_sessions(&self, window: TimeWindow) -> Result<Vec<WorkoutSession>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT session_json FROM sessions WHERE completed = 1 ORDER BY started_at DESC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let cutoff: Option<DateTime<Local>> = window.cutoff(Local::now());
        let mut sessions = Vec::new();
        for row in rows {
            let session: WorkoutSession = serde_json::from_str(&row?)?;
            if cutoff.map_or(true, |c| session.started_at >= c) {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    fn program_state(&self) -> Result<ProgramState, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT state_json FROM program_state WHERE slot = 0", [], |row| {
                row.get(0)
            })
            .optional()?;
        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(ProgramState::default()),
        }
    }

    fn save_program_state(&self, state: &ProgramState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO program_state (slot, state_json) VALUES (0, ?1)",
            params![json],
        )?;
        Ok(())
    }
}
