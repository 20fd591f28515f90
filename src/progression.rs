//! StrongLifts-style A/B progression. Pure state-update functions; the
//! engine and store decide when to apply and persist them.
//!
//! Only the confirmed rules are implemented: +5 lb to every lift trained in
//! the completed variant, +10 lb to the deadlift, variant alternation, and a
//! week counter. A deload rule after repeated failed sessions is
//! deliberately absent; the program description mentions one but never
//! specifies it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::workout::WorkoutTemplate;

pub const SQUAT: &str = "squat";
pub const BENCH_PRESS: &str = "bench-press";
pub const BARBELL_ROW: &str = "barbell-row";
pub const OVERHEAD_PRESS: &str = "overhead-press";
pub const DEADLIFT: &str = "deadlift";

const LIFT_INCREMENT_LB: f64 = 5.0;
const DEADLIFT_INCREMENT_LB: f64 = 10.0;
/// StrongLifts runs three sessions a week over two alternating variants, so
/// a "week" of the program is six completed sessions.
const SESSIONS_PER_WEEK: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum LiftVariant {
    A,
    B,
}

impl LiftVariant {
    pub fn toggled(self) -> Self {
        match self {
            LiftVariant::A => LiftVariant::B,
            LiftVariant::B => LiftVariant::A,
        }
    }
}

/// The three lifts trained in a variant, in template order.
pub fn lifts_for(variant: LiftVariant) -> [&'static str; 3] {
    match variant {
        LiftVariant::A => [SQUAT, BENCH_PRESS, BARBELL_ROW],
        LiftVariant::B => [SQUAT, OVERHEAD_PRESS, DEADLIFT],
    }
}

/// Where the program currently stands: which variant runs next, the target
/// weight per lift, and how far along the trainee is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramState {
    pub next_variant: LiftVariant,
    pub week: u32,
    pub completed_sessions: u32,
    /// Lift id -> next session's target weight in pounds.
    pub targets: BTreeMap<String, f64>,
}

impl Default for ProgramState {
    /// Empty-bar starting weights (45 lb bar; row and deadlift start higher
    /// because the plates have to clear the floor).
    fn default() -> Self {
        let targets = BTreeMap::from([
            (SQUAT.to_string(), 45.0),
            (BENCH_PRESS.to_string(), 45.0),
            (BARBELL_ROW.to_string(), 65.0),
            (OVERHEAD_PRESS.to_string(), 45.0),
            (DEADLIFT.to_string(), 95.0),
        ]);
        Self {
            next_variant: LiftVariant::A,
            week: 1,
            completed_sessions: 0,
            targets,
        }
    }
}

impl ProgramState {
    pub fn target_for(&self, lift: &str) -> Option<f64> {
        self.targets.get(lift).copied()
    }
}

/// Applies one completed session of `state.next_variant` and returns the
/// updated program. Deterministic; never mutates its input. A lift missing
/// from the targets map is a configuration error and nothing is updated.
pub fn advance(state: &ProgramState) -> Result<ProgramState, SessionError> {
    let variant = state.next_variant;
    let mut next = state.clone();

    for lift in lifts_for(variant) {
        let current = state.target_for(lift).ok_or_else(|| {
            SessionError::ConfigurationError(format!(
                "no target weight configured for '{lift}'"
            ))
        })?;
        let increment = if lift == DEADLIFT {
            DEADLIFT_INCREMENT_LB
        } else {
            LIFT_INCREMENT_LB
        };
        next.targets.insert(lift.to_string(), current + increment);
    }

    next.next_variant = variant.toggled();
    next.completed_sessions = state.completed_sessions + 1;
    next.week = next.completed_sessions / SESSIONS_PER_WEEK + 1;
    Ok(next)
}

/// The program variant a template trains, or None for templates outside the
/// program.
pub fn variant_for_template(template_id: &str) -> Option<LiftVariant> {
    match template_id {
        "stronglifts-a" => Some(LiftVariant::A),
        "stronglifts-b" => Some(LiftVariant::B),
        _ => None,
    }
}

/// Overwrites the template's lift targets with the program's current
/// weights, so a fresh session starts at the right load. Exercises the
/// program doesn't track keep their authored targets.
pub fn apply_targets(template: &mut WorkoutTemplate, state: &ProgramState) {
    for exercise in &mut template.exercises {
        if let Some(weight) = state.target_for(&exercise.exercise_id) {
            exercise.target_weight = Some(weight);
        }
    }
}
