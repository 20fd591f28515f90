use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use time_humanize::HumanTime;

use liftlog::config::{Config, ConfigStore, FileConfigStore};
use liftlog::history::{self, TimeWindow};
use liftlog::progression;
use liftlog::rest_timer::RestTimer;
use liftlog::runtime::{EngineEvent, EventSource, FixedTicker, Runner, StdinEventSource, Ticker};
use liftlog::session::SessionEngine;
use liftlog::store::{ExerciseFilter, SqliteStore, WorkoutStore};
use liftlog::util;
use liftlog::workout::{Equipment, ExerciseCategory, WorkoutTemplate};

/// workout tracker with templates, set logging, rest timers, and StrongLifts progression
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "A workout tracking CLI: start a session from a template, log sets with an \
automatic rest countdown, and follow StrongLifts A/B progression with full history and CSV export."
)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list the built-in workout templates
    Templates,

    /// browse the exercise library
    Exercises {
        /// only exercises in this category
        #[clap(short, long, value_enum)]
        category: Option<CategoryArg>,

        /// only exercises using this equipment
        #[clap(short, long, value_enum)]
        equipment: Option<EquipmentArg>,

        /// only favorited exercises
        #[clap(short, long)]
        favorites: bool,

        /// case-insensitive name search
        #[clap(short, long)]
        search: Option<String>,
    },

    /// mark an exercise as a favorite (or clear it with --unset)
    Favorite {
        exercise_id: String,

        #[clap(long)]
        unset: bool,
    },

    /// start (or resume) an interactive workout session
    Start {
        /// template id or name, e.g. "stronglifts-a"
        template: String,
    },

    /// show completed workouts grouped by day
    History {
        #[clap(short, long, value_enum, default_value_t = WindowArg::Month)]
        window: WindowArg,
    },

    /// export completed sessions to a CSV file
    Export {
        path: PathBuf,

        #[clap(short, long, value_enum, default_value_t = WindowArg::All)]
        window: WindowArg,
    },

    /// show the next StrongLifts session and its target weights
    Next,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum WindowArg {
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl WindowArg {
    fn as_window(&self) -> TimeWindow {
        match self {
            WindowArg::Week => TimeWindow::Week,
            WindowArg::Month => TimeWindow::Month,
            WindowArg::Quarter => TimeWindow::Quarter,
            WindowArg::Year => TimeWindow::Year,
            WindowArg::All => TimeWindow::AllTime,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum CategoryArg {
    Strength,
    Cardio,
    Core,
    Mobility,
}

impl CategoryArg {
    fn as_category(&self) -> ExerciseCategory {
        match self {
            CategoryArg::Strength => ExerciseCategory::Strength,
            CategoryArg::Cardio => ExerciseCategory::Cardio,
            CategoryArg::Core => ExerciseCategory::Core,
            CategoryArg::Mobility => ExerciseCategory::Mobility,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum EquipmentArg {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Bodyweight,
}

impl EquipmentArg {
    fn as_equipment(&self) -> Equipment {
        match self {
            EquipmentArg::Barbell => Equipment::Barbell,
            EquipmentArg::Dumbbell => Equipment::Dumbbell,
            EquipmentArg::Kettlebell => Equipment::Kettlebell,
            EquipmentArg::Machine => Equipment::Machine,
            EquipmentArg::Bodyweight => Equipment::Bodyweight,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Templates => {
            let store = SqliteStore::new()?;
            run_templates(&store)
        }
        Command::Exercises {
            category,
            equipment,
            favorites,
            search,
        } => {
            let store = SqliteStore::new()?;
            let filter = ExerciseFilter {
                category: category.map(|c| c.as_category()),
                equipment: equipment.map(|e| e.as_equipment()),
                favorites_only: favorites,
                search,
            };
            run_exercises(&store, &filter)
        }
        Command::Favorite { exercise_id, unset } => {
            let store = SqliteStore::new()?;
            store.set_favorite(&exercise_id, !unset)?;
            Ok(())
        }
        Command::Start { template } => {
            let store = SqliteStore::new()?;
            let config = FileConfigStore::new().load();
            run_session(&store, &config, &template)
        }
        Command::History { window } => {
            let store = SqliteStore::new()?;
            run_history(&store, window.as_window())
        }
        Command::Export { path, window } => {
            let store = SqliteStore::new()?;
            let sessions = store.list_sessions(window.as_window())?;
            liftlog::export::export_to_path(&path, &sessions)?;
            println!("exported {} sessions to {}", sessions.len(), path.display());
            Ok(())
        }
        Command::Next => {
            let store = SqliteStore::new()?;
            let config = FileConfigStore::new().load();
            run_next(&store, &config)
        }
    }
}

fn run_templates(store: &SqliteStore) -> Result<(), Box<dyn Error>> {
    for template in store.list_templates()? {
        println!(
            "{:<14} {:<16} {} · {} exercises · ~{} min",
            template.id,
            template.name,
            template.difficulty,
            template.exercises.len(),
            template.estimated_mins
        );
        println!("               {}", template.description);
    }
    Ok(())
}

fn run_exercises(store: &SqliteStore, filter: &ExerciseFilter) -> Result<(), Box<dyn Error>> {
    let exercises = store.list_exercises(filter)?;
    if exercises.is_empty() {
        println!("no exercises match");
        return Ok(());
    }
    for exercise in exercises {
        let star = if exercise.favorite { "*" } else { " " };
        println!(
            "{star} {:<18} {:<10} {:<10} {}",
            exercise.id,
            exercise.category,
            exercise.equipment,
            exercise.muscle_groups.join(", ")
        );
    }
    Ok(())
}

fn run_history(store: &SqliteStore, window: TimeWindow) -> Result<(), Box<dyn Error>> {
    let sessions = store.list_sessions(window)?;
    let summary = history::summarize(&sessions);

    println!(
        "{} workouts · {} total · {} avg · {} kcal",
        summary.total_workouts,
        util::format_duration(summary.total_duration_secs),
        util::format_duration(summary.avg_duration_secs as u64),
        summary.total_calories
    );

    let now = chrono::Local::now();
    for group in history::group_by_day(sessions) {
        println!("\n{}", group.day.format("%A %-d %B %Y"));
        for session in group.sessions {
            let ago = now.signed_duration_since(session.started_at).num_seconds();
            let rating = session
                .rating
                .map_or(String::new(), |r| format!(" · {r}/5"));
            println!(
                "  {:<16} {} · {} sets · {:.0} lb{} ({})",
                session.template_name,
                util::format_duration(session.duration_secs),
                session.total_sets(),
                session.total_volume_lb(),
                rating,
                HumanTime::from(-ago)
            );
        }
    }
    Ok(())
}

fn run_next(store: &SqliteStore, config: &Config) -> Result<(), Box<dyn Error>> {
    let state = store.program_state()?;
    println!(
        "week {} · StrongLifts {} next · {} sessions completed",
        state.week, state.next_variant, state.completed_sessions
    );
    for lift in progression::lifts_for(state.next_variant) {
        if let Some(weight) = state.target_for(lift) {
            println!("  {:<16} {}", lift, config.weight_unit.display(weight));
        }
    }
    Ok(())
}

/// One parsed line of the interactive session prompt.
#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Set { reps: u32, weight: Option<f64> },
    Next,
    Back,
    Skip,
    Extend,
    Status,
    Done { rating: Option<u8> },
    Quit,
    Abandon,
    Help,
}

fn parse_session_command(line: &str) -> Result<SessionCommand, String> {
    let mut parts = line.split_whitespace();
    let verb = match parts.next() {
        Some(v) => v,
        None => return Ok(SessionCommand::Help),
    };

    match verb {
        "set" | "s" => {
            let reps = parts
                .next()
                .ok_or("usage: set <reps> [weight]")?
                .parse::<u32>()
                .map_err(|_| "reps must be a whole number".to_string())?;
            let weight = match parts.next() {
                Some(w) => Some(
                    w.parse::<f64>()
                        .map_err(|_| "weight must be a number".to_string())?,
                ),
                None => None,
            };
            Ok(SessionCommand::Set { reps, weight })
        }
        "next" | "n" => Ok(SessionCommand::Next),
        "back" | "b" => Ok(SessionCommand::Back),
        "skip" => Ok(SessionCommand::Skip),
        "extend" | "e" => Ok(SessionCommand::Extend),
        "status" => Ok(SessionCommand::Status),
        "done" | "d" => {
            let rating = match parts.next() {
                Some(r) => Some(
                    r.parse::<u8>()
                        .map_err(|_| "rating must be 1-5".to_string())?,
                ),
                None => None,
            };
            Ok(SessionCommand::Done { rating })
        }
        "quit" | "q" => Ok(SessionCommand::Quit),
        "abandon" => Ok(SessionCommand::Abandon),
        "help" | "?" => Ok(SessionCommand::Help),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn find_template(store: &SqliteStore, wanted: &str) -> Result<WorkoutTemplate, Box<dyn Error>> {
    let templates = store.list_templates()?;
    templates
        .into_iter()
        .find(|t| t.id == wanted || t.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| format!("no template '{wanted}' (see `liftlog templates`)").into())
}

fn run_session(
    store: &SqliteStore,
    config: &Config,
    template_arg: &str,
) -> Result<(), Box<dyn Error>> {
    let template = find_template(store, template_arg)?;
    let mut engine = SessionEngine::new();

    match store.active_session()? {
        Some(saved) if saved.template_id == template.id => {
            println!("resuming session '{}'", saved.id);
            engine.resume(saved, template)?;
        }
        Some(saved) => {
            return Err(format!(
                "a '{}' session is still in progress; resume it with `liftlog start {}` \
or `abandon` it there",
                saved.template_id, saved.template_id
            )
            .into());
        }
        None => {
            let mut template = template;
            if progression::variant_for_template(&template.id).is_some() {
                progression::apply_targets(&mut template, &store.program_state()?);
            }
            engine.start(template)?;
            if let Some(session) = engine.session() {
                store.save_active_session(session)?;
            }
        }
    }

    print_current(&engine, config);
    println!("commands: set <reps> [weight] · next · back · skip · extend · status · done [rating] · quit · abandon");

    let runner = Runner::new(StdinEventSource::new(), FixedTicker::one_second());
    session_loop(&runner, &mut engine, store, config)
}

fn session_loop<E: EventSource, T: Ticker>(
    runner: &Runner<E, T>,
    engine: &mut SessionEngine,
    store: &SqliteStore,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut timer: Option<RestTimer> = None;

    loop {
        match runner.step() {
            EngineEvent::Tick => {
                if let Some(t) = timer.as_mut() {
                    if t.on_tick() {
                        println!("\nrest over");
                        timer = None;
                        maybe_auto_advance(engine, config);
                        print_current(engine, config);
                    } else {
                        print!("\rrest {:>3}s ", t.remaining_secs());
                        let _ = std::io::stdout().flush();
                    }
                }
            }
            EngineEvent::Line(line) => match parse_session_command(&line) {
                Ok(cmd) => {
                    if handle_command(cmd, engine, &mut timer, store, config)? {
                        return Ok(());
                    }
                }
                Err(msg) => println!("{msg}"),
            },
            EngineEvent::Eof => {
                if let Some(session) = engine.session() {
                    store.save_active_session(session)?;
                    println!("\nsession saved; resume with `liftlog start {}`", session.template_id);
                }
                return Ok(());
            }
        }
    }
}

/// Handles one command; returns true when the loop should exit.
fn handle_command(
    cmd: SessionCommand,
    engine: &mut SessionEngine,
    timer: &mut Option<RestTimer>,
    store: &SqliteStore,
    config: &Config,
) -> Result<bool, Box<dyn Error>> {
    match cmd {
        SessionCommand::Set { reps, weight } => {
            let (id, default_weight) = match engine.current_exercise() {
                Some(ex) => (ex.exercise_id.clone(), ex.target_weight),
                None => {
                    println!("no current exercise");
                    return Ok(false);
                }
            };
            let set_number = engine.next_set_number(&id);
            match engine.log_set(&id, set_number, Some(reps), weight.or(default_weight), None) {
                Ok(rest_secs) => {
                    if let Some(session) = engine.session() {
                        store.save_active_session(session)?;
                    }
                    let rest = if rest_secs == 0 {
                        config.default_rest_secs
                    } else {
                        rest_secs
                    };
                    println!("set {set_number} logged · resting {rest}s");
                    *timer = Some(RestTimer::new(rest));
                }
                Err(e) => println!("error: {e}"),
            }
        }
        SessionCommand::Next => {
            engine.advance_exercise();
            print_current(engine, config);
        }
        SessionCommand::Back => {
            engine.retreat_exercise();
            print_current(engine, config);
        }
        SessionCommand::Skip => {
            if let Some(t) = timer.as_mut() {
                if t.skip() {
                    println!("rest skipped");
                    *timer = None;
                    maybe_auto_advance(engine, config);
                    print_current(engine, config);
                }
            } else {
                println!("no rest timer running");
            }
        }
        SessionCommand::Extend => {
            if let Some(t) = timer.as_mut() {
                t.extend(config.rest_extend_secs);
                println!("rest extended to {}s", t.remaining_secs());
            } else {
                println!("no rest timer running");
            }
        }
        SessionCommand::Status => print_status(engine, config),
        SessionCommand::Done { rating } => match engine.complete(rating, None, None) {
            Ok(session) => {
                store.save_session(&session)?;
                store.clear_active_session()?;
                println!(
                    "completed '{}' · {} · {} sets · {:.0} lb total volume",
                    session.template_name,
                    util::format_duration(session.duration_secs),
                    session.total_sets(),
                    session.total_volume_lb()
                );
                update_program(store, config, &session.template_id)?;
                return Ok(true);
            }
            Err(e) => println!("error: {e}"),
        },
        SessionCommand::Quit => {
            if let Some(session) = engine.session() {
                store.save_active_session(session)?;
                println!("session saved; resume with `liftlog start {}`", session.template_id);
            }
            return Ok(true);
        }
        SessionCommand::Abandon => {
            engine.abandon()?;
            store.clear_active_session()?;
            println!("session abandoned");
            return Ok(true);
        }
        SessionCommand::Help => {
            println!("set <reps> [weight] · next · back · skip · extend · status · done [rating] · quit · abandon");
        }
    }
    Ok(false)
}

fn maybe_auto_advance(engine: &mut SessionEngine, config: &Config) {
    if config.auto_advance && engine.exercise_done() {
        engine.advance_exercise();
    }
}

/// Moves the program forward after a completed StrongLifts session.
fn update_program(
    store: &SqliteStore,
    config: &Config,
    template_id: &str,
) -> Result<(), Box<dyn Error>> {
    let variant = match progression::variant_for_template(template_id) {
        Some(v) => v,
        None => return Ok(()),
    };
    let state = store.program_state()?;
    if variant != state.next_variant {
        log::warn!(
            "completed variant {variant} but the program expected {}; leaving targets alone",
            state.next_variant
        );
        return Ok(());
    }
    let next = progression::advance(&state)?;
    store.save_program_state(&next)?;

    println!("next up: StrongLifts {} (week {})", next.next_variant, next.week);
    for lift in progression::lifts_for(next.next_variant) {
        if let Some(weight) = next.target_for(lift) {
            println!("  {:<16} {}", lift, config.weight_unit.display(weight));
        }
    }
    Ok(())
}

fn print_current(engine: &SessionEngine, config: &Config) {
    match engine.current_exercise() {
        Some(ex) => {
            let logged = engine.next_set_number(&ex.exercise_id) - 1;
            let reps = match (ex.min_reps, ex.max_reps) {
                (Some(lo), Some(hi)) if lo == hi => format!(" x {lo}"),
                (Some(lo), Some(hi)) => format!(" x {lo}-{hi}"),
                _ => String::new(),
            };
            let weight = ex
                .target_weight
                .map_or(String::new(), |w| format!(" @ {}", config.weight_unit.display(w)));
            println!(
                "> {} · set {}/{}{}{}",
                ex.name,
                (logged + 1).min(ex.sets),
                ex.sets,
                reps,
                weight
            );
        }
        None => println!("no exercise under the cursor"),
    }
}

fn print_status(engine: &SessionEngine, config: &Config) {
    let session = match engine.session() {
        Some(s) => s,
        None => {
            println!("no session in progress");
            return;
        }
    };
    println!("{} · started {}", session.template_name, session.started_at.format("%H:%M"));
    print_current(engine, config);
    for completed in &session.completed_exercises {
        println!("  {}: {} sets", completed.name, completed.completed_sets.len());
    }
}
