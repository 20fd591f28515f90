// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod progression;
pub mod rest_timer;
pub mod runtime;
pub mod session;
pub mod store;
pub mod util;
pub mod workout;
