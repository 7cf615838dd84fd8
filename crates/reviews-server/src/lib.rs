//! Process wiring for the reviews service: configuration, seeding and the
//! inspection report. The binary in `main.rs` ties these to the API router
//! and the job worker.

pub mod inspect;
pub mod seed;
pub mod settings;

pub use settings::ServerConfig;
