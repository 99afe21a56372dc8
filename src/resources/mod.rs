//! ECS resources made available to systems.
//!
//! Overview
//! - `effectpool` – pre-spawned effect entities handed out round-robin
//! - `kitconfig` – motion, pool and audio settings loaded from an INI file
//! - `mixer` – process-wide volume level and playback bookkeeping
//! - `worldtime` – simulation time and delta
pub mod effectpool;
pub mod kitconfig;
pub mod mixer;
pub mod worldtime;
