//! Background tasks

pub mod refresh_scheduler;

pub use refresh_scheduler::{RefreshScheduler, spawn_refresh_scheduler};
