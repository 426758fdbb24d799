//! Application services built on the ports.

mod config_store;

pub use config_store::{ConfigStore, UpdateOutcome};
