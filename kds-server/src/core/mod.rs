//! Core wiring: configuration, error taxonomy, and the assembled system

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{KitchenError, KitchenResult};
pub use state::KitchenCore;
