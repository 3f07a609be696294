pub mod catalog;
pub mod config;
pub mod error;
pub mod logs;
pub mod model;
pub mod recipes;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod timeframe;
pub mod users;

pub use error::{Error, Result};
pub use state::AppState;
