pub mod dto;
pub(crate) mod repo;
mod service;

pub use dto::{MacrosPercentage, NutrientTotal, StatsReport};
pub use service::get_stats;
