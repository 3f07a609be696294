pub(crate) mod repo;
mod service;

pub use service::{get_ingredients, set_ingredients};
pub(crate) use service::{fetch_ingredients, insert_ingredients};
