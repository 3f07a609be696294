pub mod dto;
pub(crate) mod repo;
mod service;

pub use dto::LogDraft;
pub use service::{append, list_for_day, query_range, soft_delete};
