pub mod dto;
pub(crate) mod repo;
mod service;

pub use dto::{NutrientDraft, RecordDraft};
pub use service::{
    create_record, delete_record, get_record, list_records, list_versions, update_record,
};
