//! Generic CRUD handling for one record collection.

pub mod profile;
pub mod service;

pub use profile::{CreateReply, EntityProfile, ListShape, UpdatePolicy, UpdateReply};
pub use service::{RecordService, UpdateOutcome};
