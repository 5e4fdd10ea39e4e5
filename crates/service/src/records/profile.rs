use configs::{Defaults, StoreBackend};
use models::record::StoredRecord;
use serde_json::Value;

/// How `GET /<entity>` shapes the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// A bare JSON array.
    Bare,
    /// `{"<plural>": [...]}`.
    Wrapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// The input body replaces the stored record verbatim.
    Overwrite,
    /// Only the supplied fields are set on the stored record.
    Merge,
}

/// What a successful create answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateReply {
    Record,
    /// `{"inserted id": "<ref>"}`.
    Reference,
}

/// Status convention of a successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateReply {
    Created,
    Ok,
}

/// Everything that distinguishes one collection's API from another's.
#[derive(Debug, Clone)]
pub struct EntityProfile {
    pub name: &'static str,
    pub plural: &'static str,
    pub count_key: &'static str,
    pub list_shape: ListShape,
    pub required_fields: &'static [&'static str],
    pub update_policy: UpdatePolicy,
    pub create_reply: CreateReply,
    pub update_reply: UpdateReply,
    /// Render the store reference as `_id` on every record.
    pub expose_ref: bool,
    pub defaults: Defaults,
}

impl EntityProfile {
    pub fn picture() -> Self {
        Self {
            name: "picture",
            plural: "pictures",
            count_key: "length",
            list_shape: ListShape::Bare,
            required_fields: &[],
            update_policy: UpdatePolicy::Overwrite,
            create_reply: CreateReply::Record,
            update_reply: UpdateReply::Created,
            expose_ref: false,
            defaults: Defaults {
                port: 8080,
                backend: StoreBackend::Memory,
                seed_path: "data/pictures.json",
                collection: "pictures",
            },
        }
    }

    pub fn song() -> Self {
        Self {
            name: "song",
            plural: "songs",
            count_key: "count",
            list_shape: ListShape::Wrapped,
            required_fields: &["title", "lyrics"],
            update_policy: UpdatePolicy::Merge,
            create_reply: CreateReply::Reference,
            update_reply: UpdateReply::Ok,
            expose_ref: true,
            defaults: Defaults {
                port: 8081,
                backend: StoreBackend::Document,
                seed_path: "data/songs.json",
                collection: "songs",
            },
        }
    }

    /// Record body as sent to clients.
    pub fn render(&self, stored: &StoredRecord) -> Value {
        if self.expose_ref {
            stored.record.with_ref(stored.reference)
        } else {
            stored.record.clone().into_value()
        }
    }

    pub fn no_change_message(&self) -> String {
        format!("{} found, but nothing updated", self.name)
    }
}
