//! Post documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use postboard_core::{Entity, PostId};

/// Body of a document in the `posts` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Free-text author, matched against a user's current display name.
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

impl PostRecord {
    /// Field the paginator filters on.
    pub const AUTHOR_FIELD: &'static str = "author";

    /// Build a record stamped with the server's clock. Clients never choose
    /// the timestamp.
    pub fn new(author: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            timestamp: now,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

impl Post {
    pub fn from_record(id: PostId, record: PostRecord) -> Self {
        Self {
            id,
            author: record.author,
            timestamp: record.timestamp,
            content: record.content,
        }
    }
}

impl Entity for Post {
    const COLLECTION: &'static str = "posts";
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_core::DocumentId;

    #[test]
    fn author_field_matches_serialized_name() {
        let record = PostRecord::new("alice", "hello", Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json[PostRecord::AUTHOR_FIELD], "alice");
    }

    #[test]
    fn post_serializes_id_as_hex() {
        let id = PostId::new(DocumentId::generate());
        let post = Post::from_record(id, PostRecord::new("alice", "hello", Utc::now()));
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["content"], "hello");
    }
}
