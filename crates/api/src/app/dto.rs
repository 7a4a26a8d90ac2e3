use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use postboard_content::{Page, Post, User};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Unknown fields, including any client-supplied `timestamp`, are ignored.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub author: String,
    pub content: String,
}

/// Query string of the user-posts listing. Both values arrive raw so that
/// their validation rules live with the page types.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub lowerid: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn created_to_json(id: impl ToString) -> JsonValue {
    json!({ "id": id.to_string() })
}

/// Public user view. The sealed password is never part of a response.
pub fn user_to_json(user: User) -> JsonValue {
    json!({
        "id": user.id.to_string(),
        "name": user.name,
        "email": user.email,
    })
}

pub fn post_to_json(post: Post) -> JsonValue {
    json!({
        "id": post.id.to_string(),
        "author": post.author,
        "timestamp": post.timestamp.to_rfc3339(),
        "content": post.content,
    })
}

/// `{"Posts": [...], "lowerId": "<cursor>"}`; the cursor is `""` on an
/// empty page.
pub fn page_to_json(page: Page) -> JsonValue {
    let lower_id = page.next_cursor.map(|id| id.to_string()).unwrap_or_default();
    let posts = page.posts.into_iter().map(post_to_json).collect::<Vec<_>>();
    json!({
        "Posts": posts,
        "lowerId": lower_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use postboard_content::{PostRecord, SealedPassword, UserRecord};
    use postboard_core::{DocumentId, PostId, UserId};

    #[test]
    fn user_json_has_no_password() {
        let user = User::from_record(
            UserId::new(DocumentId::generate()),
            UserRecord {
                name: "alice".to_string(),
                email: None,
                password: SealedPassword::new("deadbeef"),
            },
        );
        let value = user_to_json(user);
        assert!(value.get("password").is_none());
        assert_eq!(value["name"], "alice");
        assert!(value["email"].is_null());
    }

    #[test]
    fn empty_page_has_empty_cursor() {
        let value = page_to_json(Page::empty());
        assert_eq!(value, json!({ "Posts": [], "lowerId": "" }));
    }

    #[test]
    fn page_cursor_is_last_post_id() {
        let now = Utc::now();
        let posts: Vec<Post> = (0..2)
            .map(|i| Post::from_record(PostId::new(DocumentId::generate()), PostRecord::new("a", format!("{i}"), now)))
            .collect();
        let last = posts[1].id;
        let page = Page {
            posts,
            next_cursor: Some(last),
        };

        let value = page_to_json(page);
        assert_eq!(value["lowerId"], last.to_string());
        assert_eq!(value["Posts"].as_array().unwrap().len(), 2);
        assert_eq!(value["Posts"][1]["timestamp"], now.to_rfc3339());
    }

    #[test]
    fn post_request_ignores_timestamp() {
        let req: CreatePostRequest = serde_json::from_value(json!({
            "author": "alice",
            "content": "hi",
            "timestamp": "1999-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(req.author, "alice");
    }
}
