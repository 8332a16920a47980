/**
 * Post Types
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

/// A post with its owner populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub owner: UserSummary,
    pub title: Option<String>,
    pub content: String,
    pub media: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<Uuid>,
    pub likes_count: usize,
    pub comments: Vec<Uuid>,
    pub comments_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tags arrive either as a JSON array or as one comma-separated string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    /// Normalize into trimmed, non-blank tags
    pub fn into_tags(self) -> Vec<String> {
        let raw = match self {
            TagsInput::List(items) => items,
            TagsInput::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsInput>,
}

/// Result of `POST /posts/{postId}/like`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub post_id: Uuid,
    pub is_liked: bool,
    pub likes_count: usize,
}
