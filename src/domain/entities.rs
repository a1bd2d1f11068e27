//! Domain entities mirrored from persistent storage.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::PostStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body_html: String,
    pub status: PostStatus,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl PostRecord {
    /// A published row without `published_at` is mid-publication and stays
    /// hidden until the writer finishes.
    pub fn is_visible(&self) -> bool {
        self.status.is_public() && self.published_at.is_some()
    }
}
