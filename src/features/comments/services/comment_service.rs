use chrono::Utc;
use tracing::info;

use crate::core::error::Result;
use crate::features::auth::session::SessionUser;
use crate::features::comments::dtos::CommentResponseDto;
use crate::features::comments::models::Comment;
use crate::modules::store::{DynCollection, Stored};

/// Comment service. Comments are keyed by the string form of a media
/// identifier with no relational integrity: a comment may reference an id
/// that no insert ever produced, and it is stored and served regardless.
pub struct CommentService {
    comments: DynCollection<Comment>,
}

impl CommentService {
    pub fn new(comments: DynCollection<Comment>) -> Self {
        Self { comments }
    }

    /// Append a comment for the given media identifier.
    pub async fn add(
        &self,
        media_id: &str,
        author: &SessionUser,
        text: String,
    ) -> Result<Stored<Comment>> {
        let comment = Comment {
            media_id: media_id.to_string(),
            user_id: author.user_id.clone(),
            user_name: author.user_name.clone(),
            text,
            created_at: Utc::now(),
        };

        let stored = self.comments.insert(comment).await?;
        info!(
            "Comment added: id={}, media_id={}, author={}",
            stored.id, stored.doc.media_id, stored.doc.user_id
        );

        Ok(stored)
    }

    /// All comments whose media_id string-equals the given identifier,
    /// in insertion order.
    pub async fn list_for_media(&self, media_id: &str) -> Result<Vec<Stored<Comment>>> {
        Ok(self
            .comments
            .find_all()
            .await?
            .into_iter()
            .filter(|item| item.doc.media_id == media_id)
            .collect())
    }

    pub fn to_response(stored: &Stored<Comment>) -> CommentResponseDto {
        CommentResponseDto {
            id: stored.id.to_string(),
            media_id: stored.doc.media_id.clone(),
            user_id: stored.doc.user_id.clone(),
            user_name: stored.doc.user_name.clone(),
            text: stored.doc.text.clone(),
            created_at: stored.doc.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::models::UserRole;
    use crate::modules::store::MemoryCollection;
    use std::sync::Arc;

    fn author() -> SessionUser {
        SessionUser {
            user_id: "7".to_string(),
            user_name: "Ayu".to_string(),
            role: UserRole::Consumer,
        }
    }

    fn service() -> CommentService {
        CommentService::new(Arc::new(MemoryCollection::new()))
    }

    #[tokio::test]
    async fn comments_are_listed_per_media_in_order() {
        let service = service();
        service.add("m1", &author(), "first".to_string()).await.unwrap();
        service.add("m2", &author(), "other".to_string()).await.unwrap();
        service.add("m1", &author(), "second".to_string()).await.unwrap();

        let for_m1 = service.list_for_media("m1").await.unwrap();
        let texts: Vec<_> = for_m1.iter().map(|c| c.doc.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    // Accepted invariant: no foreign-key enforcement. A comment posted
    // against an id no insert ever produced is stored without error and
    // retrievable by that id.
    #[tokio::test]
    async fn orphan_comments_are_stored_and_retrievable() {
        let service = service();
        let stored = service
            .add("never-inserted-id", &author(), "hello?".to_string())
            .await
            .unwrap();

        assert_eq!(stored.doc.media_id, "never-inserted-id");

        let listed = service.list_for_media("never-inserted-id").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].doc.text, "hello?");
    }

    #[tokio::test]
    async fn author_identity_is_recorded() {
        let service = service();
        let stored = service.add("m1", &author(), "hi".to_string()).await.unwrap();

        assert_eq!(stored.doc.user_id, "7");
        assert_eq!(stored.doc.user_name, "Ayu");
    }
}
