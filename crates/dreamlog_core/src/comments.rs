//! crates/dreamlog_core/src/comments.rs
//!
//! Comment threading and composition. Comments live in their own collection
//! and reference the owning dream; a dream's comment set is therefore a
//! reverse lookup recomputed on every read, never a stored list. Replies
//! reference their parent comment, forming a forest per dream.
//!
//! Every failed resolution names the missing entity (dream, parent comment,
//! or comment) so callers can produce precise diagnostics.

use uuid::Uuid;

use crate::domain::{Comment, CommentDraft, CommentPatch, NewComment};
use crate::error::{Entity, Error, Violation, ViolationKind};
use crate::ports::JournalStore;

/// Creates a top-level comment under a dream. The dream must resolve;
/// content and author must be present.
pub async fn create_top_level(
    store: &dyn JournalStore,
    dream_id: Uuid,
    attrs: NewComment,
) -> Result<Comment, Error> {
    if store.find_dream(dream_id).await?.is_none() {
        return Err(Error::NotFound(Entity::Dream));
    }
    let draft = comment_draft(attrs, dream_id, None)?;
    Ok(store.create_comment(draft).await?)
}

/// Creates a reply to an existing comment. The dream is resolved before the
/// parent, so an unknown dream reports `Dream not found` even when the
/// parent id is also bogus.
///
/// The parent's own dream reference is deliberately not compared against
/// `dream_id`; a reply can point at a parent from another dream. Known gap,
/// kept until the product decides otherwise.
pub async fn create_reply(
    store: &dyn JournalStore,
    dream_id: Uuid,
    parent_id: Uuid,
    attrs: NewComment,
) -> Result<Comment, Error> {
    if store.find_dream(dream_id).await?.is_none() {
        return Err(Error::NotFound(Entity::Dream));
    }
    if store.find_comment(parent_id).await?.is_none() {
        return Err(Error::NotFound(Entity::ParentComment));
    }
    let draft = comment_draft(attrs, dream_id, Some(parent_id))?;
    Ok(store.create_comment(draft).await?)
}

/// Updates a comment's content. The lookup is dream-scoped: the comment must
/// be part of the given dream's composed set. Content is the only field this
/// path may touch; an absent content leaves the comment as it is.
pub async fn update_content(
    store: &dyn JournalStore,
    dream_id: Uuid,
    comment_id: Uuid,
    patch: CommentPatch,
) -> Result<Comment, Error> {
    let mut comment = find_in_dream(store, dream_id, comment_id).await?;
    let Some(content) = patch.content else {
        return Ok(comment);
    };
    if content.is_empty() {
        return Err(Error::Validation(vec![Violation::new(
            "content",
            ViolationKind::Required,
            "Content is required",
        )]));
    }
    comment.content = content;
    Ok(store.save_comment(comment).await?)
}

/// Deletes a comment by id, unconditionally. Replies whose parent was this
/// comment are left in place with a dangling parent reference.
pub async fn delete(store: &dyn JournalStore, comment_id: Uuid) -> Result<Comment, Error> {
    store
        .delete_comment(comment_id)
        .await?
        .ok_or(Error::NotFound(Entity::Comment))
}

/// Composes the comment set of a dream: every comment referencing the id,
/// in insertion order. There is no dream existence requirement here, so the
/// comments of a deleted dream stay readable.
pub async fn for_dream(store: &dyn JournalStore, dream_id: Uuid) -> Result<Vec<Comment>, Error> {
    Ok(store.find_comments_by_dream(dream_id).await?)
}

/// Locates one comment within an existing dream's composed set. Yields
/// `Dream not found` when the dream is unknown and `Comment not found` when
/// the dream exists but the comment is not among its comments - a comment
/// belonging to another dream is not reachable through this path.
pub async fn find_in_dream(
    store: &dyn JournalStore,
    dream_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, Error> {
    if store.find_dream(dream_id).await?.is_none() {
        return Err(Error::NotFound(Entity::Dream));
    }
    let comments = store.find_comments_by_dream(dream_id).await?;
    comments
        .into_iter()
        .find(|comment| comment.id == comment_id)
        .ok_or(Error::NotFound(Entity::Comment))
}

// Presence validation shared by both creation paths. Schema order: content
// first, then author.
fn comment_draft(
    attrs: NewComment,
    dream: Uuid,
    parent: Option<Uuid>,
) -> Result<CommentDraft, Error> {
    let mut violations = Vec::new();

    let content = attrs.content.filter(|c| !c.is_empty());
    if content.is_none() {
        violations.push(Violation::new(
            "content",
            ViolationKind::Required,
            "Content is required",
        ));
    }
    if attrs.author.is_none() {
        violations.push(Violation::new(
            "author",
            ViolationKind::Required,
            "Author is required",
        ));
    }

    match (content, attrs.author) {
        (Some(content), Some(author)) => Ok(CommentDraft {
            content,
            author,
            dream,
            parent,
        }),
        _ => Err(Error::Validation(violations)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DreamDraft, UserDraft};
    use crate::memory::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        author: Uuid,
        dream: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let author = store
            .create_user(UserDraft {
                name: "rem".into(),
                email: None,
                password_hash: "hash".into(),
                description: None,
                avatar: None,
            })
            .await
            .unwrap()
            .id;
        let dream = seed_dream(&store, author).await;
        Fixture {
            store,
            author,
            dream,
        }
    }

    async fn seed_dream(store: &MemoryStore, author: Uuid) -> Uuid {
        store
            .create_dream(DreamDraft {
                author,
                anonym: false,
                content: "content".into(),
                title: "title".into(),
                topics: vec![Uuid::new_v4()],
                kind: Uuid::new_v4(),
                published: false,
            })
            .await
            .unwrap()
            .id
    }

    fn attrs(content: &str, author: Uuid) -> NewComment {
        NewComment {
            content: Some(content.into()),
            author: Some(author),
        }
    }

    #[tokio::test]
    async fn top_level_comment_lands_in_the_dream_set() {
        let fx = fixture().await;
        let comment = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();

        assert_eq!(comment.dream, fx.dream);
        assert_eq!(comment.parent, None);
        let set = for_dream(&fx.store, fx.dream).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].id, comment.id);
    }

    #[tokio::test]
    async fn top_level_comment_requires_an_existing_dream() {
        let fx = fixture().await;
        let err = create_top_level(&fx.store, Uuid::new_v4(), attrs("hi", fx.author))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Dream)));
    }

    #[tokio::test]
    async fn missing_fields_are_reported_and_nothing_is_persisted() {
        let fx = fixture().await;
        let err = create_top_level(&fx.store, fx.dream, NewComment::default())
            .await
            .unwrap_err();

        let fields: Vec<&str> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["content", "author"]);
        assert!(for_dream(&fx.store, fx.dream).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reply_links_to_its_parent() {
        let fx = fixture().await;
        let parent = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();
        let reply = create_reply(&fx.store, fx.dream, parent.id, attrs("re", fx.author))
            .await
            .unwrap();

        assert_eq!(reply.parent, Some(parent.id));
        assert_eq!(reply.dream, fx.dream);
    }

    #[tokio::test]
    async fn reply_with_unknown_parent_persists_nothing() {
        let fx = fixture().await;
        let err = create_reply(&fx.store, fx.dream, Uuid::new_v4(), attrs("re", fx.author))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(Entity::ParentComment)));
        assert!(for_dream(&fx.store, fx.dream).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_dream_wins_over_unknown_parent() {
        let fx = fixture().await;
        // Both ids are bogus; the dream must be the reported entity.
        let err = create_reply(
            &fx.store,
            Uuid::new_v4(),
            Uuid::new_v4(),
            attrs("re", fx.author),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Dream)));

        // Even a perfectly valid parent does not change the outcome.
        let parent = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();
        let err = create_reply(&fx.store, Uuid::new_v4(), parent.id, attrs("re", fx.author))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Dream)));
    }

    #[tokio::test]
    async fn cross_dream_reply_is_representable() {
        let fx = fixture().await;
        let other_dream = seed_dream(&fx.store, fx.author).await;
        let parent = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();

        // Parent lives in fx.dream, the reply is posted under other_dream.
        let reply = create_reply(&fx.store, other_dream, parent.id, attrs("re", fx.author))
            .await
            .unwrap();

        assert_eq!(reply.dream, other_dream);
        assert_eq!(reply.parent, Some(parent.id));
        let set = for_dream(&fx.store, other_dream).await.unwrap();
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn composition_orders_by_insertion_and_scopes_by_dream() {
        let fx = fixture().await;
        let other_dream = seed_dream(&fx.store, fx.author).await;
        let c1 = create_top_level(&fx.store, fx.dream, attrs("first", fx.author))
            .await
            .unwrap();
        let c2 = create_reply(&fx.store, fx.dream, c1.id, attrs("second", fx.author))
            .await
            .unwrap();

        let set = for_dream(&fx.store, fx.dream).await.unwrap();
        let ids: Vec<Uuid> = set.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![c1.id, c2.id]);

        assert!(for_dream(&fx.store, other_dream).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_is_dream_scoped_not_global() {
        let fx = fixture().await;
        let other_dream = seed_dream(&fx.store, fx.author).await;
        let foreign = create_top_level(&fx.store, other_dream, attrs("hi", fx.author))
            .await
            .unwrap();

        let err = find_in_dream(&fx.store, fx.dream, foreign.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Comment)));

        let err = find_in_dream(&fx.store, Uuid::new_v4(), foreign.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Dream)));
    }

    #[tokio::test]
    async fn update_rewrites_content_only_within_the_dream() {
        let fx = fixture().await;
        let comment = create_top_level(&fx.store, fx.dream, attrs("before", fx.author))
            .await
            .unwrap();

        let updated = update_content(
            &fx.store,
            fx.dream,
            comment.id,
            CommentPatch {
                content: Some("after".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.content, "after");

        // No content supplied: the comment stays as it is.
        let untouched = update_content(&fx.store, fx.dream, comment.id, CommentPatch::default())
            .await
            .unwrap();
        assert_eq!(untouched.content, "after");

        let other_dream = seed_dream(&fx.store, fx.author).await;
        let err = update_content(
            &fx.store,
            other_dream,
            comment.id,
            CommentPatch {
                content: Some("hijack".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Comment)));
    }

    #[tokio::test]
    async fn deleting_a_parent_orphans_its_replies() {
        let fx = fixture().await;
        let parent = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();
        let reply = create_reply(&fx.store, fx.dream, parent.id, attrs("re", fx.author))
            .await
            .unwrap();

        delete(&fx.store, parent.id).await.unwrap();

        let set = for_dream(&fx.store, fx.dream).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].id, reply.id);
        // The dangling parent reference stays in place.
        assert_eq!(set[0].parent, Some(parent.id));
    }

    #[tokio::test]
    async fn deleting_a_dream_leaves_its_comments_readable() {
        let fx = fixture().await;
        let comment = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();

        fx.store.delete_dream(fx.dream).await.unwrap();

        let set = for_dream(&fx.store, fx.dream).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].id, comment.id);
        // Dream-scoped lookup refuses the dead dream, though.
        let err = find_in_dream(&fx.store, fx.dream, comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Dream)));
    }

    #[tokio::test]
    async fn delete_is_by_id_and_reports_unknown_comments() {
        let fx = fixture().await;
        let comment = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();

        delete(&fx.store, comment.id).await.unwrap();
        let err = delete(&fx.store, comment.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Comment)));
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let fx = fixture().await;
        let comment = create_top_level(&fx.store, fx.dream, attrs("hi", fx.author))
            .await
            .unwrap();

        let first = find_in_dream(&fx.store, fx.dream, comment.id).await.unwrap();
        let second = find_in_dream(&fx.store, fx.dream, comment.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.content, second.content);
        assert_eq!(first.updated_at, second.updated_at);
    }
}
