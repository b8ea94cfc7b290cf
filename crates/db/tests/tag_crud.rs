//! Integration tests for tag CRUD, uniqueness, and usage counting.

use promptlib_db::models::prompt::CreatePrompt;
use promptlib_db::models::tag::{CreateTag, UpdateTag};
use promptlib_db::repositories::{PromptRepo, TagRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_tag(pool: &PgPool, name: &str, slug: &str) -> promptlib_db::models::tag::Tag {
    TagRepo::create(
        pool,
        &CreateTag {
            name: name.to_string(),
            slug: slug.to_string(),
            color: None,
        },
        "blue",
    )
    .await
    .unwrap()
}

async fn tagged_prompt(pool: &PgPool, title: &str, tag_ids: Vec<i64>) -> i64 {
    PromptRepo::create(
        pool,
        &CreatePrompt {
            title: title.to_string(),
            description: None,
            content: "ten chars at least".to_string(),
            cover_image_url: None,
            is_public: true,
            is_featured: false,
            tag_ids,
        },
        None,
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn slug_exists_excludes_own_row(pool: PgPool) {
    let tag = new_tag(&pool, "Writing", "writing").await;

    assert!(TagRepo::slug_exists(&pool, "writing", None).await.unwrap());
    assert!(!TagRepo::slug_exists(&pool, "writing", Some(tag.id))
        .await
        .unwrap());
    assert!(!TagRepo::slug_exists(&pool, "other", None).await.unwrap());

    assert!(TagRepo::name_exists(&pool, "Writing", None).await.unwrap());
    assert!(!TagRepo::name_exists(&pool, "Writing", Some(tag.id))
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_insert_is_rejected_by_schema(pool: PgPool) {
    new_tag(&pool, "Writing", "writing").await;

    let result = TagRepo::create(
        &pool,
        &CreateTag {
            name: "Writing2".to_string(),
            slug: "writing".to_string(),
            color: None,
        },
        "blue",
    )
    .await;
    assert!(result.is_err());

    // The first tag remains the only row with that slug.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM tags WHERE slug = 'writing'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Delete protection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn tag_in_use_cannot_be_deleted(pool: PgPool) {
    let tag = new_tag(&pool, "Used", "used").await;
    tagged_prompt(&pool, "carrier", vec![tag.id]).await;

    assert_eq!(TagRepo::usage_count(&pool, tag.id).await.unwrap(), 1);

    // The schema-level RESTRICT refuses the delete outright.
    assert!(TagRepo::delete(&pool, tag.id).await.is_err());
    assert!(TagRepo::find_by_id(&pool, tag.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn unused_tag_deletes_cleanly(pool: PgPool) {
    let tag = new_tag(&pool, "Unused", "unused").await;
    assert_eq!(TagRepo::usage_count(&pool, tag.id).await.unwrap(), 0);
    assert!(TagRepo::delete(&pool, tag.id).await.unwrap());
    assert!(TagRepo::find_by_id(&pool, tag.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Lookup & update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn find_by_slug_and_update(pool: PgPool) {
    let tag = new_tag(&pool, "Coding", "coding").await;
    assert_eq!(tag.color, "blue");

    let found = TagRepo::find_by_slug(&pool, "coding").await.unwrap().unwrap();
    assert_eq!(found.id, tag.id);

    let updated = TagRepo::update(
        &pool,
        tag.id,
        &UpdateTag {
            name: None,
            slug: None,
            color: Some("green".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.color, "green");
    assert_eq!(updated.name, "Coding");

    assert!(TagRepo::update(&pool, 999, &UpdateTag { name: None, slug: None, color: None })
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn counts_and_popular_ordering(pool: PgPool) {
    let busy = new_tag(&pool, "Busy", "busy").await;
    let quiet = new_tag(&pool, "Quiet", "quiet").await;
    let idle = new_tag(&pool, "Idle", "idle").await;

    tagged_prompt(&pool, "a", vec![busy.id, quiet.id]).await;
    tagged_prompt(&pool, "b", vec![busy.id]).await;

    let stats = TagRepo::list_with_counts(&pool).await.unwrap();
    assert_eq!(stats.len(), 3);
    // Alphabetical by name, each with its count.
    let by_name: Vec<(&str, i64)> = stats
        .iter()
        .map(|t| (t.name.as_str(), t.prompt_count))
        .collect();
    assert_eq!(by_name, vec![("Busy", 2), ("Idle", 0), ("Quiet", 1)]);

    let popular = TagRepo::popular(&pool, 2).await.unwrap();
    assert_eq!(popular.len(), 2);
    assert_eq!(popular[0].id, busy.id);
    assert_eq!(popular[1].id, quiet.id);
    let _ = idle;
}
