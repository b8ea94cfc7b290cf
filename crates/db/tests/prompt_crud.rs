//! Integration tests for prompt create/update/delete and tag-set replacement.

use promptlib_db::models::profile::CreateProfile;
use promptlib_db::models::prompt::{CreatePrompt, UpdatePrompt};
use promptlib_db::models::tag::CreateTag;
use promptlib_db::repositories::{ProfileRepo, PromptRepo, TagRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_prompt(title: &str) -> CreatePrompt {
    CreatePrompt {
        title: title.to_string(),
        description: Some("a short description".to_string()),
        content: "ten chars at least".to_string(),
        cover_image_url: None,
        is_public: true,
        is_featured: false,
        tag_ids: Vec::new(),
    }
}

async fn new_tag(pool: &PgPool, name: &str, slug: &str) -> i64 {
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
    .id
}

async fn association_count(pool: &PgPool, prompt_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM prompt_tags WHERE prompt_id = $1")
        .bind(prompt_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_with_tags_writes_associations(pool: PgPool) {
    let t1 = new_tag(&pool, "One", "one").await;
    let t2 = new_tag(&pool, "Two", "two").await;

    let mut input = new_prompt("tagged prompt");
    input.tag_ids = vec![t1, t2];
    let prompt = PromptRepo::create(&pool, &input, None).await.unwrap();

    assert_eq!(association_count(&pool, prompt.id).await, 2);

    let detail = PromptRepo::find_by_id(&pool, prompt.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.tags.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_tag_insert_leaves_no_prompt_row(pool: PgPool) {
    let mut input = new_prompt("doomed");
    input.tag_ids = vec![999_999];

    let result = PromptRepo::create(&pool, &input, None).await;
    assert!(result.is_err());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM prompts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0, "rolled-back create must leave no prompt row");
}

#[sqlx::test(migrations = "./migrations")]
async fn create_records_author(pool: PgPool) {
    let author = ProfileRepo::create(
        &pool,
        &CreateProfile {
            username: "alice".to_string(),
            email: None,
            role: "admin".to_string(),
            password_hash: None,
        },
    )
    .await
    .unwrap();

    let prompt = PromptRepo::create(&pool, &new_prompt("authored"), Some(author.id))
        .await
        .unwrap();
    assert_eq!(prompt.author_id, Some(author.id));

    let detail = PromptRepo::find_by_id(&pool, prompt.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.author.unwrap().username, "alice");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_supplied_fields(pool: PgPool) {
    let prompt = PromptRepo::create(&pool, &new_prompt("original"), None)
        .await
        .unwrap();

    let updated = PromptRepo::update(
        &pool,
        prompt.id,
        &UpdatePrompt {
            title: Some("renamed".to_string()),
            ..UpdatePrompt::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.content, prompt.content);
    assert_eq!(updated.description, prompt.description);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_replaces_full_tag_set(pool: PgPool) {
    let t1 = new_tag(&pool, "One", "one").await;
    let t2 = new_tag(&pool, "Two", "two").await;
    let t3 = new_tag(&pool, "Three", "three").await;

    let mut input = new_prompt("retagged");
    input.tag_ids = vec![t1, t2];
    let prompt = PromptRepo::create(&pool, &input, None).await.unwrap();

    PromptRepo::update(
        &pool,
        prompt.id,
        &UpdatePrompt {
            tag_ids: Some(vec![t3]),
            ..UpdatePrompt::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let detail = PromptRepo::find_by_id(&pool, prompt.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].id, t3);
}

#[sqlx::test(migrations = "./migrations")]
async fn clearing_tags_is_idempotent(pool: PgPool) {
    let t1 = new_tag(&pool, "One", "one").await;
    let mut input = new_prompt("cleared");
    input.tag_ids = vec![t1];
    let prompt = PromptRepo::create(&pool, &input, None).await.unwrap();
    assert_eq!(association_count(&pool, prompt.id).await, 1);

    let clear = UpdatePrompt {
        tag_ids: Some(Vec::new()),
        ..UpdatePrompt::default()
    };
    PromptRepo::update(&pool, prompt.id, &clear).await.unwrap();
    assert_eq!(association_count(&pool, prompt.id).await, 0);

    // Applying the empty set again yields the same empty association set.
    PromptRepo::update(&pool, prompt.id, &clear).await.unwrap();
    assert_eq!(association_count(&pool, prompt.id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_prompt_returns_none(pool: PgPool) {
    let result = PromptRepo::update(&pool, 42, &UpdatePrompt::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete / visibility / counters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_associations(pool: PgPool) {
    let t1 = new_tag(&pool, "One", "one").await;
    let mut input = new_prompt("deleted");
    input.tag_ids = vec![t1];
    let prompt = PromptRepo::create(&pool, &input, None).await.unwrap();

    assert!(PromptRepo::delete(&pool, prompt.id).await.unwrap());
    assert!(!PromptRepo::delete(&pool, prompt.id).await.unwrap());
    assert_eq!(association_count(&pool, prompt.id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn toggle_flips_visibility(pool: PgPool) {
    let prompt = PromptRepo::create(&pool, &new_prompt("toggled"), None)
        .await
        .unwrap();
    assert!(prompt.is_public);

    let hidden = PromptRepo::toggle_public(&pool, prompt.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!hidden.is_public);

    // Hidden prompts are absent from the public detail view.
    let public_view = PromptRepo::find_by_id(&pool, prompt.id, true).await.unwrap();
    assert!(public_view.is_none());

    let shown = PromptRepo::toggle_public(&pool, prompt.id)
        .await
        .unwrap()
        .unwrap();
    assert!(shown.is_public);
}

#[sqlx::test(migrations = "./migrations")]
async fn view_counter_increments_atomically(pool: PgPool) {
    let prompt = PromptRepo::create(&pool, &new_prompt("viewed"), None)
        .await
        .unwrap();

    for _ in 0..5 {
        assert!(PromptRepo::increment_view_count(&pool, prompt.id)
            .await
            .unwrap());
    }
    assert!(!PromptRepo::increment_view_count(&pool, 999_999)
        .await
        .unwrap());

    let detail = PromptRepo::find_by_id(&pool, prompt.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.view_count, 5);
}
