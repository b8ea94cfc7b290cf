//! Integration tests for copy-event recording, statistics, and the admin log.

use assert_matches::assert_matches;
use promptlib_db::models::copy_event::{CopyEventListParams, CreateCopyEvent};
use promptlib_db::models::profile::CreateProfile;
use promptlib_db::models::prompt::CreatePrompt;
use promptlib_db::repositories::{CopyEventRepo, ProfileRepo, PromptRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_prompt(pool: &PgPool, title: &str) -> i64 {
    PromptRepo::create(
        pool,
        &CreatePrompt {
            title: title.to_string(),
            description: None,
            content: "ten chars at least".to_string(),
            cover_image_url: None,
            is_public: true,
            is_featured: false,
            tag_ids: Vec::new(),
        },
        None,
    )
    .await
    .unwrap()
    .id
}

fn copy_event(prompt_id: i64, user_id: Option<uuid::Uuid>) -> CreateCopyEvent {
    CreateCopyEvent {
        prompt_id,
        user_id,
        ip_address: Some("203.0.113.9".to_string()),
        user_agent: Some("integration-test".to_string()),
        referrer: None,
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn record_bumps_copy_count_and_appends_event(pool: PgPool) {
    let prompt_id = new_prompt(&pool, "copied").await;

    let event = CopyEventRepo::record(&pool, &copy_event(prompt_id, None))
        .await
        .unwrap();
    assert_eq!(event.prompt_id, prompt_id);
    assert!(event.user_id.is_none());

    let detail = PromptRepo::find_by_id(&pool, prompt_id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.copy_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn record_against_missing_prompt_fails_without_orphan_event(pool: PgPool) {
    let result = CopyEventRepo::record(&pool, &copy_event(12345, None)).await;
    assert_matches!(result, Err(sqlx::Error::RowNotFound));

    let events: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM copy_events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(events, 0);
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn anonymous_copies_count_toward_totals_but_not_unique_users(pool: PgPool) {
    let prompt_id = new_prompt(&pool, "stats").await;
    let user = ProfileRepo::create(
        &pool,
        &CreateProfile {
            username: "copier".to_string(),
            email: None,
            role: "user".to_string(),
            password_hash: None,
        },
    )
    .await
    .unwrap();

    // One anonymous copy, two by the same user.
    CopyEventRepo::record(&pool, &copy_event(prompt_id, None))
        .await
        .unwrap();
    CopyEventRepo::record(&pool, &copy_event(prompt_id, Some(user.id)))
        .await
        .unwrap();
    CopyEventRepo::record(&pool, &copy_event(prompt_id, Some(user.id)))
        .await
        .unwrap();

    let stats = CopyEventRepo::stats(&pool, Some(prompt_id), 30).await.unwrap();
    assert_eq!(stats.total_copies, 3);
    assert_eq!(stats.unique_users, 1);
    assert_eq!(stats.prompt_id, Some(prompt_id));
    assert_eq!(stats.days, 30);

    // All three fall into today's bucket.
    assert_eq!(stats.daily.len(), 1);
    assert_eq!(*stats.daily.values().next().unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_window_excludes_old_events(pool: PgPool) {
    let prompt_id = new_prompt(&pool, "windowed").await;
    let event = CopyEventRepo::record(&pool, &copy_event(prompt_id, None))
        .await
        .unwrap();

    // Age the event beyond the window.
    sqlx::query("UPDATE copy_events SET created_at = NOW() - INTERVAL '10 days' WHERE id = $1")
        .bind(event.id)
        .execute(&pool)
        .await
        .unwrap();

    let wide = CopyEventRepo::stats(&pool, Some(prompt_id), 30).await.unwrap();
    assert_eq!(wide.total_copies, 1);

    let narrow = CopyEventRepo::stats(&pool, Some(prompt_id), 7).await.unwrap();
    assert_eq!(narrow.total_copies, 0);
    assert!(narrow.daily.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_without_prompt_filter_cover_all_prompts(pool: PgPool) {
    let first = new_prompt(&pool, "first").await;
    let second = new_prompt(&pool, "second").await;
    CopyEventRepo::record(&pool, &copy_event(first, None)).await.unwrap();
    CopyEventRepo::record(&pool, &copy_event(second, None)).await.unwrap();

    let stats = CopyEventRepo::stats(&pool, None, 30).await.unwrap();
    assert_eq!(stats.total_copies, 2);
    assert!(stats.prompt_id.is_none());
}

// ---------------------------------------------------------------------------
// Admin log & export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn log_joins_prompt_title_and_username(pool: PgPool) {
    let prompt_id = new_prompt(&pool, "logged prompt").await;
    let user = ProfileRepo::create(
        &pool,
        &CreateProfile {
            username: "logger".to_string(),
            email: None,
            role: "user".to_string(),
            password_hash: None,
        },
    )
    .await
    .unwrap();
    CopyEventRepo::record(&pool, &copy_event(prompt_id, Some(user.id)))
        .await
        .unwrap();
    CopyEventRepo::record(&pool, &copy_event(prompt_id, None))
        .await
        .unwrap();

    let page = CopyEventRepo::list(
        &pool,
        &CopyEventListParams {
            prompt_id: Some(prompt_id),
            ..CopyEventListParams::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.events.len(), 2);
    assert_eq!(page.events[0].prompt_title.as_deref(), Some("logged prompt"));
    // Newest first: the anonymous copy came last.
    assert!(page.events[0].username.is_none());
    assert_eq!(page.events[1].username.as_deref(), Some("logger"));

    let exported = CopyEventRepo::export(&pool, Some(prompt_id), 30).await.unwrap();
    assert_eq!(exported.len(), 2);
    // Export is oldest first.
    assert_eq!(exported[0].username.as_deref(), Some("logger"));
}
