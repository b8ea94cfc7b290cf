//! Integration tests for profile administration: listing, ban/unban,
//! password flags, and aggregate stats.

use promptlib_db::models::profile::{CreateProfile, ProfileListParams, UpdateProfile};
use promptlib_db::models::session::CreateSession;
use promptlib_db::repositories::{ProfileRepo, SessionRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_profile(username: &str, role: &str) -> CreateProfile {
    CreateProfile {
        username: username.to_string(),
        email: Some(format!("{username}@example.com")),
        role: role.to_string(),
        password_hash: None,
    }
}

// ---------------------------------------------------------------------------
// Ban / unban
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn ban_and_unban_round_trip(pool: PgPool) {
    let user = ProfileRepo::create(&pool, &new_profile("mallory", "user"))
        .await
        .unwrap();
    assert_eq!(user.status, "active");

    assert!(ProfileRepo::ban(&pool, user.id).await.unwrap());

    let banned_page = ProfileRepo::list(
        &pool,
        &ProfileListParams {
            status: Some("banned".to_string()),
            ..ProfileListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(banned_page.total, 1);
    assert_eq!(banned_page.users[0].id, user.id);

    assert!(ProfileRepo::unban(&pool, user.id).await.unwrap());
    let after = ProfileRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.status, "active");

    let banned_after = ProfileRepo::list(
        &pool,
        &ProfileListParams {
            status: Some("banned".to_string()),
            ..ProfileListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(banned_after.total, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn ban_then_session_revocation_clears_active_sessions(pool: PgPool) {
    let user = ProfileRepo::create(&pool, &new_profile("eve", "user"))
        .await
        .unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "hash-1".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::days(7),
            user_agent: None,
            ip_address: None,
        },
    )
    .await
    .unwrap();

    ProfileRepo::ban(&pool, user.id).await.unwrap();
    let revoked = SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap();
    assert_eq!(revoked, 1);

    assert!(SessionRepo::find_active_by_hash(&pool, "hash-1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn cleanup_drops_expired_and_revoked_sessions_only(pool: PgPool) {
    let user = ProfileRepo::create(&pool, &new_profile("frank", "user"))
        .await
        .unwrap();
    let session = |hash: &str| CreateSession {
        user_id: user.id,
        refresh_token_hash: hash.to_string(),
        expires_at: chrono::Utc::now() + chrono::Duration::days(7),
        user_agent: None,
        ip_address: None,
    };

    SessionRepo::create(&pool, &session("live")).await.unwrap();
    let expired = SessionRepo::create(&pool, &session("expired")).await.unwrap();
    sqlx::query("UPDATE sessions SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(expired.id)
        .execute(&pool)
        .await
        .unwrap();
    let revoked = SessionRepo::create(&pool, &session("revoked")).await.unwrap();
    SessionRepo::revoke(&pool, revoked.id).await.unwrap();

    let deleted = SessionRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(deleted, 2);

    assert!(SessionRepo::find_active_by_hash(&pool, "live")
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_role_and_search(pool: PgPool) {
    ProfileRepo::create(&pool, &new_profile("alice", "admin"))
        .await
        .unwrap();
    ProfileRepo::create(&pool, &new_profile("bob", "user"))
        .await
        .unwrap();
    ProfileRepo::create(&pool, &new_profile("carol", "user"))
        .await
        .unwrap();

    let admins = ProfileRepo::list(
        &pool,
        &ProfileListParams {
            role: Some("admin".to_string()),
            ..ProfileListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(admins.total, 1);
    assert_eq!(admins.users[0].username, "alice");

    // Search matches username or email, case-insensitively.
    let by_search = ProfileRepo::list(
        &pool,
        &ProfileListParams {
            search: Some("BOB@EXAMPLE".to_string()),
            ..ProfileListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_search.total, 1);
    assert_eq!(by_search.users[0].username, "bob");
}

// ---------------------------------------------------------------------------
// Password flags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reset_password_sets_flag_and_reactivates(pool: PgPool) {
    let user = ProfileRepo::create(&pool, &new_profile("dave", "user"))
        .await
        .unwrap();
    ProfileRepo::ban(&pool, user.id).await.unwrap();

    assert!(ProfileRepo::reset_password(&pool, user.id, "$argon2id$fake")
        .await
        .unwrap());

    let after = ProfileRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(after.must_change_password);
    assert_eq!(after.status, "active");
    assert_eq!(after.password_hash.as_deref(), Some("$argon2id$fake"));

    assert!(ProfileRepo::change_password(&pool, user.id, "$argon2id$new")
        .await
        .unwrap());
    let changed = ProfileRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!changed.must_change_password);
}

// ---------------------------------------------------------------------------
// Update & stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_supplied_fields(pool: PgPool) {
    let user = ProfileRepo::create(&pool, &new_profile("erin", "user"))
        .await
        .unwrap();

    let updated = ProfileRepo::update(
        &pool,
        user.id,
        &UpdateProfile {
            role: Some("admin".to_string()),
            ..UpdateProfile::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.role, "admin");
    assert_eq!(updated.username, "erin");
    assert_eq!(updated.email.as_deref(), Some("erin@example.com"));
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_aggregate_counts(pool: PgPool) {
    ProfileRepo::create(&pool, &new_profile("a1", "admin")).await.unwrap();
    ProfileRepo::create(&pool, &new_profile("u1", "user")).await.unwrap();
    let banned = ProfileRepo::create(&pool, &new_profile("u2", "user"))
        .await
        .unwrap();
    ProfileRepo::ban(&pool, banned.id).await.unwrap();

    let stats = ProfileRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.admins, 1);
    assert_eq!(stats.banned, 1);
}
