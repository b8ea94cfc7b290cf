//! Integration tests for the single-row settings store.

use promptlib_core::settings::SiteSettings;
use promptlib_db::repositories::SettingsRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn absent_row_yields_defaults(pool: PgPool) {
    let settings = SettingsRepo::fetch(&pool).await.unwrap();
    assert_eq!(settings, SiteSettings::default());
}

#[sqlx::test(migrations = "./migrations")]
async fn save_then_fetch_round_trips(pool: PgPool) {
    let mut settings = SiteSettings::default();
    settings.site_name = "My Library".to_string();
    settings.allow_public_submissions = true;

    let data = serde_json::to_value(&settings).unwrap();
    SettingsRepo::save(&pool, &data).await.unwrap();

    let fetched = SettingsRepo::fetch(&pool).await.unwrap();
    assert_eq!(fetched, settings);
}

#[sqlx::test(migrations = "./migrations")]
async fn save_twice_keeps_a_single_row(pool: PgPool) {
    let first = serde_json::to_value(SiteSettings::default()).unwrap();
    SettingsRepo::save(&pool, &first).await.unwrap();

    let mut changed = SiteSettings::default();
    changed.copy_success_message = "Done!".to_string();
    let second = serde_json::to_value(&changed).unwrap();
    SettingsRepo::save(&pool, &second).await.unwrap();

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let fetched = SettingsRepo::fetch(&pool).await.unwrap();
    assert_eq!(fetched.copy_success_message, "Done!");
}

#[sqlx::test(migrations = "./migrations")]
async fn partial_blob_is_merged_over_defaults(pool: PgPool) {
    // Simulate a row written by an older version carrying only one field.
    SettingsRepo::save(&pool, &serde_json::json!({ "site_name": "Old Name" }))
        .await
        .unwrap();

    let fetched = SettingsRepo::fetch(&pool).await.unwrap();
    assert_eq!(fetched.site_name, "Old Name");
    assert_eq!(
        fetched.site_description,
        SiteSettings::default().site_description
    );
}
