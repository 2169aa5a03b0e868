use super::*;
use crate::test_utils::init_test_pool;

async fn setup_pool() -> SqlitePool {
    let pool = init_test_pool().await;
    ensure_settings_table(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn test_kv_setting_round_trip() {
    let pool = setup_pool().await;

    // Initially empty
    let val = get_setting(&pool, "last_destination_dir").await.unwrap();
    assert!(val.is_none());

    set_setting(&pool, "last_destination_dir", "/out").await.unwrap();
    let val = get_setting(&pool, "last_destination_dir").await.unwrap();
    assert_eq!(val.as_deref(), Some("/out"));

    // Overwrite
    set_setting(&pool, "last_destination_dir", "/elsewhere")
        .await
        .unwrap();
    let val = get_setting(&pool, "last_destination_dir").await.unwrap();
    assert_eq!(val.as_deref(), Some("/elsewhere"));
}

#[tokio::test]
async fn test_ensure_table_is_idempotent() {
    let pool = setup_pool().await;
    set_setting(&pool, "k", "v").await.unwrap();

    ensure_settings_table(&pool).await.unwrap();

    assert_eq!(get_setting(&pool, "k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_missing_table_is_an_error() {
    let pool = init_test_pool().await;
    assert!(get_setting(&pool, "k").await.is_err());
}
