use crate::cli::commands::user::{add_user, delete_user, generate_api_key, list_users, update_user};
use crate::cli::error::CliError;
use crate::db::{Database, DbError, SqliteDatabase, User, UserRepository};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

#[test]
fn test_generate_api_key_is_sha256_hex() {
    let key = generate_api_key("alice");
    assert_eq!(key.len(), 64);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_generate_api_key_differs_per_call() {
    assert_ne!(generate_api_key("alice"), generate_api_key("alice"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_user_with_explicit_key() {
    let db = setup_db().await;

    let output = add_user(&db, "alice", Some("alice-key")).await.unwrap();

    assert!(output.contains("✓ Created user: alice"));
    assert!(output.contains("alice-key"));
    let users = db.users().list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].api_key, "alice-key");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_user_generates_key() {
    let db = setup_db().await;

    add_user(&db, "bob", None).await.unwrap();

    let users = db.users().list().await.unwrap();
    assert_eq!(users[0].api_key.len(), 64);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_user_duplicate_key_fails() {
    let db = setup_db().await;
    add_user(&db, "alice", Some("shared")).await.unwrap();

    let err = add_user(&db, "bob", Some("shared")).await.unwrap_err();

    assert!(matches!(
        err,
        CliError::Database(DbError::Constraint { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_users_table_and_json() {
    let db = setup_db().await;
    assert_eq!(list_users(&db, "table").await.unwrap(), "No users found.");

    add_user(&db, "alice", Some("k1")).await.unwrap();
    add_user(&db, "bob", Some("k2")).await.unwrap();

    let table = list_users(&db, "table").await.unwrap();
    assert!(table.contains("Name"));
    assert!(table.contains("alice"));
    assert!(table.contains("bob"));

    let json = list_users(&db, "json").await.unwrap();
    let users: Vec<User> = serde_json::from_str(&json).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].name, "bob");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_user_partial() {
    let db = setup_db().await;
    add_user(&db, "alice", Some("k1")).await.unwrap();
    let id = db.users().list().await.unwrap()[0].id;

    let output = update_user(&db, id, Some("alice2".to_string()), None)
        .await
        .unwrap();
    assert!(output.contains("alice2"));

    let user = db.users().get(id).await.unwrap();
    assert_eq!(user.name, "alice2");
    assert_eq!(user.api_key, "k1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_user_without_fields_is_rejected() {
    let db = setup_db().await;

    let err = update_user(&db, 1, None, None).await.unwrap_err();

    assert!(matches!(err, CliError::InvalidArgument { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_unknown_user_is_not_found() {
    let db = setup_db().await;

    let err = update_user(&db, 42, Some("x".to_string()), None)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Database(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_user_is_idempotent() {
    let db = setup_db().await;
    add_user(&db, "alice", Some("k1")).await.unwrap();
    let id = db.users().list().await.unwrap()[0].id;

    let first = delete_user(&db, id).await.unwrap();
    assert!(first.starts_with("✓ Deleted user"));

    let second = delete_user(&db, id).await.unwrap();
    assert!(second.contains("nothing deleted"));
    assert!(db.users().list().await.unwrap().is_empty());
}
