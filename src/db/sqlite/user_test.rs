//! Tests for SqliteUserRepository.

use crate::db::{Database, DbError, NewUser, SqliteDatabase, UserPatch, UserRepository};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn new_user(name: &str, api_key: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        api_key: api_key.to_string(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn user_create_and_get() {
    let db = setup_db().await;
    let users = db.users();

    let created = users
        .create(&new_user("alice", "key-alice"))
        .await
        .expect("Create should succeed");
    assert!(created.id > 0);
    assert_eq!(created.updated_at, created.created_at);

    let retrieved = users.get(created.id).await.expect("Get should succeed");
    assert_eq!(retrieved, created);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_duplicate_api_key_is_constraint_violation() {
    let db = setup_db().await;
    let users = db.users();

    users.create(&new_user("alice", "shared-key")).await.unwrap();
    let result = users.create(&new_user("bob", "shared-key")).await;

    assert!(
        matches!(result, Err(DbError::Constraint { .. })),
        "Expected constraint violation, got {:?}",
        result
    );
    assert_eq!(users.list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_update_to_taken_api_key_is_constraint_violation() {
    let db = setup_db().await;
    let users = db.users();

    users.create(&new_user("alice", "key-a")).await.unwrap();
    let bob = users.create(&new_user("bob", "key-b")).await.unwrap();

    let result = users
        .update(
            bob.id,
            &UserPatch {
                api_key: Some("key-a".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DbError::Constraint { .. })));
    assert_eq!(users.get(bob.id).await.unwrap().api_key, "key-b");
}

#[tokio::test(flavor = "multi_thread")]
async fn user_partial_update() {
    let db = setup_db().await;
    let users = db.users();
    let created = users.create(&new_user("alice", "key-alice")).await.unwrap();

    let updated = users
        .update(
            created.id,
            &UserPatch {
                name: Some("Alice Liddell".to_string()),
                api_key: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Alice Liddell");
    assert_eq!(updated.api_key, "key-alice");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_get_and_update_nonexistent_return_not_found() {
    let db = setup_db().await;
    let users = db.users();

    assert!(matches!(users.get(77).await, Err(DbError::NotFound { .. })));
    assert!(matches!(
        users.update(77, &UserPatch::default()).await,
        Err(DbError::NotFound { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn user_delete() {
    let db = setup_db().await;
    let users = db.users();
    let created = users.create(&new_user("alice", "key-alice")).await.unwrap();

    assert!(users.delete(created.id).await.unwrap());
    assert!(!users.delete(created.id).await.unwrap());
    assert!(users.list().await.unwrap().is_empty());
}
