//! PostgreSQL tests for `UserRepo` and `PgCredentialStore`.
//!
//! These need a live database (`DATABASE_URL`); run them with
//! `cargo test -p repcount-db -- --ignored`.

use assert_matches::assert_matches;
use repcount_db::models::user::CreateUser;
use repcount_db::repositories::UserRepo;
use repcount_db::store::{CredentialStore, PgCredentialStore, StoreError};
use sqlx::PgPool;

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@x.com"),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn rotate_only_matches_current_token(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("rotator")).await.unwrap();
    assert!(UserRepo::set_refresh_token(&pool, user.id, Some("t1"))
        .await
        .unwrap());

    assert!(UserRepo::rotate_refresh_token(&pool, user.id, "t1", "t2")
        .await
        .unwrap());
    assert!(!UserRepo::rotate_refresh_token(&pool, user.id, "t1", "t3")
        .await
        .unwrap());

    let found = UserRepo::find_by_refresh_token(&pool, "t2")
        .await
        .unwrap()
        .expect("rotated token should be stored");
    assert_eq!(found.id, user.id);
    assert!(UserRepo::find_by_refresh_token(&pool, "t1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn clearing_refresh_token_sets_null(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("leaver")).await.unwrap();
    UserRepo::set_refresh_token(&pool, user.id, Some("t1"))
        .await
        .unwrap();

    assert!(UserRepo::set_refresh_token(&pool, user.id, None)
        .await
        .unwrap());

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.refresh_token.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_maps_to_conflict(pool: PgPool) {
    let store = PgCredentialStore::new(pool);
    store.create_user(&new_user("dupe")).await.unwrap();

    let again = CreateUser {
        username: "dupe2".into(),
        ..new_user("dupe")
    };
    assert_matches!(
        store.create_user(&again).await,
        Err(StoreError::Conflict(c)) if c == "uq_users_email"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn set_password_hash_updates_existing_user_only(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("changer")).await.unwrap();

    assert!(UserRepo::set_password_hash(&pool, user.id, "$argon2id$new")
        .await
        .unwrap());
    assert!(!UserRepo::set_password_hash(&pool, user.id + 1000, "$argon2id$new")
        .await
        .unwrap());

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "$argon2id$new");
}
