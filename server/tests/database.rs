//! Sqlite-backed access lookups and activity writes.

use server::access::{AccessControlService, ActivityStore, SqlAccessControl, SqlActivityStore};
use server::database::{self, NewUser};
use sqlx::SqlitePool;

async fn user(pool: &SqlitePool, name: &str, role_id: Option<i64>) -> i64 {
    database::create_user(
        pool,
        NewUser {
            username: name.to_string(),
            password: format!("{}-password", name),
            role_id,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn super_admin_flag_follows_role() {
    let pool = database::connect_in_memory().await.unwrap();
    let admin_role = database::create_role(&pool, "SuperAdmin", true).await.unwrap();
    let staff_role = database::create_role(&pool, "Staff", false).await.unwrap();
    let root = user(&pool, "root", Some(admin_role)).await;
    let alice = user(&pool, "alice", Some(staff_role)).await;

    let access = SqlAccessControl::new(pool.clone());
    assert!(access.is_super_admin(root, admin_role).await.unwrap());
    assert!(!access.is_super_admin(alice, staff_role).await.unwrap());
}

#[tokio::test]
async fn stale_role_claim_is_not_super_admin() {
    let pool = database::connect_in_memory().await.unwrap();
    let admin_role = database::create_role(&pool, "SuperAdmin", true).await.unwrap();
    let staff_role = database::create_role(&pool, "Staff", false).await.unwrap();
    let alice = user(&pool, "alice", Some(staff_role)).await;

    let access = SqlAccessControl::new(pool);
    assert!(!access.is_super_admin(alice, admin_role).await.unwrap());
    assert!(!access.is_super_admin(9_999, admin_role).await.unwrap());
}

#[tokio::test]
async fn deactivated_admin_loses_flag() {
    let pool = database::connect_in_memory().await.unwrap();
    let admin_role = database::create_role(&pool, "SuperAdmin", true).await.unwrap();
    let root = user(&pool, "root", Some(admin_role)).await;
    database::set_user_active(&pool, root, false).await.unwrap();

    let access = SqlAccessControl::new(pool);
    assert!(!access.is_super_admin(root, admin_role).await.unwrap());
}

#[tokio::test]
async fn lowest_project_id_wins() {
    let pool = database::connect_in_memory().await.unwrap();
    let alice = user(&pool, "alice", None).await;
    let first = database::create_project(&pool, "Alpha").await.unwrap();
    let second = database::create_project(&pool, "Beta").await.unwrap();
    database::assign_project(&pool, alice, second).await.unwrap();
    database::assign_project(&pool, alice, first).await.unwrap();
    database::assign_project(&pool, alice, first).await.unwrap();

    let access = SqlAccessControl::new(pool.clone());
    assert_eq!(access.get_user_project_id(alice).await.unwrap(), Some(first));

    let loner = user(&pool, "loner", None).await;
    assert_eq!(access.get_user_project_id(loner).await.unwrap(), None);
}

#[tokio::test]
async fn touch_updates_known_user_only() {
    let pool = database::connect_in_memory().await.unwrap();
    user(&pool, "alice", None).await;

    let store = SqlActivityStore::new(pool.clone());
    assert_eq!(store.touch("alice", 1_700_000_123).await.unwrap(), 1);
    assert_eq!(store.touch("ghost", 1_700_000_123).await.unwrap(), 0);

    assert_eq!(
        database::get_last_activity(&pool, "alice").await.unwrap(),
        Some(1_700_000_123)
    );
}

#[tokio::test]
async fn bootstrap_creates_and_reuses_super_admin() {
    let pool = database::connect_in_memory().await.unwrap();

    let id = database::bootstrap_super_admin(&pool, "root", "r00t-password")
        .await
        .unwrap();
    let again = database::bootstrap_super_admin(&pool, "root", "other-password")
        .await
        .unwrap();
    assert_eq!(id, again);

    let auth = database::get_user_auth(&pool, "root").await.unwrap().unwrap();
    assert!(auth.is_super_admin);
    assert!(database::verify_password(&auth.password_hash, "r00t-password").unwrap());
}

#[tokio::test]
async fn bootstrap_matches_padded_username() {
    let pool = database::connect_in_memory().await.unwrap();

    let id = database::bootstrap_super_admin(&pool, "root", "r00t-password")
        .await
        .unwrap();
    let again = database::bootstrap_super_admin(&pool, " root ", "other-password")
        .await
        .unwrap();
    assert_eq!(id, again);
    assert_eq!(database::list_users(&pool).await.unwrap().len(), 1);
}
