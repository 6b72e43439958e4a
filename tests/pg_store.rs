//! Repository tests against PostgreSQL.
//!
//! These need a reachable database (`DATABASE_URL`) and are marked with
//! `#[ignore]` for CI. Each test gets a fresh migrated database.
//! Run with: cargo test --test pg_store -- --ignored

use projectshare::{
    auth::jwt::AuthUser,
    bookmarks::repo::BookmarkRepo,
    comments::repo::CommentRepo,
    db::PgStore,
    error::AppError,
    projects::repo::{ProjectInput, ProjectQuery, ProjectRepo},
    users::repo::{NewUser, UserRepo},
};
use sqlx::PgPool;

async fn user(store: &PgStore, username: &str) -> AuthUser {
    let user = store
        .create_user(NewUser {
            username: username.into(),
            email: format!("{username}@example.com"),
            password_hash: "unusable".into(),
        })
        .await
        .unwrap();
    AuthUser {
        id: user.id,
        username: user.username,
    }
}

fn input(name: &str, technologies: &[&str]) -> ProjectInput {
    ProjectInput {
        name: name.into(),
        description: None,
        github: None,
        technologies: technologies.iter().map(|t| t.to_string()).collect(),
        deployment_link: None,
    }
}

fn query() -> ProjectQuery {
    ProjectQuery {
        limit: 50,
        ..Default::default()
    }
}

fn names(projects: &[projectshare::projects::repo::Project]) -> Vec<&str> {
    projects.iter().map(|p| p.name.as_str()).collect()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn duplicate_username_is_conflict(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    user(&store, "alice").await;
    let err = store
        .create_user(NewUser {
            username: "alice".into(),
            email: "other@example.com".into(),
            password_hash: "unusable".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn like_twice_conflicts_and_keeps_set(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    let project = store.create_project(input("demo", &["Rust"]), &alice).await.unwrap();

    assert_eq!(store.like_project(project.id, &bob).await.unwrap(), vec![bob.id]);
    let err = store.like_project(project.id, &bob).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.get_project(project.id).await.unwrap().likes, vec![bob.id]);

    assert!(store.unlike_project(project.id, &bob).await.unwrap().is_empty());
    let err = store.unlike_project(project.id, &bob).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(store.get_project(project.id).await.unwrap().likes.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn bookmark_membership_is_exclusive(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    let alice = user(&store, "alice").await;
    let project = store.create_project(input("demo", &["Rust"]), &alice).await.unwrap();

    let err = store.remove_bookmark(project.id, &alice).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(store.add_bookmark(project.id, &alice).await.unwrap(), vec![alice.id]);
    let err = store.add_bookmark(project.id, &alice).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let saved = store.list_bookmarked_projects(alice.id).await.unwrap();
    assert_eq!(names(&saved), vec!["demo"]);

    let err = store.add_bookmark(uuid::Uuid::new_v4(), &alice).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn name_filter_matches_wildcards_literally(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    let alice = user(&store, "alice").await;
    for name in ["a_b demo", "axb demo", "Full 100% rust"] {
        store.create_project(input(name, &["Rust"]), &alice).await.unwrap();
    }

    let found = store
        .list_projects(&ProjectQuery {
            name: Some("a_b".into()),
            ..query()
        })
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["a_b demo"]);

    let found = store
        .list_projects(&ProjectQuery {
            name: Some("100%".into()),
            ..query()
        })
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Full 100% rust"]);

    let found = store
        .list_projects(&ProjectQuery {
            name: Some("1000%".into()),
            ..query()
        })
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn technology_filter_requires_every_tag(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    let alice = user(&store, "alice").await;
    store.create_project(input("rust api", &["Rust"]), &alice).await.unwrap();
    store.create_project(input("web app", &["JavaScript", "React"]), &alice).await.unwrap();
    store.create_project(input("full stack", &["Rust", "React"]), &alice).await.unwrap();

    let found = store
        .list_projects(&ProjectQuery {
            technologies: vec!["Rust".into(), "React".into()],
            ..query()
        })
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["full stack"]);

    let page = store
        .list_projects(&ProjectQuery {
            limit: 1,
            offset: 1,
            ..query()
        })
        .await
        .unwrap();
    assert_eq!(names(&page), vec!["web app"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn only_owner_can_update_or_remove(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    let project = store.create_project(input("demo", &["Rust"]), &alice).await.unwrap();

    let err = store
        .update_project(project.id, input("hijacked", &["Go"]), &bob)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = store.remove_project(project.id, &bob).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let unchanged = store.get_project(project.id).await.unwrap();
    assert_eq!(unchanged.name, "demo");
    assert_eq!(unchanged.technologies, vec!["Rust".to_string()]);

    let updated = store
        .update_project(project.id, input("renamed", &["Go"]), &alice)
        .await
        .unwrap();
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.owner_username, "alice");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn comments_follow_their_project(pool: PgPool) {
    let store = PgStore::from_pool(pool);
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    let project = store.create_project(input("demo", &["Rust"]), &alice).await.unwrap();

    let first = store.create_comment(project.id, "first".into(), &bob).await.unwrap();
    let second = store.create_comment(project.id, "second".into(), &alice).await.unwrap();
    let third = store.create_comment(project.id, "third".into(), &bob).await.unwrap();
    assert_eq!(first.username, "bob");

    let err = store.remove_comment(project.id, second.id, &bob).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let remaining = store.remove_comment(project.id, second.id, &alice).await.unwrap();
    let ids: Vec<_> = remaining.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first.id, third.id]);

    store.remove_project(project.id, &alice).await.unwrap();
    let err = store.get_comment(first.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = store.get_project(project.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
