use chrono::Utc;
use uuid::Uuid;

use blindbox::domain::repository::SessionBag;
use blindbox::domain::types::{FriendEdge, SESSION_THEME};
use blindbox::error::BlindBoxError;
use blindbox::usecase::blind_date::BlindDateUseCase;
use blindbox::usecase::profile::{
    EditProfileInput, EditProfileUseCase, GetOwnProfileUseCase, GetProfilePageUseCase,
};
use blindbox::usecase::theme::{THEME_DARK, THEME_LIGHT, toggle_theme};
use blindbox_domain::friend::FriendStatus;
use blindbox_domain::profile::{Gender, NOT_PROVIDED};

use crate::helpers::{MockDb, MockSession, accepted_edge, test_blog, test_user};

fn alice() -> Uuid {
    Uuid::from_u128(1)
}

fn bob() -> Uuid {
    Uuid::from_u128(2)
}

fn db() -> MockDb {
    MockDb::with_users(vec![test_user(1, "alice"), test_user(2, "bob")])
}

fn page_usecase(
    db: &MockDb,
) -> GetProfilePageUseCase<
    crate::helpers::MockUserRepo,
    crate::helpers::MockProfileRepo,
    crate::helpers::MockBlogRepo,
    crate::helpers::MockCommentRepo,
    crate::helpers::MockFriendRepo,
> {
    GetProfilePageUseCase {
        users: db.user_repo(),
        profiles: db.profile_repo(),
        blogs: db.blog_repo(),
        comments: db.comment_repo(),
        friends: db.friend_repo(),
    }
}

// ── EditProfile ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_profile_row_on_first_edit_and_overwrite_later() {
    let db = db();
    let uc = EditProfileUseCase {
        profiles: db.profile_repo(),
    };

    uc.execute(
        alice(),
        EditProfileInput {
            nickname: Some("Ali".to_owned()),
            age: Some(30),
            gender: Some("female".to_owned()),
            hobbies: Some("climbing".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    uc.execute(
        alice(),
        EditProfileInput {
            nickname: Some("Alice B.".to_owned()),
            age: Some(31),
            gender: Some("other".to_owned()),
            height_cm: Some(170),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let profile = GetOwnProfileUseCase {
        profiles: db.profile_repo(),
    }
    .execute(alice())
    .await
    .unwrap()
    .unwrap();
    assert_eq!(profile.nickname.as_deref(), Some("Alice B."));
    assert_eq!(profile.gender, Some(Gender::Other));
    assert_eq!(profile.height_cm, Some(170));
    assert!(profile.hobbies.is_none());
    assert_eq!(db.profiles.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_require_nickname_age_and_gender_on_edit() {
    let db = db();

    let result = EditProfileUseCase {
        profiles: db.profile_repo(),
    }
    .execute(alice(), EditProfileInput::default())
    .await;

    assert!(
        matches!(result, Err(BlindBoxError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(db.profiles.lock().unwrap().is_empty());
}

// ── GetProfilePage ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_fill_missing_profile_fields_with_defaults() {
    let db = db();

    let page = page_usecase(&db).execute(bob(), None).await.unwrap();

    assert_eq!(page.card.nickname, "bob");
    assert_eq!(page.card.age, NOT_PROVIDED);
    assert_eq!(page.card.gender, NOT_PROVIDED);
    assert_eq!(page.card.height, NOT_PROVIDED);
    assert_eq!(page.card.weight, NOT_PROVIDED);
    assert_eq!(page.card.hobbies, NOT_PROVIDED);
    assert!(page.card.avatar_url.is_none());
    assert!(!page.is_own_profile);
    assert!(!page.is_friend);
}

#[tokio::test]
async fn should_show_recent_blogs_and_counts() {
    let db = db();
    let now = Utc::now();
    *db.blogs.lock().unwrap() = (0..7)
        .map(|n| test_blog(n, bob(), &format!("post {n}"), now - chrono::Duration::minutes(n as i64)))
        .collect();

    let page = page_usecase(&db).execute(bob(), Some(bob())).await.unwrap();

    assert_eq!(page.recent_blogs.len(), 5);
    assert_eq!(page.recent_blogs[0].blog.title, "post 0");
    assert_eq!(page.blog_count, 7);
    assert_eq!(page.comment_count, 0);
    assert!(page.is_own_profile);
}

#[tokio::test]
async fn should_flag_pending_request_from_viewer() {
    let db = db();
    db.friends.lock().unwrap().push(FriendEdge {
        id: Uuid::now_v7(),
        from_user_id: alice(),
        to_user_id: bob(),
        status: FriendStatus::Pending,
        created_at: Utc::now(),
    });

    let page = page_usecase(&db).execute(bob(), Some(alice())).await.unwrap();

    assert!(page.friend_request_sent);
    assert!(!page.is_friend);
}

#[tokio::test]
async fn should_flag_friendship_in_either_direction() {
    let db = db();
    db.friends.lock().unwrap().push(accepted_edge(bob(), alice()));

    let page = page_usecase(&db).execute(bob(), Some(alice())).await.unwrap();

    assert!(page.is_friend);
    assert!(!page.friend_request_sent);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_profile() {
    let db = db();

    let result = page_usecase(&db).execute(Uuid::from_u128(99), None).await;

    assert!(
        matches!(result, Err(BlindBoxError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

// ── BlindDate ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_draw_another_user_as_card() {
    let db = db();
    EditProfileUseCase {
        profiles: db.profile_repo(),
    }
    .execute(
        bob(),
        EditProfileInput {
            nickname: Some("B".to_owned()),
            age: Some(25),
            gender: Some("male".to_owned()),
            weight_kg: Some(70.5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let card = BlindDateUseCase {
        users: db.user_repo(),
        profiles: db.profile_repo(),
    }
    .execute(alice())
    .await
    .unwrap()
    .expect("bob should be drawn");

    assert_eq!(card.user_id, bob());
    assert_eq!(card.nickname, "B");
    assert_eq!(card.age, "25");
    assert_eq!(card.weight, "70.5kg");
    assert_eq!(card.height, NOT_PROVIDED);
}

#[tokio::test]
async fn should_draw_nobody_when_viewer_is_alone() {
    let db = MockDb::with_users(vec![test_user(1, "alice")]);

    let card = BlindDateUseCase {
        users: db.user_repo(),
        profiles: db.profile_repo(),
    }
    .execute(alice())
    .await
    .unwrap();

    assert!(card.is_none());
}

// ── ToggleTheme ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_flip_theme_between_light_and_dark() {
    let session = MockSession::default();

    assert_eq!(toggle_theme(&session).await.unwrap(), THEME_DARK);
    assert_eq!(
        session.get(SESSION_THEME).await.unwrap().as_deref(),
        Some(THEME_DARK)
    );
    assert_eq!(toggle_theme(&session).await.unwrap(), THEME_LIGHT);
    assert_eq!(toggle_theme(&session).await.unwrap(), THEME_DARK);
}
