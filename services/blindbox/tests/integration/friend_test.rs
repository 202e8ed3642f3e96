use uuid::Uuid;

use blindbox::domain::repository::FriendRepository;
use blindbox::error::BlindBoxError;
use blindbox::usecase::friend::{
    ListPendingRequestsUseCase, RespondOutcome, RespondToFriendRequestUseCase,
    SendFriendRequestUseCase, SendRequestOutcome, friend_ids,
};
use blindbox_domain::friend::{FriendAction, FriendStatus};

use crate::helpers::{MockDb, test_user};

fn alice() -> Uuid {
    Uuid::from_u128(1)
}

fn bob() -> Uuid {
    Uuid::from_u128(2)
}

fn db() -> MockDb {
    MockDb::with_users(vec![
        test_user(1, "alice"),
        test_user(2, "bob"),
        test_user(3, "carol"),
    ])
}

async fn send(db: &MockDb, from: Uuid, to: Uuid) -> Result<SendRequestOutcome, BlindBoxError> {
    SendFriendRequestUseCase {
        users: db.user_repo(),
        friends: db.friend_repo(),
    }
    .execute(from, to)
    .await
}

async fn respond(
    db: &MockDb,
    request_id: Uuid,
    responder: Uuid,
    action: FriendAction,
) -> Result<RespondOutcome, BlindBoxError> {
    RespondToFriendRequestUseCase {
        friends: db.friend_repo(),
    }
    .execute(request_id, responder, action)
    .await
}

fn only_edge_id(db: &MockDb) -> Uuid {
    let edges = db.friends.lock().unwrap();
    assert_eq!(edges.len(), 1);
    edges[0].id
}

// ── SendFriendRequest ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pending_request() {
    let db = db();

    let outcome = send(&db, alice(), bob()).await.unwrap();

    assert_eq!(outcome, SendRequestOutcome::Created);
    let edges = db.friends.lock().unwrap();
    assert_eq!(edges[0].from_user_id, alice());
    assert_eq!(edges[0].to_user_id, bob());
    assert_eq!(edges[0].status, FriendStatus::Pending);
}

#[tokio::test]
async fn should_report_existing_request_for_same_pair() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();

    let outcome = send(&db, alice(), bob()).await.unwrap();

    assert_eq!(outcome, SendRequestOutcome::AlreadyExists);
    assert_eq!(db.friends.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_report_existing_edge_even_when_accepted() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();
    respond(&db, only_edge_id(&db), bob(), FriendAction::Accept)
        .await
        .unwrap();

    let outcome = send(&db, alice(), bob()).await.unwrap();

    assert_eq!(outcome, SendRequestOutcome::AlreadyExists);
}

#[tokio::test]
async fn should_refuse_request_to_self() {
    let db = db();

    let result = send(&db, alice(), alice()).await;

    assert!(
        matches!(result, Err(BlindBoxError::CannotBefriendSelf)),
        "expected CannotBefriendSelf, got {result:?}"
    );
    assert!(db.friends.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_request_to_unknown_user() {
    let db = db();

    let result = send(&db, alice(), Uuid::from_u128(99)).await;

    assert!(
        matches!(result, Err(BlindBoxError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

// ── RespondToFriendRequest ───────────────────────────────────────────────────

#[tokio::test]
async fn should_make_friendship_symmetric_on_accept() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();

    let outcome = respond(&db, only_edge_id(&db), bob(), FriendAction::Accept)
        .await
        .unwrap();

    assert_eq!(outcome, RespondOutcome::Accepted);
    let friends = db.friend_repo();
    assert!(friends.are_friends(alice(), bob()).await.unwrap());
    assert!(friends.are_friends(bob(), alice()).await.unwrap());
    assert_eq!(friend_ids(&friends, alice()).await.unwrap(), vec![bob()]);
    assert_eq!(friend_ids(&friends, bob()).await.unwrap(), vec![alice()]);
}

#[tokio::test]
async fn should_not_count_pending_edge_as_friendship() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();

    let friends = db.friend_repo();
    assert!(!friends.are_friends(alice(), bob()).await.unwrap());
    assert!(friend_ids(&friends, alice()).await.unwrap().is_empty());
}

#[tokio::test]
async fn should_delete_edge_on_reject_and_allow_new_request() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();

    let outcome = respond(&db, only_edge_id(&db), bob(), FriendAction::Reject)
        .await
        .unwrap();

    assert_eq!(outcome, RespondOutcome::Rejected);
    assert!(db.friends.lock().unwrap().is_empty());
    assert_eq!(
        send(&db, alice(), bob()).await.unwrap(),
        SendRequestOutcome::Created
    );
}

#[tokio::test]
async fn should_hide_request_from_anyone_but_its_recipient() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();
    let id = only_edge_id(&db);

    for responder in [alice(), Uuid::from_u128(3)] {
        let result = respond(&db, id, responder, FriendAction::Accept).await;
        assert!(
            matches!(result, Err(BlindBoxError::FriendRequestNotFound)),
            "expected FriendRequestNotFound, got {result:?}"
        );
    }
    assert_eq!(db.friends.lock().unwrap()[0].status, FriendStatus::Pending);
}

#[tokio::test]
async fn should_report_missing_request_as_not_found() {
    let db = db();

    let result = respond(&db, Uuid::from_u128(42), bob(), FriendAction::Reject).await;

    assert!(
        matches!(result, Err(BlindBoxError::FriendRequestNotFound)),
        "expected FriendRequestNotFound, got {result:?}"
    );
}

// ── ListPendingRequests ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_incoming_pending_requests() {
    let db = db();
    send(&db, alice(), bob()).await.unwrap();
    send(&db, Uuid::from_u128(3), bob()).await.unwrap();
    send(&db, bob(), alice()).await.unwrap();

    let pending = ListPendingRequestsUseCase {
        friends: db.friend_repo(),
    }
    .execute(bob())
    .await
    .unwrap();

    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|e| e.to_user_id == bob()));
}
