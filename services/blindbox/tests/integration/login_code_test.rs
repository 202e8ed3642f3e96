use blindbox::domain::repository::{ExpiryStore, SessionBag};
use blindbox::domain::types::{SESSION_EMAIL_FOR_LOGIN, login_code_cooldown_key, login_code_key};
use blindbox::error::BlindBoxError;
use blindbox::usecase::login_code::{
    LOGIN_CODE_SUBJECT, RequestLoginCodeUseCase, VerifyLoginCodeUseCase, pending_login_email,
};
use blindbox_auth_types::token::validate_access_token;

use crate::helpers::{
    MemoryExpiryStore, MockDb, MockSession, RecordingMailer, TEST_JWT_SECRET, test_user,
};

const EMAIL: &str = "x@example.com";

struct Harness {
    db: MockDb,
    cache: MemoryExpiryStore,
    session: MockSession,
    mailer: RecordingMailer,
}

impl Harness {
    fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    fn with_mailer(mailer: RecordingMailer) -> Self {
        Self {
            mailer,
            ..Self::with_session(MockSession::default())
        }
    }

    fn with_session(session: MockSession) -> Self {
        Self {
            db: MockDb::with_users(vec![test_user(1, "x")]),
            cache: MemoryExpiryStore::default(),
            session,
            mailer: RecordingMailer::default(),
        }
    }

    async fn request(&self, email: &str) -> Result<(), BlindBoxError> {
        RequestLoginCodeUseCase {
            users: self.db.user_repo(),
            cache: self.cache.clone(),
            session: self.session.clone(),
            mailer: self.mailer.clone(),
        }
        .execute(email)
        .await
    }

    async fn verify(
        &self,
        code: &str,
    ) -> Result<blindbox::usecase::login_code::LoginOutput, BlindBoxError> {
        VerifyLoginCodeUseCase {
            users: self.db.user_repo(),
            cache: self.cache.clone(),
            session: self.session.clone(),
            jwt_secret: TEST_JWT_SECRET.to_owned(),
        }
        .execute(code)
        .await
    }

    fn stored_code(&self) -> Option<String> {
        self.cache.peek(&login_code_key(EMAIL))
    }
}

// ── RequestLoginCode ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_set_cooldown_and_mail_it() {
    let h = Harness::new();

    h.request(EMAIL).await.unwrap();

    let code = h.stored_code().expect("code should be stored");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert!(h.cache.peek(&login_code_cooldown_key(EMAIL)).is_some());
    assert_eq!(
        h.session.get(SESSION_EMAIL_FOR_LOGIN).await.unwrap().as_deref(),
        Some(EMAIL)
    );

    let sent = h.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, LOGIN_CODE_SUBJECT);
    assert_eq!(sent[0].to, vec![EMAIL.to_owned()]);
    assert!(sent[0].body.contains(&code));
    assert!(sent[0].body.contains("5 minutes"));
}

#[tokio::test]
async fn should_lowercase_email_before_lookup() {
    let h = Harness::new();

    h.request("  X@Example.COM ").await.unwrap();

    assert!(h.stored_code().is_some());
    assert_eq!(
        pending_login_email(&h.session).await.unwrap().as_deref(),
        Some(EMAIL)
    );
}

#[tokio::test]
async fn should_reject_unknown_email_without_side_effects() {
    let h = Harness::new();

    let result = h.request("nobody@example.com").await;

    assert!(
        matches!(result, Err(BlindBoxError::UnknownEmail)),
        "expected UnknownEmail, got {result:?}"
    );
    assert!(h.cache.entries.lock().unwrap().is_empty());
    assert!(h.session.values.lock().unwrap().is_empty());
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_malformed_email_as_field_error() {
    let h = Harness::new();

    let result = h.request("not-an-email").await;

    let Err(BlindBoxError::Validation(fields)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    assert_eq!(fields[0].field, "email");
}

#[tokio::test]
async fn should_refuse_second_request_within_cooldown() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let first_code = h.stored_code();

    h.cache.advance(59);
    let result = h.request(EMAIL).await;

    assert!(
        matches!(result, Err(BlindBoxError::CoolingDown)),
        "expected CoolingDown, got {result:?}"
    );
    assert_eq!(h.stored_code(), first_code, "code must not be replaced");
    assert_eq!(h.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_allow_new_request_after_cooldown_lapses() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();

    h.cache.advance(60);
    h.request(EMAIL).await.unwrap();

    assert_eq!(h.mailer.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_clear_code_cooldown_and_session_when_mail_fails() {
    let h = Harness::with_mailer(RecordingMailer::failing());

    let result = h.request(EMAIL).await;

    assert!(
        matches!(result, Err(BlindBoxError::MailFailed(_))),
        "expected MailFailed, got {result:?}"
    );
    assert!(h.cache.peek("login_code_x@example.com").is_none());
    assert!(h.cache.peek("login_code_cooldown_x@example.com").is_none());
    assert!(h.session.get(SESSION_EMAIL_FOR_LOGIN).await.unwrap().is_none());
}

#[tokio::test]
async fn should_release_cooldown_when_session_write_fails() {
    let h = Harness::with_session(MockSession::broken());

    let result = h.request(EMAIL).await;
    assert!(
        matches!(result, Err(BlindBoxError::Internal(_))),
        "expected Internal, got {result:?}"
    );
    assert!(h.stored_code().is_none());
    assert!(h.cache.peek(&login_code_cooldown_key(EMAIL)).is_none());

    // Nothing left behind, so a retry is not held back by the cooldown.
    let retry = h.request(EMAIL).await;
    assert!(
        !matches!(retry, Err(BlindBoxError::CoolingDown)),
        "expected no cooldown, got {retry:?}"
    );
}

// ── VerifyLoginCode ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_log_in_with_correct_code_exactly_once() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let code = h.stored_code().unwrap();

    let out = h.verify(&code).await.unwrap();
    assert_eq!(out.user.email, EMAIL);
    let info = validate_access_token(&out.tokens.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
    assert!(h.session.get(SESSION_EMAIL_FOR_LOGIN).await.unwrap().is_none());

    // The session value is gone, so put it back to reach the code check.
    h.session.insert(SESSION_EMAIL_FOR_LOGIN, EMAIL).await.unwrap();
    let second = h.verify(&code).await;
    assert!(
        matches!(second, Err(BlindBoxError::LoginCodeExpired)),
        "expected LoginCodeExpired, got {second:?}"
    );
}

#[tokio::test]
async fn should_keep_code_after_mismatch_and_accept_it_afterwards() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let code = h.stored_code().unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let result = h.verify(wrong).await;
    assert!(
        matches!(result, Err(BlindBoxError::LoginCodeMismatch)),
        "expected LoginCodeMismatch, got {result:?}"
    );
    assert_eq!(h.stored_code().as_deref(), Some(code.as_str()));

    h.verify(&format!(" {code} ")).await.unwrap();
}

#[tokio::test]
async fn should_expire_code_after_five_minutes() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let code = h.stored_code().unwrap();

    h.cache.advance(300);
    let result = h.verify(&code).await;

    assert!(
        matches!(result, Err(BlindBoxError::LoginCodeExpired)),
        "expected LoginCodeExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_code_just_before_expiry() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let code = h.stored_code().unwrap();

    h.cache.advance(299);
    h.verify(&code).await.unwrap();
}

#[tokio::test]
async fn should_require_pending_email_in_session() {
    let h = Harness::new();

    let result = h.verify("123456").await;

    assert!(
        matches!(result, Err(BlindBoxError::NoPendingEmail)),
        "expected NoPendingEmail, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_code_length_before_anything_else() {
    let h = Harness::new();

    for code in ["", "   ", "12345678901"] {
        let result = h.verify(code).await;
        assert!(
            matches!(result, Err(BlindBoxError::Validation(_))),
            "expected Validation for {code:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_report_vanished_user() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let code = h.stored_code().unwrap();
    h.db.users.lock().unwrap().clear();

    let result = h.verify(&code).await;

    assert!(
        matches!(result, Err(BlindBoxError::UserVanished)),
        "expected UserVanished, got {result:?}"
    );
}

#[tokio::test]
async fn should_fail_once_another_request_consumed_the_code() {
    let h = Harness::new();
    h.request(EMAIL).await.unwrap();
    let code = h.stored_code().unwrap();

    assert!(h.cache.delete(&login_code_key(EMAIL)).await.unwrap());
    let result = h.verify(&code).await;

    assert!(
        matches!(result, Err(BlindBoxError::LoginCodeExpired)),
        "expected LoginCodeExpired, got {result:?}"
    );
}
