use rand::RngExt;
use tracing::{debug, info, warn};

use blindbox_domain::user::validate_email;

use crate::domain::repository::{ExpiryStore, MailSender, SessionBag, UserRepository};
use crate::domain::types::{
    LOGIN_CODE_COOLDOWN_SECS, LOGIN_CODE_INPUT_MAX_LEN, LOGIN_CODE_LEN, LOGIN_CODE_TTL_SECS,
    SESSION_EMAIL_FOR_LOGIN, User, login_code_cooldown_key, login_code_key,
};
use crate::error::BlindBoxError;
use crate::usecase::token::{IssuedTokens, issue_tokens};

pub const LOGIN_CODE_SUBJECT: &str = "Your login code";

/// Six decimal digits, each drawn independently, leading zeros allowed.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..LOGIN_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn login_code_body(code: &str) -> String {
    format!(
        "Your login code is: {code}\n\nThe code is valid for 5 minutes. \
         If you did not request it, you can ignore this email."
    )
}

// ── RequestLoginCode ─────────────────────────────────────────────────────────

pub struct RequestLoginCodeUseCase<U, C, S, M>
where
    U: UserRepository,
    C: ExpiryStore,
    S: SessionBag,
    M: MailSender,
{
    pub users: U,
    pub cache: C,
    pub session: S,
    pub mailer: M,
}

impl<U, C, S, M> RequestLoginCodeUseCase<U, C, S, M>
where
    U: UserRepository,
    C: ExpiryStore,
    S: SessionBag,
    M: MailSender,
{
    pub async fn execute(&self, email: &str) -> Result<(), BlindBoxError> {
        let email = email.trim().to_lowercase();
        if !validate_email(&email) {
            return Err(BlindBoxError::field("email", "Enter a valid email address."));
        }

        if self.users.find_by_email(&email).await?.is_none() {
            debug!(email = %email, "login code requested for unknown email");
            return Err(BlindBoxError::UnknownEmail);
        }

        let cooldown_key = login_code_cooldown_key(&email);
        let code_key = login_code_key(&email);

        // SET NX makes the cooldown check and claim one step.
        if !self
            .cache
            .set_nx_ex(&cooldown_key, "1", LOGIN_CODE_COOLDOWN_SECS)
            .await?
        {
            return Err(BlindBoxError::CoolingDown);
        }

        let code = generate_code();
        let delivered: Result<(), BlindBoxError> = async {
            self.cache
                .set_ex(&code_key, &code, LOGIN_CODE_TTL_SECS)
                .await?;
            self.mailer
                .send(
                    LOGIN_CODE_SUBJECT,
                    &login_code_body(&code),
                    std::slice::from_ref(&email),
                )
                .await
                .map_err(|e| match e {
                    BlindBoxError::MailFailed(_) => e,
                    other => BlindBoxError::MailFailed(other.to_string()),
                })?;
            self.session.insert(SESSION_EMAIL_FOR_LOGIN, &email).await
        }
        .await;

        if let Err(e) = delivered {
            warn!(email = %email, error = %e, "login code not delivered, rolling back");
            self.discard_pending(&code_key, &cooldown_key).await;
            return Err(e);
        }

        info!(email = %email, "login code sent");
        Ok(())
    }

    /// Undo a half-finished request so the caller may ask again at once. Every step runs
    /// even if an earlier one fails.
    async fn discard_pending(&self, code_key: &str, cooldown_key: &str) {
        let steps = [
            self.cache.delete(code_key).await.map(drop),
            self.cache.delete(cooldown_key).await.map(drop),
            self.session.remove(SESSION_EMAIL_FOR_LOGIN).await,
        ];
        for err in steps.into_iter().filter_map(Result::err) {
            warn!(error = %err, "login code rollback step failed");
        }
    }
}

// ── VerifyLoginCode ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub tokens: IssuedTokens,
}

pub struct VerifyLoginCodeUseCase<U, C, S>
where
    U: UserRepository,
    C: ExpiryStore,
    S: SessionBag,
{
    pub users: U,
    pub cache: C,
    pub session: S,
    pub jwt_secret: String,
}

impl<U, C, S> VerifyLoginCodeUseCase<U, C, S>
where
    U: UserRepository,
    C: ExpiryStore,
    S: SessionBag,
{
    pub async fn execute(&self, code: &str) -> Result<LoginOutput, BlindBoxError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(BlindBoxError::field("code", "This field is required."));
        }
        if code.chars().count() > LOGIN_CODE_INPUT_MAX_LEN {
            return Err(BlindBoxError::field(
                "code",
                "Ensure this value has at most 10 characters.",
            ));
        }

        let email = self
            .session
            .get(SESSION_EMAIL_FOR_LOGIN)
            .await?
            .ok_or(BlindBoxError::NoPendingEmail)?;

        let code_key = login_code_key(&email);
        let stored = self
            .cache
            .get(&code_key)
            .await?
            .ok_or(BlindBoxError::LoginCodeExpired)?;

        if stored != code {
            debug!(email = %email, "login code mismatch");
            return Err(BlindBoxError::LoginCodeMismatch);
        }

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(BlindBoxError::UserVanished)?;

        // Only the request whose DEL removed the key may log in.
        if !self.cache.delete(&code_key).await? {
            return Err(BlindBoxError::LoginCodeExpired);
        }
        self.session.remove(SESSION_EMAIL_FOR_LOGIN).await?;

        let tokens = issue_tokens(&user, &self.jwt_secret)?;
        info!(user_id = %user.id, "logged in with email code");
        Ok(LoginOutput { user, tokens })
    }
}

// ── PendingLoginEmail ────────────────────────────────────────────────────────

/// Email a code is currently pending for in this session, if any.
pub async fn pending_login_email(session: &impl SessionBag) -> Result<Option<String>, BlindBoxError> {
    session.get(SESSION_EMAIL_FOR_LOGIN).await
}
