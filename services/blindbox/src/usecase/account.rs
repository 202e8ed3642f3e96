use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use blindbox_domain::user::{PASSWORD_MIN_LEN, UserRole, validate_email, validate_username};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::{BlindBoxError, FieldError};
use crate::usecase::login_code::LoginOutput;
use crate::usecase::token::issue_tokens;

pub fn hash_password(password: &str) -> Result<String, BlindBoxError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| anyhow!("encode password salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// `false` for a wrong password and for a hash that does not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<LoginOutput, BlindBoxError> {
        let username = input.username.trim().to_owned();
        let email = input.email.trim().to_lowercase();
        let mut errors = Vec::new();

        if !validate_username(&username) {
            errors.push(FieldError::new(
                "username",
                "Enter a valid username of up to 150 letters, digits and @/./+/-/_ characters.",
            ));
        } else if self.users.find_by_username(&username).await?.is_some() {
            errors.push(FieldError::new(
                "username",
                "A user with that username already exists.",
            ));
        }

        if !validate_email(&email) {
            errors.push(FieldError::new("email", "Enter a valid email address."));
        } else if self.users.find_by_email(&email).await?.is_some() {
            errors.push(FieldError::new(
                "email",
                "A user with that email already exists.",
            ));
        }

        if input.password1.chars().count() < PASSWORD_MIN_LEN {
            errors.push(FieldError::new(
                "password1",
                "This password is too short. It must contain at least 8 characters.",
            ));
        }
        if input.password1 != input.password2 {
            errors.push(FieldError::new(
                "password2",
                "The two password fields didn't match.",
            ));
        }

        if !errors.is_empty() {
            return Err(BlindBoxError::Validation(errors));
        }

        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash: hash_password(&input.password1)?,
            role: UserRole::Normal.as_u8(),
            is_active: true,
            date_joined: Utc::now(),
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, "user registered");

        let tokens = issue_tokens(&user, &self.jwt_secret)?;
        Ok(LoginOutput { user, tokens })
    }
}

// ── PasswordLogin ────────────────────────────────────────────────────────────

pub struct PasswordLoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> PasswordLoginUseCase<U> {
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutput, BlindBoxError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .filter(|u| u.is_active && verify_password(password, &u.password_hash))
            .ok_or(BlindBoxError::InvalidCredentials)?;

        let tokens = issue_tokens(&user, &self.jwt_secret)?;
        info!(user_id = %user.id, "logged in with password");
        Ok(LoginOutput { user, tokens })
    }
}

// ── UsersTable ───────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, viewer_role: u8) -> Result<Vec<User>, BlindBoxError> {
        let is_staff = UserRole::from_u8(viewer_role).is_some_and(UserRole::is_staff);
        if !is_staff {
            return Err(BlindBoxError::Forbidden);
        }
        self.users.list_all().await
    }
}
