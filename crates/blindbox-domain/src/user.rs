//! User domain types.

use serde::{Deserialize, Serialize};

/// User permission level.
///
/// Wire format: `u8` (0 = Normal, 1 = Staff). Staff may view the user table and
/// moderate blogs and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Normal = 0,
    Staff = 1,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Normal),
            1 => Some(Self::Staff),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_staff(self) -> bool {
        self == Self::Staff
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}

/// Characters a username may contain besides ASCII alphanumerics.
const USERNAME_EXTRA_CHARS: &[char] = &['@', '.', '+', '-', '_'];

/// Maximum username length in characters.
pub const USERNAME_MAX_LEN: usize = 150;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Returns `true` if `username` is 1–150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=USERNAME_MAX_LEN).contains(&len)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || USERNAME_EXTRA_CHARS.contains(&c))
}

/// Minimal structural email check: one `@`, non-empty local part, a dot in the domain,
/// no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
