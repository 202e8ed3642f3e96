use uuid::Uuid;

use crate::domain::repository::{ProfileRepository, UserRepository};
use crate::domain::types::ProfileCard;
use crate::error::BlindBoxError;

/// Draws a random other user and renders their card.
pub struct BlindDateUseCase<U: UserRepository, P: ProfileRepository> {
    pub users: U,
    pub profiles: P,
}

impl<U: UserRepository, P: ProfileRepository> BlindDateUseCase<U, P> {
    /// `None` when the viewer is the only user.
    pub async fn execute(&self, viewer: Uuid) -> Result<Option<ProfileCard>, BlindBoxError> {
        let Some(user) = self.users.random_other(viewer).await? else {
            return Ok(None);
        };
        let profile = self.profiles.find(user.id).await?;
        Ok(Some(ProfileCard::render(&user, profile.as_ref())))
    }
}
