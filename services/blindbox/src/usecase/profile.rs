use tracing::info;
use uuid::Uuid;

use blindbox_domain::friend::FriendStatus;
use blindbox_domain::profile::Gender;

use crate::domain::repository::{
    BlogRepository, CommentRepository, FriendRepository, ProfileRepository, UserRepository,
};
use crate::domain::types::{
    BlogOrder, BlogQuery, BlogSummary, PROFILE_RECENT_BLOGS, Profile, ProfileCard, User,
};
use crate::error::{BlindBoxError, FieldError};

const NICKNAME_MAX_LEN: usize = 100;
const WEIGHT_MAX_KG: f64 = 9999.9;

/// Submitted profile form. `gender` is the stored value (`male`, `female`, `other`).
#[derive(Debug, Default)]
pub struct EditProfileInput {
    pub nickname: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub hobbies: Option<String>,
    pub avatar_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

impl EditProfileInput {
    fn into_profile(self, user_id: Uuid) -> Result<Profile, BlindBoxError> {
        let mut errors = Vec::new();

        let nickname = non_blank(self.nickname);
        match &nickname {
            None => errors.push(FieldError::new("nickname", "This field is required.")),
            Some(n) if n.chars().count() > NICKNAME_MAX_LEN => errors.push(FieldError::new(
                "nickname",
                "Ensure this value has at most 100 characters.",
            )),
            Some(_) => {}
        }

        match self.age {
            None => errors.push(FieldError::new("age", "This field is required.")),
            Some(age) if age < 0 => errors.push(FieldError::new(
                "age",
                "Ensure this value is greater than or equal to 0.",
            )),
            Some(_) => {}
        }

        let gender = match non_blank(self.gender) {
            None => {
                errors.push(FieldError::new("gender", "This field is required."));
                None
            }
            Some(g) => match g.parse::<Gender>() {
                Ok(g) => Some(g),
                Err(e) => {
                    errors.push(FieldError::new(
                        "gender",
                        format!("Select a valid choice. {} is not one of the available choices.", e.0),
                    ));
                    None
                }
            },
        };

        if self.height_cm.is_some_and(|h| h < 0) {
            errors.push(FieldError::new(
                "height_cm",
                "Ensure this value is greater than or equal to 0.",
            ));
        }
        let weight_kg = self.weight_kg.map(|w| (w * 10.0).round() / 10.0);
        if weight_kg.is_some_and(|w| !(0.0..=WEIGHT_MAX_KG).contains(&w)) {
            errors.push(FieldError::new(
                "weight_kg",
                "Ensure this value is between 0 and 9999.9.",
            ));
        }

        if !errors.is_empty() {
            return Err(BlindBoxError::Validation(errors));
        }

        Ok(Profile {
            user_id,
            nickname,
            avatar_url: non_blank(self.avatar_url),
            age: self.age,
            gender,
            height_cm: self.height_cm,
            weight_kg,
            hobbies: non_blank(self.hobbies),
        })
    }
}

// ── GetOwnProfile / EditProfile ──────────────────────────────────────────────

pub struct GetOwnProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> GetOwnProfileUseCase<P> {
    /// The raw profile row, without default substitution.
    pub async fn execute(&self, user_id: Uuid) -> Result<Option<Profile>, BlindBoxError> {
        self.profiles.find(user_id).await
    }
}

pub struct EditProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> EditProfileUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: EditProfileInput,
    ) -> Result<Profile, BlindBoxError> {
        let profile = input.into_profile(user_id)?;
        self.profiles.upsert(&profile).await?;
        info!(user_id = %user_id, "profile updated");
        Ok(profile)
    }
}

// ── GetProfilePage ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ProfilePage {
    pub user: User,
    pub card: ProfileCard,
    pub recent_blogs: Vec<BlogSummary>,
    pub blog_count: u64,
    pub comment_count: u64,
    pub is_friend: bool,
    pub friend_request_sent: bool,
    pub is_own_profile: bool,
}

pub struct GetProfilePageUseCase<U, P, B, C, F>
where
    U: UserRepository,
    P: ProfileRepository,
    B: BlogRepository,
    C: CommentRepository,
    F: FriendRepository,
{
    pub users: U,
    pub profiles: P,
    pub blogs: B,
    pub comments: C,
    pub friends: F,
}

impl<U, P, B, C, F> GetProfilePageUseCase<U, P, B, C, F>
where
    U: UserRepository,
    P: ProfileRepository,
    B: BlogRepository,
    C: CommentRepository,
    F: FriendRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<ProfilePage, BlindBoxError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BlindBoxError::UserNotFound)?;
        let profile = self.profiles.find(user.id).await?;
        let card = ProfileCard::render(&user, profile.as_ref());

        let query = BlogQuery {
            authors: Some(vec![user.id]),
            limit: Some(PROFILE_RECENT_BLOGS),
            ..Default::default()
        };
        let recent_blogs = self.blogs.search(&query, BlogOrder::Newest).await?;
        let blog_count = self.blogs.count_by_author(user.id).await?;
        let comment_count = self.comments.count_by_author(user.id).await?;

        let is_own_profile = viewer == Some(user.id);
        let (is_friend, friend_request_sent) = match viewer {
            Some(viewer) if !is_own_profile => {
                let is_friend = self.friends.are_friends(viewer, user.id).await?;
                let sent = self
                    .friends
                    .find_edge(viewer, user.id)
                    .await?
                    .is_some_and(|e| e.status == FriendStatus::Pending);
                (is_friend, sent)
            }
            _ => (false, false),
        };

        Ok(ProfilePage {
            user,
            card,
            recent_blogs,
            blog_count,
            comment_count,
            is_friend,
            friend_request_sent,
            is_own_profile,
        })
    }
}
