use crate::domain::repository::SessionBag;
use crate::domain::types::SESSION_THEME;
use crate::error::BlindBoxError;

pub const THEME_LIGHT: &str = "light";
pub const THEME_DARK: &str = "dark";

/// Flip the session theme between light (the default) and dark. Returns the new value.
pub async fn toggle_theme(session: &impl SessionBag) -> Result<&'static str, BlindBoxError> {
    let next = match session.get(SESSION_THEME).await?.as_deref() {
        Some(THEME_DARK) => THEME_LIGHT,
        _ => THEME_DARK,
    };
    session.insert(SESSION_THEME, next).await?;
    Ok(next)
}
