/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased env vars
/// (`database_url` ← `DATABASE_URL`). Use `#[serde(default = "...")]` for optional
/// settings with defaults.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        Self::from_vars(std::env::vars()).expect("failed to load config from environment")
    }

    /// Load from an explicit set of `(NAME, value)` pairs.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
