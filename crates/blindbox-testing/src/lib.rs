//! Test-only helpers for the Blind Date Box service. Use from `tests/` and
//! `#[cfg(test)]` code only.

pub mod auth;
