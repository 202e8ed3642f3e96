pub mod account;
pub mod blind_date;
pub mod blog;
pub mod comment;
pub mod friend;
pub mod login_code;
pub mod message;
pub mod profile;
pub mod theme;
pub mod token;
