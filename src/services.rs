pub mod auth;
pub mod evaluation;
pub mod jobs;
pub mod orders;
pub mod rating;
pub mod users;
