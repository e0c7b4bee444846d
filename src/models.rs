pub mod auth;
pub mod evaluation;
pub mod job;
pub mod order;
pub mod user;
