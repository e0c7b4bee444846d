pub mod envelope;
pub mod error;
pub mod multipart;
pub mod storage;
pub mod time;
