//! Business logic services

pub mod user;

pub use user::{RegisterInput, UploadedFile, UserService};
