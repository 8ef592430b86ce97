//! Repository structs providing data access for each table.
//!
//! Each repository is a zero-sized struct with async methods that accept a
//! `&PgPool` and return `Result<T, sqlx::Error>`.

mod category_repo;
mod knack_idea_repo;
mod knack_repo;
mod listing_filter;
mod social_code_repo;
mod user_repo;

pub use category_repo::CategoryRepo;
pub use knack_idea_repo::{KnackIdeaImageRepo, KnackIdeaRepo};
pub use knack_repo::KnackRepo;
pub use social_code_repo::SocialCodeRepo;
pub use user_repo::UserRepo;
