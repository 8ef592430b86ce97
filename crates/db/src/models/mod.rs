//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod category;
pub mod knack;
pub mod knack_idea;
pub mod social_code;
pub mod user;
