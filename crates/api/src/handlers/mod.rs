pub mod category;
pub mod knack;
pub mod knack_idea;
pub mod social;
