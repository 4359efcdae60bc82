pub mod default_questions;
pub mod languages;
