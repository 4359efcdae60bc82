pub mod editor;
pub mod normalize;
pub mod ordering;
pub mod player;
pub mod question_service;
pub mod sanitize;

pub use question_service::QuestionService;
