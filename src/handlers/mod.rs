pub mod question_handler;

pub use question_handler::{
    configure, delete_question, health_check, health_check_ready, list_questions, save_question,
};
