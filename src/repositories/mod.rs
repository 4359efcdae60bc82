pub mod firestore_question_repository;
pub mod question_repository;

pub use firestore_question_repository::FirestoreQuestionRepository;
pub use question_repository::{MongoQuestionRepository, QuestionRepository};

#[cfg(test)]
pub use question_repository::MockQuestionRepository;
