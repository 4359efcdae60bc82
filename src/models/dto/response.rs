use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::Question;

#[derive(Debug, Serialize, SimpleObject)]
#[graphql(concrete(name = "SaveQuestionResponse", params(Question)))]
pub struct ApiResponse<T: async_graphql::OutputType> {
    pub data: T,
    pub message: String,
}

pub type SaveQuestionResponse = ApiResponse<Question>;

impl SaveQuestionResponse {
    pub fn saved(question: Question) -> Self {
        let message = format!("Question '{}' saved", question.id);
        ApiResponse {
            data: question,
            message,
        }
    }
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct DeleteQuestionResponse {
    pub id: String,
    pub message: String,
}

impl DeleteQuestionResponse {
    pub fn deleted(id: &str) -> Self {
        DeleteQuestionResponse {
            id: id.to_string(),
            message: format!("Question '{}' deleted", id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub count: usize,
    pub questions: Vec<Question>,
}

impl From<Vec<Question>> for QuestionListResponse {
    fn from(questions: Vec<Question>) -> Self {
        QuestionListResponse {
            count: questions.len(),
            questions,
        }
    }
}
