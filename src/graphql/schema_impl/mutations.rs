use async_graphql::{Context, Json, Object};

use crate::{
    app_state::AppState,
    errors::AppResult,
    models::{
        domain::Question,
        dto::response::{DeleteQuestionResponse, SaveQuestionResponse},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates or fully replaces the question with the given id.
    async fn save_question(
        &self,
        ctx: &Context<'_>,
        question: Json<Question>,
    ) -> AppResult<SaveQuestionResponse> {
        let state = ctx.data::<AppState>()?;
        let stored = state.question_service.save_question(&question).await?;
        Ok(SaveQuestionResponse::saved(stored))
    }

    async fn delete_question(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> AppResult<DeleteQuestionResponse> {
        let state = ctx.data::<AppState>()?;
        state.question_service.delete_question(&id).await?;
        Ok(DeleteQuestionResponse::deleted(&id))
    }
}
