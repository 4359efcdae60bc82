use async_graphql::{Context, Object};

use crate::{app_state::AppState, errors::AppResult, models::domain::Question};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every stored question, ordered by id. Seeds an empty store first.
    async fn questions(&self, ctx: &Context<'_>) -> AppResult<Vec<Question>> {
        let state = ctx.data::<AppState>()?;
        state.question_service.list_questions().await
    }
}
