use actix_web::{delete, error::JsonPayloadError, get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::Question,
        dto::response::{DeleteQuestionResponse, QuestionListResponse, SaveQuestionResponse},
    },
};

#[get("/api/questions")]
pub async fn list_questions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let questions = state.question_service.list_questions().await?;
    Ok(HttpResponse::Ok().json(QuestionListResponse::from(questions)))
}

#[put("/api/questions/{id}")]
pub async fn save_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<Question>,
) -> Result<HttpResponse, AppError> {
    let question = request.into_inner();
    if question.id != *id {
        return Err(AppError::ValidationError(format!(
            "Path id '{}' does not match question id '{}'",
            id, question.id
        )));
    }

    let stored = state.question_service.save_question(&question).await?;
    Ok(HttpResponse::Ok().json(SaveQuestionResponse::saved(stored)))
}

#[delete("/api/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteQuestionResponse::deleted(&id)))
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "backend": state.config.backend.to_string(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let db_health = state.question_service.health_check().await;
    if let Err(err) = &db_health {
        log::warn!("Readiness check failed: {}", err);
    }

    let backend = state.config.backend.to_string();
    let response = serde_json::json!({
        "status": if db_health.is_ok() { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            backend: if db_health.is_ok() { "ok" } else { "error" }
        }
    });

    if db_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Request bodies up to 32 MiB; rejected bodies answer with the JSON error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(32 * 1024 * 1024)
        .error_handler(|err, _req| {
            let app_error = match &err {
                JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
                    AppError::SizeLimitError(format!("request body is over the {} byte limit", limit))
                }
                _ => AppError::ValidationError(format!("invalid question payload: {}", err)),
            };
            log::warn!("Rejected request body: {}", err);
            app_error.into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(list_questions)
        .service(save_question)
        .service(delete_question)
        .service(health_check)
        .service(health_check_ready);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::Config,
        constants::default_questions::default_questions,
        models::document::RawQuestionDocument,
        repositories::MockQuestionRepository,
        services::QuestionService,
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn state(mock: MockQuestionRepository) -> AppState {
        let config = Config::test_config();
        let service = QuestionService::new(Arc::new(mock), config.max_document_bytes);
        AppState::from_service(Arc::new(service), config)
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(MockQuestionRepository::new())))
                .service(health_check),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn readiness_reports_backend_failure() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_health_check().returning(|| {
            Err(AppError::TransientBackendError("unreachable".to_string()))
        });

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["dependencies"]["firestore"], "error");
    }

    #[actix_web::test]
    async fn list_returns_ordered_questions() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_find_all().returning(|| {
            Ok(vec![
                RawQuestionDocument::new("q10", json!({ "choices": [] })),
                RawQuestionDocument::new("q9", json!({ "choices": [] })),
            ])
        });

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/questions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["questions"][0]["id"], "q9");
        assert_eq!(body["questions"][1]["id"], "q10");
    }

    #[actix_web::test]
    async fn save_rejects_mismatched_path_id() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_replace().times(0);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let question = default_questions().remove(0);
        let req = test::TestRequest::put()
            .uri("/api/questions/q2")
            .set_json(&question)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn save_returns_stored_question() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_replace()
            .withf(|id, _| id.to_string() == "q1")
            .times(1)
            .returning(|_, _| Ok(()));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let question = default_questions().remove(0);
        let req = test::TestRequest::put()
            .uri("/api/questions/q1")
            .set_json(&question)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["id"], "q1");
        assert_eq!(body["message"], "Question 'q1' saved");
    }

    #[actix_web::test]
    async fn save_accepts_null_legacy_and_malformed_media() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_replace()
            .withf(|id, document| {
                id.to_string() == "q7"
                    && document.choices[0].media.is_empty()
                    && document.choices[1].media.len() == 1
                    && document.choices[2].media.is_empty()
                    && document.choices[3].media.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/questions/q7")
            .set_json(json!({
                "id": "q7",
                "text": { "tr": "Hangisi?" },
                "choices": [
                    { "id": "a", "text": { "tr": "A" }, "media": null },
                    { "id": "b", "text": { "tr": "B" }, "media": { "type": "image", "url": "https://e.com/b.png" } },
                    { "id": "c", "text": { "tr": "C" }, "media": [{ "type": "", "url": "x" }] },
                    { "id": "d", "text": { "tr": "D" }, "media": [{ "type": "image" }] }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["choices"][0]["media"], json!([]));
        assert_eq!(body["data"]["choices"][1]["media"][0]["type"], "image");
    }

    #[actix_web::test]
    async fn unreadable_body_answers_with_json_validation_error() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_replace().times(0);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/questions/q1")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"id":"q1","choices":"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn delete_removes_by_path_id() {
        let mut mock = MockQuestionRepository::new();
        mock.expect_delete()
            .withf(|id| id.to_string() == "q3")
            .times(1)
            .returning(|_| Ok(()));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(mock)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::delete().uri("/api/questions/q3").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
