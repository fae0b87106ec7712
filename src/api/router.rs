use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::designer;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::workflow;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Engine endpoints, query string or form body
        .route(
            "/workflowapi",
            get(workflow::workflow_api).post(workflow::workflow_api),
        )
        .route(
            "/designerapi",
            get(designer::designer_api).post(designer::designer_api),
        )
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::api::types::ResponseEnvelope;
    use crate::config::{BackendConfig, EngineConfig};
    use crate::domain::engine::{fixtures::approval_scheme, MockWorkflowEngine};
    use crate::domain::Locale;
    use crate::infrastructure::backend::{BackendSelector, EngineHandle, EngineOptions, MemoryProvider};
    use crate::infrastructure::callback::builtin_code_actions;
    use crate::infrastructure::engine::InMemoryEngineFactory;

    async fn in_memory_app() -> Router {
        let options =
            EngineOptions::from_config(&EngineConfig::default(), builtin_code_actions()).unwrap();
        let factory = InMemoryEngineFactory::new(vec![approval_scheme()]);
        let handle = BackendSelector::build(&BackendConfig::default(), options, &factory)
            .await
            .unwrap();

        create_router(AppState::new(handle, Locale::default()))
    }

    fn mock_app(engine: MockWorkflowEngine) -> Router {
        let handle = EngineHandle::new(Arc::new(engine), Arc::new(MemoryProvider), Uuid::new_v4());
        create_router(AppState::new(handle, Locale::default()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn call(app: &Router, request: Request<Body>) -> ResponseEnvelope {
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = in_memory_app().await;

        let (status, _) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, get_request("/live")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"][0]["name"], "persistence");
    }

    #[tokio::test]
    async fn test_ready_with_unpinged_backend() {
        let options =
            EngineOptions::from_config(&EngineConfig::default(), builtin_code_actions()).unwrap();
        let config = BackendConfig {
            provider: "mongodb".to_string(),
            url: "mongodb://db:27017".to_string(),
            database: "wf".to_string(),
            ..BackendConfig::default()
        };
        let handle = BackendSelector::build(&config, options, &InMemoryEngineFactory::default())
            .await
            .unwrap();
        let app = create_router(AppState::new(handle, Locale::default()));

        let (status, body) = send(&app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "mongodb");
        assert_eq!(body["checks"][0]["message"], "mongodb://db:27017/wf not pinged");
    }

    #[tokio::test]
    async fn test_process_lifecycle() {
        let app = in_memory_app().await;
        let id = Uuid::new_v4();

        let envelope = call(
            &app,
            get_request(&format!("/workflowapi?operation=isexistprocess&processid={}", id)),
        )
        .await;
        assert_eq!(envelope, ResponseEnvelope::ok(json!(false)));

        let envelope = call(
            &app,
            post_form(
                &format!(
                    "/workflowapi?operation=createinstance&processid={}&schemacode=approval&identityid=clerk",
                    id
                ),
                "Amount=250.5&Requester=alice",
            ),
        )
        .await;
        assert_eq!(envelope, ResponseEnvelope::empty());

        let envelope = call(
            &app,
            get_request(&format!("/workflowapi?operation=IsExistProcess&processid={}", id)),
        )
        .await;
        assert_eq!(envelope.data, json!(true));

        let envelope = call(
            &app,
            get_request(&format!(
                "/workflowapi?operation=getavailablecommands&processid={}&identityid=clerk",
                id
            )),
        )
        .await;
        assert!(envelope.success);
        assert_eq!(envelope.data[0]["name"], "submit");

        let envelope = call(
            &app,
            post_form(
                &format!(
                    "/workflowapi?operation=executecommand&processid={}&identityid=clerk&command=submit",
                    id
                ),
                "Comment=ready",
            ),
        )
        .await;
        assert_eq!(envelope, ResponseEnvelope::empty());

        // Only managers may approve
        let envelope = call(
            &app,
            get_request(&format!(
                "/workflowapi?operation=executecommand&processid={}&identityid=clerk&command=approve",
                id
            )),
        )
        .await;
        assert_eq!(envelope, ResponseEnvelope::failure("Command approve is not found"));

        let envelope = call(
            &app,
            post_form(
                &format!(
                    "/workflowapi?operation=executecommand&processid={}&identityid=clerk&impersonatedidentityid=manager&command=approve",
                    id
                ),
                "Priority=2",
            ),
        )
        .await;
        assert!(envelope.success, "{}", envelope.error);

        let envelope = call(
            &app,
            get_request(&format!(
                "/workflowapi?operation=getavailablecommands&processid={}&identityid=manager",
                id
            )),
        )
        .await;
        assert_eq!(envelope.data, json!([]));
    }

    #[tokio::test]
    async fn test_states_and_set_state() {
        let app = in_memory_app().await;
        let id = Uuid::new_v4();

        call(
            &app,
            get_request(&format!(
                "/workflowapi?operation=createinstance&processid={}&schemacode=approval",
                id
            )),
        )
        .await;

        let envelope = call(
            &app,
            get_request(&format!(
                "/workflowapi?operation=getavailablestatetoset&processid={}&culture=de-DE",
                id
            )),
        )
        .await;
        assert_eq!(envelope.data[0]["localized_name"], "Entwurf");
        assert_eq!(envelope.data.as_array().unwrap().len(), 2);

        let envelope = call(
            &app,
            get_request(&format!("/workflowapi?operation=setstate&processid={}&state=Review", id)),
        )
        .await;
        assert_eq!(envelope, ResponseEnvelope::empty());

        let envelope = call(
            &app,
            get_request(&format!(
                "/workflowapi?operation=setstate&processid={}&state=Approved",
                id
            )),
        )
        .await;
        assert!(!envelope.success);
        assert!(envelope.error.contains("State 'Approved' cannot be set"));
    }

    #[tokio::test]
    async fn test_validation_errors_are_enveloped() {
        let app = mock_app(MockWorkflowEngine::new());

        for (uri, error) in [
            ("/workflowapi", "Parameter 'operation' is required"),
            (
                "/workflowapi?operation=isexistprocess&processid=12",
                "Parameter 'processid' is required and must be a UUID",
            ),
            (
                "/workflowapi?operation=archive&processid=0b6f3c2a-1d4e-4f5a-8b9c-0d1e2f3a4b5c",
                "operation=archive is not supported",
            ),
        ] {
            let envelope = call(&app, get_request(uri)).await;
            assert_eq!(envelope, ResponseEnvelope::failure(error), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_designer_download_headers() {
        let app = in_memory_app().await;

        let response = app
            .clone()
            .oneshot(get_request("/designerapi?operation=downloadscheme&schemecode=approval"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=schema.xml"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains("<Process Name=\"approval\""));
    }

    #[tokio::test]
    async fn test_designer_text_and_failure() {
        let app = in_memory_app().await;

        let response = app
            .clone()
            .oneshot(get_request("/designerapi?operation=exists&schemecode=approval"))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"true");

        let (status, body) = send(&app, get_request("/designerapi?operation=load&schemecode=missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_designer_ignores_file_on_get() {
        let mut engine = MockWorkflowEngine::new();
        engine
            .expect_designer_api()
            .withf(|request| request.file.is_none() && request.parameters.get("operation") == Some("load"))
            .times(1)
            .returning(|_| Ok("{}".to_string()));

        let app = mock_app(engine);
        let (status, body) = send(&app, get_request("/designerapi?operation=load&schemecode=x")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"{}");
    }
}
