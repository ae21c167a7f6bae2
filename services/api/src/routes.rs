use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use contractor_onboarding::workflows::onboarding::{
    onboarding_router, ContractorRepository, NotificationSender, OnboardingService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_onboarding_routes<R, N>(service: Arc<OnboardingService<R, N>>) -> axum::Router
where
    R: ContractorRepository + 'static,
    N: NotificationSender + 'static,
{
    onboarding_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryContractorRepository, LoggingNotificationSender};
    use axum::body::Body;
    use axum::http::Request;
    use contractor_onboarding::workflows::onboarding::{
        ContractorId, ContractorProfile, ContractorRecord, StrategyRegistry,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, LoggingNotificationSender) {
        let repository = InMemoryContractorRepository::default();
        repository.seed([ContractorRecord::draft(
            ContractorId::new("c-42"),
            ContractorProfile {
                full_name: "Priya Nair".to_string(),
                email: "priya@example.com".to_string(),
            },
            chrono::Utc::now(),
        )]);
        let sender = LoggingNotificationSender::default();
        let service = Arc::new(OnboardingService::new(
            Arc::new(StrategyRegistry::builtin()),
            Arc::new(repository),
            Arc::new(sender.clone()),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        (with_onboarding_routes(service).layer(Extension(state)), sender)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_and_readiness_report_state() {
        let (router, _) = app(false);

        let response = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "initializing");
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_prometheus_text() {
        let (router, _) = app(true);

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    async fn post_json(
        router: &axum::Router,
        path: &str,
        body: &'static str,
    ) -> axum::response::Response {
        router
            .clone()
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn onboarding_routes_are_mounted() {
        let (router, sender) = app(true);
        let base = "/api/v1/onboarding/contractors/c-42";

        // No route selected yet.
        let response = post_json(
            &router,
            &format!("{base}/execute-step"),
            r#"{"step_id":"cds_costing"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Routes are chosen once documents are in, never from draft.
        let response = post_json(
            &router,
            &format!("{base}/route"),
            r#"{"route":"offshore"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("route can only be selected after documents are uploaded"));

        let response = post_json(
            &router,
            &format!("{base}/transition"),
            r#"{"status":"pending_documents"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "pending_documents");

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient.email, "priya@example.com");

        let response = post_json(
            &router,
            &format!("{base}/transition"),
            r#"{"status":"documents_uploaded"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = post_json(
            &router,
            &format!("{base}/route"),
            r#"{"route":"offshore"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["route"], "offshore");
        assert_eq!(body["status"], "pending_cds_cs");

        let response = post_json(
            &router,
            &format!("{base}/execute-step"),
            r#"{"step_id":"cds_costing"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["next_status"], "cds_cs_completed");
    }
}
