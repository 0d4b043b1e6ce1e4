//! Liveness and readiness endpoints.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, web};

/// Shared readiness flag flipped once startup completes.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a not-yet-ready state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the process ready to serve traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether startup has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Process liveness: always 200 while the process can serve requests.
#[utoipa::path(
    get,
    path = "/healthz/live",
    responses((status = 200, description = "Process is live")),
    tags = ["health"],
    operation_id = "live",
    security([])
)]
#[get("/healthz/live")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Readiness: 200 once startup finished, 503 before.
#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Ready for traffic"),
        (status = 503, description = "Still starting up")
    ),
    tags = ["health"],
    operation_id = "ready",
    security([])
)]
#[get("/healthz/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::ServiceUnavailable().finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::{App, test as actix_test, web};

    use super::*;

    #[actix_web::test]
    async fn live_is_always_ok() {
        let app = actix_test::init_service(App::new().service(live)).await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/healthz/live").to_request())
                .await;
        assert!(response.status().is_success());
    }

    #[actix_web::test]
    async fn ready_tracks_the_flag() {
        let state = HealthState::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(ready),
        )
        .await;

        let before = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/healthz/ready").to_request(),
        )
        .await;
        assert_eq!(before.status(), actix_web::http::StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let after = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/healthz/ready").to_request(),
        )
        .await;
        assert!(after.status().is_success());
    }
}
