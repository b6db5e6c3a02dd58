use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use backend::usecases::errors::BusinessWallError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    config::config_model::DotEnvyConfig,
    usecases::maintenance::{MaintenanceTasks, invitation_cutoff},
};

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT_WORKER/internal/v1/invitations/expire" \
//     -H "Authorization: Bearer $INTERNAL_MAINTENANCE_TOKEN" \
//     -H "Content-Type: application/json" \
//     -d '{"older_than_days":30}'

#[derive(Clone)]
pub struct MaintenanceRouteState {
    config: Arc<DotEnvyConfig>,
    usecase: Arc<dyn MaintenanceTasks>,
}

pub fn routes(config: Arc<DotEnvyConfig>, usecase: Arc<dyn MaintenanceTasks>) -> Router {
    Router::new()
        .route("/invitations/expire", post(expire_invitations))
        .route("/organisations/gc", post(collect_orphan_organisations))
        .route("/business-walls/:business_wall_id/suspend", post(suspend_business_wall))
        .with_state(MaintenanceRouteState { config, usecase })
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpireInvitationsRequest {
    pub older_than_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ExpireInvitationsResponse {
    pub cutoff: DateTime<Utc>,
    pub expired: usize,
}

#[derive(Debug, Serialize)]
pub struct CollectOrganisationsResponse {
    pub deleted: usize,
}

#[derive(Debug, Serialize)]
pub struct SuspendBusinessWallResponse {
    pub business_wall_id: Uuid,
    pub suspended: bool,
}

pub async fn expire_invitations(
    State(state): State<MaintenanceRouteState>,
    headers: HeaderMap,
    payload: Option<Json<ExpireInvitationsRequest>>,
) -> Response {
    if let Err(response) = check_token(&state, &headers) {
        return response;
    }

    let older_than_days = payload
        .and_then(|Json(payload)| payload.older_than_days)
        .filter(|days| *days >= 0)
        .unwrap_or(state.config.maintenance.invitation_ttl_days);
    let cutoff = invitation_cutoff(Utc::now(), older_than_days);

    match state.usecase.expire_invitations(cutoff).await {
        Ok(expired) => {
            info!(%cutoff, expired, "maintenance: invitations expired");
            Json(ExpireInvitationsResponse { cutoff, expired }).into_response()
        }
        Err(err) => failure(err, "expire_invitations"),
    }
}

pub async fn collect_orphan_organisations(
    State(state): State<MaintenanceRouteState>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = check_token(&state, &headers) {
        return response;
    }

    match state.usecase.collect_orphan_organisations().await {
        Ok(deleted) => Json(CollectOrganisationsResponse { deleted }).into_response(),
        Err(err) => failure(err, "collect_orphan_organisations"),
    }
}

pub async fn suspend_business_wall(
    State(state): State<MaintenanceRouteState>,
    headers: HeaderMap,
    Path(business_wall_id): Path<Uuid>,
) -> Response {
    if let Err(response) = check_token(&state, &headers) {
        return response;
    }

    match state.usecase.suspend_business_wall(business_wall_id).await {
        Ok(suspended) => Json(SuspendBusinessWallResponse {
            business_wall_id,
            suspended,
        })
        .into_response(),
        Err(err) => failure(err, "suspend_business_wall"),
    }
}

fn check_token(state: &MaintenanceRouteState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected_token) = state.config.maintenance.internal_token.as_deref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "maintenance token is not configured",
        )
            .into_response());
    };

    authorize_bearer(headers, expected_token)
        .map_err(|status| (status, "unauthorized").into_response())
}

fn failure(err: BusinessWallError, route: &'static str) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = ?err, route, "maintenance: usecase failed");
        (status, "maintenance task failed").into_response()
    } else {
        (status, err.to_string()).into_response()
    }
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), StatusCode> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::config_model::{Database, Maintenance, WorkerServer},
        usecases::maintenance::MockMaintenanceTasks,
    };
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn config(token: Option<&str>) -> Arc<DotEnvyConfig> {
        Arc::new(DotEnvyConfig {
            worker_server: WorkerServer {
                port: 0,
                timeout: 30,
                body_limit: 1,
            },
            database: Database {
                url: "postgres://localhost:5432/bw".to_string(),
            },
            maintenance: Maintenance {
                internal_token: token.map(str::to_string),
                invitation_ttl_days: 30,
            },
        })
    }

    fn post(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut request = Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn routes_are_unavailable_without_a_configured_token() {
        let mut usecase = MockMaintenanceTasks::new();
        usecase.expect_collect_orphan_organisations().times(0);

        let app = routes(config(None), Arc::new(usecase));
        let response = app.oneshot(post("/organisations/gc", Some("secret"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn wrong_token_is_rejected() {
        let mut usecase = MockMaintenanceTasks::new();
        usecase.expect_expire_invitations().times(0);

        let app = routes(config(Some("secret")), Arc::new(usecase));
        let response = app.oneshot(post("/invitations/expire", Some("nope"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expiry_uses_the_configured_ttl_without_a_body() {
        let mut usecase = MockMaintenanceTasks::new();
        usecase
            .expect_expire_invitations()
            .withf(|cutoff| {
                let age = Utc::now() - *cutoff;
                age.num_days() == 30
            })
            .times(1)
            .returning(|_| Ok(4));

        let app = routes(config(Some("secret")), Arc::new(usecase));
        let response = app.oneshot(post("/invitations/expire", Some("secret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["expired"], 4);
    }

    #[tokio::test]
    async fn suspending_an_unknown_wall_is_not_found() {
        let mut usecase = MockMaintenanceTasks::new();
        usecase
            .expect_suspend_business_wall()
            .times(1)
            .returning(|_| Err(BusinessWallError::BwNotFound));

        let app = routes(config(Some("secret")), Arc::new(usecase));
        let uri = format!("/business-walls/{}/suspend", Uuid::new_v4());
        let response = app.oneshot(post(&uri, Some("secret"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bearer_prefix_is_required() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "secret".parse().unwrap());
        assert_eq!(authorize_bearer(&headers, "secret"), Err(StatusCode::UNAUTHORIZED));

        headers.insert(AUTHORIZATION, "Bearer secret".parse().unwrap());
        assert_eq!(authorize_bearer(&headers, "secret"), Ok(()));
    }
}
