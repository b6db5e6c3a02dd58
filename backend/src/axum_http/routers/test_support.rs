//! Router fixtures: mocked record stores, a signed-in caller and a cookie
//! carried from one response to the next request.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        request::Builder,
    },
    response::Response,
};
use chrono::{Duration, Utc};
use crates::domain::repositories::{
    business_walls::MockBusinessWallRepository, organisations::MockOrganisationRepository,
    role_assignments::MockRoleAssignmentRepository, users::MockUserRepository,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::Claims,
    axum_http::{
        routers::{BwRepositories, BwState, routes},
        session::BW_PROGRESS_COOKIE,
    },
    config::{
        config_model::{Auth, BackendServer, Database, DotEnvyConfig, Public, Session},
        stage::Stage,
    },
    usecases::notifications::MockNotificationGateway,
};

const JWT_SECRET: &str = "router-tests-jwt-secret";

pub fn config() -> DotEnvyConfig {
    DotEnvyConfig {
        backend_server: BackendServer {
            port: 0,
            body_limit: 1,
            timeout: 30,
        },
        database: Database {
            url: "postgres://localhost:5432/bw".to_string(),
        },
        auth: Auth {
            jwt_secret: JWT_SECRET.to_string(),
        },
        session: Session {
            secret: "s".repeat(64),
        },
        public: Public {
            base_url: "http://localhost:3000".to_string(),
        },
        mail: None,
        stage: Stage::Local,
    }
}

#[derive(Default)]
pub struct MockStores {
    pub business_walls: MockBusinessWallRepository,
    pub role_assignments: MockRoleAssignmentRepository,
    pub users: MockUserRepository,
    pub organisations: MockOrganisationRepository,
    pub gateway: MockNotificationGateway,
}

impl MockStores {
    /// The `/BW` router as served, backed by these mocks.
    pub fn into_app(self) -> Router {
        let repositories = BwRepositories {
            business_walls: Arc::new(self.business_walls),
            role_assignments: Arc::new(self.role_assignments),
            users: Arc::new(self.users),
            organisations: Arc::new(self.organisations),
        };
        let state = BwState::with_repositories(&config(), repositories, Arc::new(self.gateway))
            .expect("state");

        Router::new().nest("/BW", routes(state))
    }
}

/// Sends requests as one user and replays the progress cookie it receives.
pub struct Browser {
    app: Router,
    token: String,
    cookie: Option<String>,
}

impl Browser {
    pub fn new(app: Router, user_id: Uuid) -> Self {
        let claims = Claims {
            sub: user_id.to_string(),
            email: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .expect("token");

        Self {
            app,
            token,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::builder().method("GET").uri(uri), Body::empty())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(form.to_string())).await
    }

    async fn send(&mut self, request: Builder, body: Body) -> Response {
        let mut request = request.header(AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("response");

        let progress = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .find(|pair| pair.starts_with(&format!("{BW_PROGRESS_COOKIE}=")));
        if let Some(progress) = progress {
            self.cookie = Some(progress.to_string());
        }

        response
    }
}

/// Target of a redirect response.
pub fn location(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "not a redirect");
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
