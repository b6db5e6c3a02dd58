pub mod bw_activation;
pub mod bw_management;
pub mod role_invitations;

#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::{
    Router,
    extract::FromRef,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie::Key};
use crates::{
    domain::{
        repositories::{
            business_walls::BusinessWallRepository, organisations::OrganisationRepository,
            role_assignments::RoleAssignmentRepository, users::UserRepository,
        },
        value_objects::{bw_progress::BwProgress, users::CurrentUser},
    },
    infra::{
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{
                business_walls::BusinessWallPostgres, organisations::OrganisationPostgres,
                role_assignments::RoleAssignmentPostgres, users::UserPostgres,
            },
        },
        mailer::MailClient,
    },
};
use tracing::info;

use crate::{
    auth::{AuthKeys, AuthUser},
    axum_http::{error_responses::AppError, session::ProgressSession},
    config::config_model::DotEnvyConfig,
    usecases::{
        business_walls::BusinessWallsUseCase,
        bw_activation::BwActivationUseCase,
        membership::MembershipUseCase,
        notifications::{BwNotifier, LogOnlyMailer, MailGateway, NotificationGateway},
        organisation_gc::OrganisationGarbageCollector,
        role_invitations::RoleInvitationUseCase,
        role_query::RoleQuery,
        stage_gate::{GateDecision, Stage, can_enter},
    },
};

pub type DynBusinessWallRepository = dyn BusinessWallRepository + Send + Sync;
pub type DynRoleAssignmentRepository = dyn RoleAssignmentRepository + Send + Sync;
pub type DynUserRepository = dyn UserRepository + Send + Sync;
pub type DynOrganisationRepository = dyn OrganisationRepository + Send + Sync;

pub type BusinessWallsService = BusinessWallsUseCase<
    DynBusinessWallRepository,
    DynRoleAssignmentRepository,
    DynUserRepository,
    DynOrganisationRepository,
>;
pub type ActivationService = BwActivationUseCase<DynBusinessWallRepository>;
pub type InvitationService = RoleInvitationUseCase<
    DynBusinessWallRepository,
    DynRoleAssignmentRepository,
    DynUserRepository,
    DynOrganisationRepository,
    dyn NotificationGateway,
>;

/// Record stores behind the `/BW` routes.
#[derive(Clone)]
pub struct BwRepositories {
    pub business_walls: Arc<DynBusinessWallRepository>,
    pub role_assignments: Arc<DynRoleAssignmentRepository>,
    pub users: Arc<DynUserRepository>,
    pub organisations: Arc<DynOrganisationRepository>,
}

impl BwRepositories {
    pub fn postgres(db_pool: Arc<PgPoolSquad>) -> Self {
        Self {
            business_walls: Arc::new(BusinessWallPostgres::new(Arc::clone(&db_pool))),
            role_assignments: Arc::new(RoleAssignmentPostgres::new(Arc::clone(&db_pool))),
            users: Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
            organisations: Arc::new(OrganisationPostgres::new(db_pool)),
        }
    }
}

pub fn mail_gateway(config: &DotEnvyConfig) -> Result<MailGateway> {
    match &config.mail {
        Some(mail) => {
            info!(from = %mail.from, "backend: mail api enabled");
            Ok(MailGateway::Api(MailClient::new(
                mail.api_url.clone(),
                mail.api_key.clone(),
                mail.from.clone(),
            )?))
        }
        None => {
            info!("backend: MAIL_API_URL not set, emails are only logged");
            Ok(MailGateway::LogOnly(LogOnlyMailer))
        }
    }
}

#[derive(Clone)]
pub struct BwState {
    pub business_walls: Arc<BusinessWallsService>,
    pub activation: Arc<ActivationService>,
    pub invitations: Arc<InvitationService>,
    pub auth_keys: AuthKeys,
    pub cookie_key: Key,
    pub secure_cookies: bool,
}

impl FromRef<BwState> for Key {
    fn from_ref(state: &BwState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<BwState> for AuthKeys {
    fn from_ref(state: &BwState) -> Self {
        state.auth_keys.clone()
    }
}

impl BwState {
    pub fn new(config: &DotEnvyConfig, db_pool: Arc<PgPoolSquad>) -> Result<Self> {
        let gateway = Arc::new(mail_gateway(config)?);
        Self::with_repositories(config, BwRepositories::postgres(db_pool), gateway)
    }

    pub fn with_repositories(
        config: &DotEnvyConfig,
        repositories: BwRepositories,
        gateway: Arc<dyn NotificationGateway>,
    ) -> Result<Self> {
        let BwRepositories {
            business_walls: business_wall_repository,
            role_assignments: role_assignment_repository,
            users: user_repository,
            organisations: organisation_repository,
        } = repositories;

        let garbage_collector = Arc::new(OrganisationGarbageCollector::new(Arc::clone(
            &organisation_repository,
        )));
        let membership = Arc::new(MembershipUseCase::new(
            Arc::clone(&user_repository),
            garbage_collector,
        ));
        let role_query = Arc::new(RoleQuery::new(Arc::clone(&role_assignment_repository)));
        let notifier = Arc::new(BwNotifier::new(gateway, config.public.base_url.clone()));

        let business_walls = BusinessWallsUseCase::new(
            Arc::clone(&business_wall_repository),
            Arc::clone(&user_repository),
            Arc::clone(&organisation_repository),
            role_query,
            Arc::clone(&membership),
        );
        let activation = BwActivationUseCase::new(Arc::clone(&business_wall_repository));
        let invitations = RoleInvitationUseCase::new(
            business_wall_repository,
            role_assignment_repository,
            user_repository,
            organisation_repository,
            membership,
            notifier,
        );

        let cookie_key = Key::try_from(config.session.secret.as_bytes())
            .map_err(|err| anyhow!("SESSION_SECRET is invalid: {:?}", err))?;

        Ok(Self {
            business_walls: Arc::new(business_walls),
            activation: Arc::new(activation),
            invitations: Arc::new(invitations),
            auth_keys: AuthKeys::new(&config.auth.jwt_secret),
            cookie_key,
            secure_cookies: config.stage.secure_cookies(),
        })
    }

    /// Loads the caller and their progress. Failures are already turned
    /// into responses.
    pub async fn context(
        &self,
        auth: &AuthUser,
        jar: SignedCookieJar,
    ) -> Result<BwContext, Response> {
        let user = match self.business_walls.current_user(auth.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AppError::Unauthorized.into_response()),
            Err(err) => {
                return Err(ProgressSession::load(jar, auth.user_id, self.secure_cookies).fail(err));
            }
        };
        let session = ProgressSession::load(jar, user.id, self.secure_cookies);

        Ok(BwContext { user, session })
    }
}

pub struct BwContext {
    pub user: CurrentUser,
    pub session: ProgressSession,
}

/// Location to send the caller to when `stage` may not be entered yet.
pub fn gate_redirect(stage: Stage, progress: &BwProgress, bw_exists: bool) -> Option<String> {
    match can_enter(stage, progress, bw_exists) {
        GateDecision::Allowed => None,
        GateDecision::RedirectTo(target) => Some(target.location(progress.bw_type)),
    }
}

pub fn routes(state: BwState) -> Router {
    Router::new()
        .merge(bw_activation::routes())
        .merge(bw_management::routes())
        .merge(role_invitations::routes())
        .with_state(state)
}
