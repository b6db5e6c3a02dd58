use anyhow::Result;
use backend::usecases::{
    bw_activation::BwActivationUseCase,
    membership::MembershipUseCase,
    notifications::{BwNotifier, LogOnlyMailer, MailGateway},
    organisation_gc::OrganisationGarbageCollector,
    role_invitations::RoleInvitationUseCase,
};
use crates::infra::db::{
    postgres::postgres_connection,
    repositories::{
        business_walls::BusinessWallPostgres, organisations::OrganisationPostgres,
        role_assignments::RoleAssignmentPostgres, users::UserPostgres,
    },
};
use std::sync::Arc;
use tracing::{error, info};
use worker::{
    axum_http, config,
    usecases::maintenance::{MaintenanceTasks, MaintenanceUseCase},
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Worker exited with error: {:?}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");
    if dotenvy_env.maintenance.internal_token.is_none() {
        info!("INTERNAL_MAINTENANCE_TOKEN not set, maintenance routes are disabled");
    }

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let business_wall_repository = Arc::new(BusinessWallPostgres::new(Arc::clone(&db_pool_arc)));
    let role_assignment_repository =
        Arc::new(RoleAssignmentPostgres::new(Arc::clone(&db_pool_arc)));
    let user_repository = Arc::new(UserPostgres::new(Arc::clone(&db_pool_arc)));
    let organisation_repository = Arc::new(OrganisationPostgres::new(Arc::clone(&db_pool_arc)));

    let garbage_collector = Arc::new(OrganisationGarbageCollector::new(Arc::clone(
        &organisation_repository,
    )));
    let membership = Arc::new(MembershipUseCase::new(
        Arc::clone(&user_repository),
        Arc::clone(&garbage_collector),
    ));

    // The sweeps never send mail.
    let notifier = Arc::new(BwNotifier::new(
        Arc::new(MailGateway::LogOnly(LogOnlyMailer)),
        String::new(),
    ));

    let invitations = Arc::new(RoleInvitationUseCase::new(
        Arc::clone(&business_wall_repository),
        role_assignment_repository,
        user_repository,
        organisation_repository,
        membership,
        notifier,
    ));
    let activation = Arc::new(BwActivationUseCase::new(business_wall_repository));

    let maintenance: Arc<dyn MaintenanceTasks> = Arc::new(MaintenanceUseCase::new(
        invitations,
        garbage_collector,
        activation,
    ));

    axum_http::http_serve::start(dotenvy_env, maintenance).await
}
