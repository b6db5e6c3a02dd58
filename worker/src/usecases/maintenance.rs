use std::sync::Arc;

use async_trait::async_trait;
use backend::usecases::{
    bw_activation::BwActivationUseCase,
    errors::UseCaseResult,
    notifications::NotificationGateway,
    organisation_gc::OrganisationGarbageCollector,
    role_invitations::RoleInvitationUseCase,
};
use chrono::{DateTime, Duration, Utc};
use crates::domain::repositories::{
    business_walls::BusinessWallRepository, organisations::OrganisationRepository,
    role_assignments::RoleAssignmentRepository, users::UserRepository,
};
use uuid::Uuid;

/// Sweeps triggered through the internal routes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceTasks: Send + Sync {
    async fn expire_invitations(&self, cutoff: DateTime<Utc>) -> UseCaseResult<usize>;

    async fn collect_orphan_organisations(&self) -> UseCaseResult<usize>;

    async fn suspend_business_wall(&self, business_wall_id: Uuid) -> UseCaseResult<bool>;
}

/// Pending invitations sent before this instant are stale.
pub fn invitation_cutoff(now: DateTime<Utc>, ttl_days: i64) -> DateTime<Utc> {
    Duration::try_days(ttl_days)
        .and_then(|ttl| now.checked_sub_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub struct MaintenanceUseCase<B, R, U, O, N>
where
    B: BusinessWallRepository + Send + Sync + 'static,
    R: RoleAssignmentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    O: OrganisationRepository + Send + Sync + 'static,
    N: NotificationGateway + 'static,
{
    invitations: Arc<RoleInvitationUseCase<B, R, U, O, N>>,
    garbage_collector: Arc<OrganisationGarbageCollector<O>>,
    activation: Arc<BwActivationUseCase<B>>,
}

impl<B, R, U, O, N> MaintenanceUseCase<B, R, U, O, N>
where
    B: BusinessWallRepository + Send + Sync + 'static,
    R: RoleAssignmentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    O: OrganisationRepository + Send + Sync + 'static,
    N: NotificationGateway + 'static,
{
    pub fn new(
        invitations: Arc<RoleInvitationUseCase<B, R, U, O, N>>,
        garbage_collector: Arc<OrganisationGarbageCollector<O>>,
        activation: Arc<BwActivationUseCase<B>>,
    ) -> Self {
        Self {
            invitations,
            garbage_collector,
            activation,
        }
    }
}

#[async_trait]
impl<B, R, U, O, N> MaintenanceTasks for MaintenanceUseCase<B, R, U, O, N>
where
    B: BusinessWallRepository + Send + Sync + 'static,
    R: RoleAssignmentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    O: OrganisationRepository + Send + Sync + 'static,
    N: NotificationGateway + 'static,
{
    async fn expire_invitations(&self, cutoff: DateTime<Utc>) -> UseCaseResult<usize> {
        self.invitations.expire_stale_invitations(cutoff).await
    }

    async fn collect_orphan_organisations(&self) -> UseCaseResult<usize> {
        self.garbage_collector.collect_all_orphans().await
    }

    async fn suspend_business_wall(&self, business_wall_id: Uuid) -> UseCaseResult<bool> {
        self.activation.suspend(business_wall_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cutoff_is_ttl_days_before_now() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
        let cutoff = invitation_cutoff(now, 30);

        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        assert_eq!(invitation_cutoff(now, 0), now);
        assert_eq!(invitation_cutoff(now, i64::MAX), DateTime::<Utc>::MIN_UTC);
    }
}
