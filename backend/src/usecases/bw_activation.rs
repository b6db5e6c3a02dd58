use std::sync::Arc;

use chrono::Utc;
use crates::{
    domain::{
        entities::{
            business_walls::InsertBusinessWallEntity,
            role_assignments::InsertRoleAssignmentEntity,
            subscriptions::InsertBwSubscriptionEntity,
        },
        repositories::business_walls::BusinessWallRepository,
        value_objects::{
            bw_catalogue::{FREE_PRICING_FIELD, FREE_PRICING_TIER},
            bw_progress::BwProgress,
            enums::{
                bw_statuses::BwStatus, invitation_statuses::InvitationStatus,
                role_types::BwRoleType, subscription_statuses::SubscriptionStatus,
            },
            users::{ContactDetails, CurrentUser},
        },
    },
    infra::db::postgres::postgres_connection::is_unique_violation,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::usecases::errors::{BusinessWallError, UseCaseResult};

pub struct BwActivationUseCase<B>
where
    B: BusinessWallRepository + Send + Sync + ?Sized + 'static,
{
    business_wall_repository: Arc<B>,
}

impl<B> BwActivationUseCase<B>
where
    B: BusinessWallRepository + Send + Sync + ?Sized + 'static,
{
    pub fn new(business_wall_repository: Arc<B>) -> Self {
        Self {
            business_wall_repository,
        }
    }

    /// Creates the wall, its subscription and the owner role for a free type.
    ///
    /// Returns `Ok(false)` without writing anything when the progress is not
    /// ready or the type is not free. Paid types are activated by the payment
    /// confirmation flow.
    pub async fn activate_free(
        &self,
        progress: &BwProgress,
        user: &CurrentUser,
    ) -> UseCaseResult<bool> {
        let user_id = user.id;

        if !progress.bw_activated {
            info!(%user_id, "bw_activation: activation flag not set");
            return Ok(false);
        }
        let Some(bw_type) = progress.bw_type else {
            info!(%user_id, "bw_activation: no business wall type in session");
            return Ok(false);
        };
        if !bw_type.is_free() {
            info!(%user_id, %bw_type, "bw_activation: paid type cannot be activated for free");
            return Ok(false);
        }
        let Some(organisation_id) = user.organisation_id else {
            warn!(%user_id, "bw_activation: user has no organisation");
            return Err(BusinessWallError::NoOrganisation);
        };

        let existing = self
            .business_wall_repository
            .find_current_by_organisation(organisation_id)
            .await
            .map_err(|err| {
                error!(%user_id, %organisation_id, db_error = ?err, "bw_activation: lookup failed");
                BusinessWallError::Internal(err)
            })?;
        if let Some(existing) = existing {
            warn!(
                %user_id,
                %organisation_id,
                business_wall_id = %existing.id,
                "bw_activation: organisation already has a business wall"
            );
            return Err(BusinessWallError::AlreadyActivated);
        }

        let now = Utc::now();
        let payer = progress
            .payer
            .clone()
            .unwrap_or_else(|| ContactDetails::from_user(user));

        let business_wall = InsertBusinessWallEntity {
            bw_type: bw_type.to_string(),
            status: BwStatus::Active.to_string(),
            is_free: true,
            owner_id: user_id,
            payer_id: user_id,
            organisation_id: Some(organisation_id),
            activated_at: Some(now),
            payer_first_name: payer.first_name,
            payer_last_name: payer.last_name,
            payer_email: payer.email,
            payer_phone: payer.phone,
        };
        let subscription = InsertBwSubscriptionEntity {
            business_wall_id: None,
            status: SubscriptionStatus::Active.to_string(),
            pricing_field: FREE_PRICING_FIELD.to_string(),
            pricing_tier: FREE_PRICING_TIER.to_string(),
            monthly_price: 0,
            annual_price: 0,
            started_at: now,
        };
        let owner_role = InsertRoleAssignmentEntity {
            business_wall_id: None,
            user_id,
            role_type: BwRoleType::BwOwner.to_string(),
            invitation_status: InvitationStatus::Accepted.to_string(),
            invited_at: now,
            accepted_at: Some(now),
        };

        let business_wall_id = self
            .business_wall_repository
            .create_free_business_wall(business_wall, subscription, owner_role)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(
                        %user_id,
                        %organisation_id,
                        "bw_activation: concurrent activation rejected",
                    );
                    BusinessWallError::AlreadyActivated
                } else {
                    error!(
                        %user_id,
                        %organisation_id,
                        db_error = ?err,
                        "bw_activation: create failed",
                    );
                    BusinessWallError::Internal(err)
                }
            })?;

        info!(
            %user_id,
            %organisation_id,
            %business_wall_id,
            %bw_type,
            "bw_activation: free business wall activated",
        );
        Ok(true)
    }

    /// ACTIVE -> SUSPENDED, ending the active subscription.
    pub async fn suspend(&self, business_wall_id: Uuid) -> UseCaseResult<bool> {
        let business_wall = self
            .business_wall_repository
            .find_by_id(business_wall_id)
            .await
            .map_err(|err| {
                error!(%business_wall_id, db_error = ?err, "bw_activation: lookup failed");
                BusinessWallError::Internal(err)
            })?
            .ok_or(BusinessWallError::BwNotFound)?;

        let allowed = BwStatus::from_str(&business_wall.status)
            .is_some_and(|status| status.can_transition_to(BwStatus::Suspended));
        if !allowed {
            info!(
                %business_wall_id,
                status = %business_wall.status,
                "bw_activation: suspension skipped",
            );
            return Ok(false);
        }

        let suspended = self
            .business_wall_repository
            .suspend(business_wall_id)
            .await
            .map_err(|err| {
                error!(%business_wall_id, db_error = ?err, "bw_activation: suspend failed");
                BusinessWallError::Internal(err)
            })?;

        info!(%business_wall_id, suspended, "bw_activation: business wall suspended");
        Ok(suspended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::{business_wall, current_user};
    use crates::domain::{
        repositories::business_walls::MockBusinessWallRepository,
        value_objects::enums::bw_types::BwType,
    };
    use crates::infra::db::postgres::postgres_connection::unique_violation;
    use mockall::predicate::eq;

    fn ready_progress(bw_type: Option<BwType>) -> BwProgress {
        BwProgress {
            bw_type,
            bw_type_confirmed: true,
            contacts_confirmed: true,
            bw_activated: true,
            ..BwProgress::default()
        }
    }

    #[tokio::test]
    async fn every_free_type_creates_exactly_one_triple() {
        for bw_type in BwType::ALL.into_iter().filter(BwType::is_free) {
            let user = current_user(Some(Uuid::new_v4()));
            let user_id = user.id;

            let mut repo = MockBusinessWallRepository::new();
            repo.expect_find_current_by_organisation()
                .returning(|_| Ok(None));
            repo.expect_create_free_business_wall()
                .times(1)
                .withf(move |bw, subscription, owner_role| {
                    bw.bw_type == bw_type.as_str()
                        && bw.status == "active"
                        && bw.is_free
                        && bw.owner_id == user_id
                        && bw.payer_id == user_id
                        && bw.activated_at.is_some()
                        && subscription.status == "active"
                        && subscription.pricing_field == "N/A"
                        && subscription.pricing_tier == "N/A"
                        && subscription.monthly_price == 0
                        && subscription.annual_price == 0
                        && owner_role.user_id == user_id
                        && owner_role.role_type == "BW_OWNER"
                        && owner_role.invitation_status == "accepted"
                        && owner_role.accepted_at.is_some()
                })
                .returning(|_, _, _| Ok(Uuid::new_v4()));

            let usecase = BwActivationUseCase::new(Arc::new(repo));
            let activated = usecase
                .activate_free(&ready_progress(Some(bw_type)), &user)
                .await
                .expect("activation");

            assert!(activated, "{bw_type}");
        }
    }

    #[tokio::test]
    async fn paid_types_create_nothing() {
        for bw_type in [BwType::Pr, BwType::LeadersExperts, BwType::Transformers] {
            let mut repo = MockBusinessWallRepository::new();
            repo.expect_find_current_by_organisation().times(0);
            repo.expect_create_free_business_wall().times(0);

            let usecase = BwActivationUseCase::new(Arc::new(repo));
            let activated = usecase
                .activate_free(&ready_progress(Some(bw_type)), &current_user(Some(Uuid::new_v4())))
                .await
                .expect("activation");

            assert!(!activated, "{bw_type}");
        }
    }

    #[tokio::test]
    async fn activation_flag_is_checked_before_type() {
        let mut repo = MockBusinessWallRepository::new();
        repo.expect_create_free_business_wall().times(0);
        let usecase = BwActivationUseCase::new(Arc::new(repo));
        let user = current_user(Some(Uuid::new_v4()));

        let mut not_activated = ready_progress(Some(BwType::Media));
        not_activated.bw_activated = false;
        assert!(!usecase.activate_free(&not_activated, &user).await.expect("flag"));

        assert!(!usecase.activate_free(&ready_progress(None), &user).await.expect("type"));

        // No organisation would be an error, but the missing flag wins.
        let mut no_org_no_flag = ready_progress(Some(BwType::Media));
        no_org_no_flag.bw_activated = false;
        let outcome = usecase.activate_free(&no_org_no_flag, &current_user(None)).await;
        assert!(matches!(outcome, Ok(false)));
    }

    #[tokio::test]
    async fn existing_wall_is_reported_as_already_activated() {
        let user = current_user(Some(Uuid::new_v4()));
        let organisation_id = user.organisation_id.expect("organisation");
        let existing = business_wall(Uuid::new_v4(), organisation_id);

        let mut repo = MockBusinessWallRepository::new();
        repo.expect_find_current_by_organisation()
            .with(eq(organisation_id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create_free_business_wall().times(0);

        let usecase = BwActivationUseCase::new(Arc::new(repo));
        let result = usecase.activate_free(&ready_progress(Some(BwType::Union)), &user).await;

        assert!(matches!(result, Err(BusinessWallError::AlreadyActivated)));
    }

    #[tokio::test]
    async fn unique_violation_during_create_is_recoverable() {
        let mut repo = MockBusinessWallRepository::new();
        repo.expect_find_current_by_organisation()
            .returning(|_| Ok(None));
        repo.expect_create_free_business_wall()
            .returning(|_, _, _| {
                Err(unique_violation(
                    "business_walls_one_active_per_organisation",
                ))
            });

        let usecase = BwActivationUseCase::new(Arc::new(repo));
        let result = usecase
            .activate_free(
                &ready_progress(Some(BwType::Micro)),
                &current_user(Some(Uuid::new_v4())),
            )
            .await;

        assert!(matches!(result, Err(BusinessWallError::AlreadyActivated)));
    }

    #[tokio::test]
    async fn suspending_an_active_wall_delegates_to_the_repository() {
        let bw = business_wall(Uuid::new_v4(), Uuid::new_v4());
        let bw_id = bw.id;

        let mut repo = MockBusinessWallRepository::new();
        repo.expect_find_by_id()
            .with(eq(bw_id))
            .returning(move |_| Ok(Some(bw.clone())));
        repo.expect_suspend().with(eq(bw_id)).times(1).returning(|_| Ok(true));

        let usecase = BwActivationUseCase::new(Arc::new(repo));

        assert!(usecase.suspend(bw_id).await.expect("suspend"));
    }

    #[tokio::test]
    async fn suspended_wall_is_not_suspended_again() {
        let mut bw = business_wall(Uuid::new_v4(), Uuid::new_v4());
        bw.status = BwStatus::Suspended.to_string();
        let bw_id = bw.id;

        let mut repo = MockBusinessWallRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(bw.clone())));
        repo.expect_suspend().times(0);

        let usecase = BwActivationUseCase::new(Arc::new(repo));

        assert!(!usecase.suspend(bw_id).await.expect("suspend"));
    }
}
