use std::sync::Arc;

use crates::domain::{
    entities::business_walls::BusinessWallEntity,
    repositories::{
        business_walls::BusinessWallRepository, organisations::OrganisationRepository,
        role_assignments::RoleAssignmentRepository, users::UserRepository,
    },
    value_objects::{
        business_walls::{BusinessWallView, OrganisationMembersView, UNKNOWN_BW_NAME},
        users::CurrentUser,
    },
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::usecases::{
    errors::{BusinessWallError, UseCaseResult},
    membership::MembershipUseCase,
    role_query::RoleQuery,
};

/// Organisation name, or a placeholder when it is gone or unnamed.
pub async fn business_wall_name<O>(
    organisation_repository: &O,
    business_wall: &BusinessWallEntity,
) -> UseCaseResult<String>
where
    O: OrganisationRepository + Send + Sync + ?Sized,
{
    let Some(organisation_id) = business_wall.organisation_id else {
        return Ok(UNKNOWN_BW_NAME.to_string());
    };

    let organisation = organisation_repository
        .find_by_id(organisation_id)
        .await
        .map_err(|err| {
            error!(%organisation_id, db_error = ?err, "business_walls: organisation lookup failed");
            BusinessWallError::Internal(err)
        })?;

    Ok(organisation
        .map(|organisation| organisation.name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_BW_NAME.to_string()))
}

/// Read side shared by the onboarding and management handlers.
pub struct BusinessWallsUseCase<B, R, U, O>
where
    B: BusinessWallRepository + Send + Sync + ?Sized + 'static,
    R: RoleAssignmentRepository + Send + Sync + ?Sized + 'static,
    U: UserRepository + Send + Sync + ?Sized + 'static,
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
{
    business_wall_repository: Arc<B>,
    user_repository: Arc<U>,
    organisation_repository: Arc<O>,
    role_query: Arc<RoleQuery<R>>,
    membership: Arc<MembershipUseCase<U, O>>,
}

impl<B, R, U, O> BusinessWallsUseCase<B, R, U, O>
where
    B: BusinessWallRepository + Send + Sync + ?Sized + 'static,
    R: RoleAssignmentRepository + Send + Sync + ?Sized + 'static,
    U: UserRepository + Send + Sync + ?Sized + 'static,
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
{
    pub fn new(
        business_wall_repository: Arc<B>,
        user_repository: Arc<U>,
        organisation_repository: Arc<O>,
        role_query: Arc<RoleQuery<R>>,
        membership: Arc<MembershipUseCase<U, O>>,
    ) -> Self {
        Self {
            business_wall_repository,
            user_repository,
            organisation_repository,
            role_query,
            membership,
        }
    }

    /// `None` when the token refers to a user that no longer exists.
    pub async fn current_user(&self, user_id: Uuid) -> UseCaseResult<Option<CurrentUser>> {
        let user = self.user_repository.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "business_walls: failed to load user");
            BusinessWallError::Internal(err)
        })?;

        if user.is_none() {
            warn!(%user_id, "business_walls: authenticated user not found");
        }
        Ok(user.map(CurrentUser::from))
    }

    /// The business wall of the caller's organisation, if any.
    pub async fn current_business_wall(
        &self,
        user: &CurrentUser,
    ) -> UseCaseResult<Option<BusinessWallEntity>> {
        let Some(organisation_id) = user.organisation_id else {
            return Ok(None);
        };

        self.business_wall_repository
            .find_current_by_organisation(organisation_id)
            .await
            .map_err(|err| {
                error!(
                    user_id = %user.id,
                    %organisation_id,
                    db_error = ?err,
                    "business_walls: lookup failed",
                );
                BusinessWallError::Internal(err)
            })
    }

    pub async fn ensure_manager(
        &self,
        business_wall: &BusinessWallEntity,
        user_id: Uuid,
    ) -> UseCaseResult<()> {
        self.role_query.ensure_manager(business_wall, user_id).await
    }

    pub async fn business_wall_view(
        &self,
        business_wall: BusinessWallEntity,
        user: &CurrentUser,
    ) -> UseCaseResult<BusinessWallView> {
        let name =
            business_wall_name(self.organisation_repository.as_ref(), &business_wall).await?;
        let is_owner = self.role_query.is_owner(&business_wall, user.id);
        let is_manager = self.role_query.is_manager(&business_wall, user.id).await?;

        Ok(BusinessWallView::new(business_wall, name, is_owner, is_manager))
    }

    pub async fn organisation_members_view(
        &self,
        business_wall: &BusinessWallEntity,
    ) -> UseCaseResult<OrganisationMembersView> {
        let organisation_id = business_wall
            .organisation_id
            .ok_or(BusinessWallError::NoOrganisation)?;
        let members = self.membership.list_members(organisation_id).await?;

        Ok(OrganisationMembersView {
            business_wall_id: business_wall.id,
            organisation_id,
            members,
        })
    }

    /// Applies a members email list. The managers of the wall are never removed.
    pub async fn change_members_emails(
        &self,
        business_wall: &BusinessWallEntity,
        raw_emails: &str,
    ) -> UseCaseResult<Vec<String>> {
        let organisation_id = business_wall
            .organisation_id
            .ok_or(BusinessWallError::NoOrganisation)?;
        let protected = self.role_query.managers_ids(business_wall).await?;

        self.membership
            .change_members_emails(organisation_id, raw_emails, &protected)
            .await
    }
}
