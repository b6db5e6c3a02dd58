use std::{collections::HashSet, sync::Arc};

use crates::domain::{
    entities::{business_walls::BusinessWallEntity, role_assignments::RoleAssignmentEntity},
    repositories::role_assignments::RoleAssignmentRepository,
    value_objects::enums::invitation_statuses::InvitationStatus,
};
use tracing::error;
use uuid::Uuid;

use crate::usecases::errors::{BusinessWallError, UseCaseResult};

/// Owner plus every user whose role invitation was accepted.
pub fn managers_ids(owner_id: Uuid, role_assignments: &[RoleAssignmentEntity]) -> HashSet<Uuid> {
    let mut ids: HashSet<Uuid> = role_assignments
        .iter()
        .filter(|assignment| assignment.status() == InvitationStatus::Accepted)
        .map(|assignment| assignment.user_id)
        .collect();
    ids.insert(owner_id);
    ids
}

pub struct RoleQuery<R>
where
    R: RoleAssignmentRepository + Send + Sync + ?Sized + 'static,
{
    role_assignment_repository: Arc<R>,
}

impl<R> RoleQuery<R>
where
    R: RoleAssignmentRepository + Send + Sync + ?Sized + 'static,
{
    pub fn new(role_assignment_repository: Arc<R>) -> Self {
        Self {
            role_assignment_repository,
        }
    }

    pub async fn managers_ids(
        &self,
        business_wall: &BusinessWallEntity,
    ) -> UseCaseResult<HashSet<Uuid>> {
        let role_assignments = self
            .role_assignment_repository
            .list_by_business_wall(business_wall.id)
            .await
            .map_err(|err| {
                error!(
                    business_wall_id = %business_wall.id,
                    db_error = ?err,
                    "role_query: failed to list role assignments"
                );
                BusinessWallError::Internal(err)
            })?;

        Ok(managers_ids(business_wall.owner_id, &role_assignments))
    }

    pub async fn is_manager(
        &self,
        business_wall: &BusinessWallEntity,
        user_id: Uuid,
    ) -> UseCaseResult<bool> {
        if self.is_owner(business_wall, user_id) {
            return Ok(true);
        }
        Ok(self.managers_ids(business_wall).await?.contains(&user_id))
    }

    pub fn is_owner(&self, business_wall: &BusinessWallEntity, user_id: Uuid) -> bool {
        business_wall.owner_id == user_id
    }

    pub async fn ensure_manager(
        &self,
        business_wall: &BusinessWallEntity,
        user_id: Uuid,
    ) -> UseCaseResult<()> {
        if self.is_manager(business_wall, user_id).await? {
            Ok(())
        } else {
            Err(BusinessWallError::NotManager)
        }
    }
}
