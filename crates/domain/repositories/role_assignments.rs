use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::role_assignments::{InsertRoleAssignmentEntity, RoleAssignmentEntity},
    value_objects::enums::{invitation_statuses::InvitationStatus, role_types::BwRoleType},
};

#[automock]
#[async_trait]
pub trait RoleAssignmentRepository {
    async fn list_by_business_wall(
        &self,
        business_wall_id: Uuid,
    ) -> Result<Vec<RoleAssignmentEntity>>;

    async fn find(
        &self,
        business_wall_id: Uuid,
        user_id: Uuid,
        role_type: BwRoleType,
    ) -> Result<Option<RoleAssignmentEntity>>;

    /// Inserts unless `(business_wall_id, user_id, role_type)` already exists.
    /// Returns the new row, or `None` when nothing was inserted.
    async fn insert_if_absent(
        &self,
        role_assignment: InsertRoleAssignmentEntity,
    ) -> Result<Option<RoleAssignmentEntity>>;

    /// Moves a pending row to `status`. Returns `false` if the row was no
    /// longer pending.
    async fn respond(
        &self,
        role_assignment_id: Uuid,
        status: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn expire_pending_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
