use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    business_walls::{BusinessWallEntity, InsertBusinessWallEntity},
    role_assignments::InsertRoleAssignmentEntity,
    subscriptions::InsertBwSubscriptionEntity,
};

#[automock]
#[async_trait]
pub trait BusinessWallRepository {
    async fn find_by_id(&self, business_wall_id: Uuid) -> Result<Option<BusinessWallEntity>>;

    /// Latest non-suspended business wall of an organisation.
    async fn find_current_by_organisation(
        &self,
        organisation_id: Uuid,
    ) -> Result<Option<BusinessWallEntity>>;

    /// Writes the wall, its subscription and the owner role in one transaction.
    async fn create_free_business_wall(
        &self,
        business_wall: InsertBusinessWallEntity,
        subscription: InsertBwSubscriptionEntity,
        owner_role: InsertRoleAssignmentEntity,
    ) -> Result<Uuid>;

    /// Returns `false` when the wall was not active.
    async fn suspend(&self, business_wall_id: Uuid) -> Result<bool>;

}
