use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::organisations::OrganisationEntity;

#[automock]
#[async_trait]
pub trait OrganisationRepository {
    async fn find_by_id(&self, organisation_id: Uuid) -> Result<Option<OrganisationEntity>>;

    async fn count_members(&self, organisation_id: Uuid) -> Result<i64>;

    async fn delete(&self, organisation_id: Uuid) -> Result<()>;

    /// Auto organisations that no user belongs to.
    async fn list_orphan_auto_ids(&self) -> Result<Vec<Uuid>>;
}
