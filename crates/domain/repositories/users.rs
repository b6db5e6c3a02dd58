use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;

    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<UserEntity>;

    async fn list_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<UserEntity>>;

    async fn list_members(&self, organisation_id: Uuid) -> Result<Vec<UserEntity>>;

    /// Moves the user to another organisation, dropping manager and leader flags.
    async fn set_organisation(&self, user_id: Uuid, organisation_id: Option<Uuid>) -> Result<()>;
}
