use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{business_walls, bw_role_assignments, bw_subscriptions},
    },
};
use domain::{
    entities::{
        business_walls::{BusinessWallEntity, InsertBusinessWallEntity},
        role_assignments::InsertRoleAssignmentEntity,
        subscriptions::InsertBwSubscriptionEntity,
    },
    repositories::business_walls::BusinessWallRepository,
    value_objects::enums::{bw_statuses::BwStatus, subscription_statuses::SubscriptionStatus},
};

pub struct BusinessWallPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BusinessWallPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BusinessWallRepository for BusinessWallPostgres {
    async fn find_by_id(&self, business_wall_id: Uuid) -> Result<Option<BusinessWallEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = business_walls::table
            .filter(business_walls::id.eq(business_wall_id))
            .select(BusinessWallEntity::as_select())
            .first::<BusinessWallEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_current_by_organisation(
        &self,
        organisation_id: Uuid,
    ) -> Result<Option<BusinessWallEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = business_walls::table
            .filter(business_walls::organisation_id.eq(organisation_id))
            .filter(business_walls::status.ne(BwStatus::Suspended.to_string()))
            .order(business_walls::created_at.desc())
            .select(BusinessWallEntity::as_select())
            .first::<BusinessWallEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create_free_business_wall(
        &self,
        business_wall: InsertBusinessWallEntity,
        mut subscription: InsertBwSubscriptionEntity,
        mut owner_role: InsertRoleAssignmentEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
            let business_wall_id: Uuid = insert_into(business_walls::table)
                .values(&business_wall)
                .returning(business_walls::id)
                .get_result::<Uuid>(tx)?;

            subscription.business_wall_id = Some(business_wall_id);
            insert_into(bw_subscriptions::table)
                .values(&subscription)
                .execute(tx)?;

            owner_role.business_wall_id = Some(business_wall_id);
            insert_into(bw_role_assignments::table)
                .values(&owner_role)
                .execute(tx)?;

            Ok(business_wall_id)
        })?;

        Ok(result)
    }

    async fn suspend(&self, business_wall_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let suspended = conn.transaction::<bool, diesel::result::Error, _>(|tx| {
            let updated = update(business_walls::table)
                .filter(business_walls::id.eq(business_wall_id))
                .filter(business_walls::status.eq(BwStatus::Active.to_string()))
                .set((
                    business_walls::status.eq(BwStatus::Suspended.to_string()),
                    business_walls::updated_at.eq(now),
                ))
                .execute(tx)?;

            if updated == 0 {
                return Ok(false);
            }

            update(bw_subscriptions::table)
                .filter(bw_subscriptions::business_wall_id.eq(business_wall_id))
                .filter(bw_subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
                .set((
                    bw_subscriptions::status.eq(SubscriptionStatus::Ended.to_string()),
                    bw_subscriptions::ended_at.eq(Some(now)),
                ))
                .execute(tx)?;

            Ok(true)
        })?;

        Ok(suspended)
    }
}
