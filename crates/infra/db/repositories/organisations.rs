use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{organisations, users},
    },
};
use domain::{
    entities::organisations::OrganisationEntity,
    repositories::organisations::OrganisationRepository,
};

pub struct OrganisationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrganisationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrganisationRepository for OrganisationPostgres {
    async fn find_by_id(&self, organisation_id: Uuid) -> Result<Option<OrganisationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = organisations::table
            .filter(organisations::id.eq(organisation_id))
            .select(OrganisationEntity::as_select())
            .first::<OrganisationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn count_members(&self, organisation_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = users::table
            .filter(users::organisation_id.eq(organisation_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn delete(&self, organisation_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(organisations::table.filter(organisations::id.eq(organisation_id)))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_orphan_auto_ids(&self) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = organisations::table
            .left_join(users::table)
            .filter(organisations::is_auto.eq(true))
            .filter(users::id.nullable().is_null())
            .select(organisations::id)
            .load::<Uuid>(&mut conn)?;

        Ok(results)
    }
}
