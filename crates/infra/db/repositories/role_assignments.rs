use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::bw_role_assignments},
};
use domain::{
    entities::role_assignments::{InsertRoleAssignmentEntity, RoleAssignmentEntity},
    repositories::role_assignments::RoleAssignmentRepository,
    value_objects::enums::{invitation_statuses::InvitationStatus, role_types::BwRoleType},
};

pub struct RoleAssignmentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RoleAssignmentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RoleAssignmentRepository for RoleAssignmentPostgres {
    async fn list_by_business_wall(
        &self,
        business_wall_id: Uuid,
    ) -> Result<Vec<RoleAssignmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bw_role_assignments::table
            .filter(bw_role_assignments::business_wall_id.eq(business_wall_id))
            .order(bw_role_assignments::invited_at.asc())
            .select(RoleAssignmentEntity::as_select())
            .load::<RoleAssignmentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find(
        &self,
        business_wall_id: Uuid,
        user_id: Uuid,
        role_type: BwRoleType,
    ) -> Result<Option<RoleAssignmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bw_role_assignments::table
            .filter(bw_role_assignments::business_wall_id.eq(business_wall_id))
            .filter(bw_role_assignments::user_id.eq(user_id))
            .filter(bw_role_assignments::role_type.eq(role_type.as_str()))
            .select(RoleAssignmentEntity::as_select())
            .first::<RoleAssignmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert_if_absent(
        &self,
        role_assignment: InsertRoleAssignmentEntity,
    ) -> Result<Option<RoleAssignmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(bw_role_assignments::table)
            .values(&role_assignment)
            .on_conflict((
                bw_role_assignments::business_wall_id,
                bw_role_assignments::user_id,
                bw_role_assignments::role_type,
            ))
            .do_nothing()
            .returning(RoleAssignmentEntity::as_returning())
            .get_result::<RoleAssignmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn respond(
        &self,
        role_assignment_id: Uuid,
        status: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let pending_row = bw_role_assignments::table
            .filter(bw_role_assignments::id.eq(role_assignment_id))
            .filter(bw_role_assignments::invitation_status.eq(InvitationStatus::Pending.as_str()));

        let updated = match status {
            InvitationStatus::Accepted => update(pending_row)
                .set((
                    bw_role_assignments::invitation_status.eq(status.as_str()),
                    bw_role_assignments::accepted_at.eq(Some(responded_at)),
                    bw_role_assignments::updated_at.eq(responded_at),
                ))
                .execute(&mut conn)?,
            InvitationStatus::Rejected => update(pending_row)
                .set((
                    bw_role_assignments::invitation_status.eq(status.as_str()),
                    bw_role_assignments::rejected_at.eq(Some(responded_at)),
                    bw_role_assignments::updated_at.eq(responded_at),
                ))
                .execute(&mut conn)?,
            InvitationStatus::Pending | InvitationStatus::Expired => update(pending_row)
                .set((
                    bw_role_assignments::invitation_status.eq(status.as_str()),
                    bw_role_assignments::updated_at.eq(responded_at),
                ))
                .execute(&mut conn)?,
        };

        Ok(updated == 1)
    }

    async fn expire_pending_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let expired = update(bw_role_assignments::table)
            .filter(bw_role_assignments::invitation_status.eq(InvitationStatus::Pending.as_str()))
            .filter(bw_role_assignments::invited_at.lt(cutoff))
            .set((
                bw_role_assignments::invitation_status.eq(InvitationStatus::Expired.as_str()),
                bw_role_assignments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(expired)
    }
}
